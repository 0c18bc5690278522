use gabguide_store::ConversationStore;
use gabguide_transcript::parse_transcript;
use std::path::Path;

use crate::cmd_parse::read_input;

/// `gabguide import [FILE] [--into ID]`
pub fn execute(
    store: &ConversationStore,
    path: Option<&Path>,
    into: Option<&str>,
) -> anyhow::Result<()> {
    let raw = read_input(path)?;
    let messages = parse_transcript(&raw);
    let count = messages.len();

    match store.import_transcript(messages, into)? {
        Some(id) => println!("Imported {count} messages into {id}"),
        None => println!("No messages found in input."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_file_into_new_then_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConversationStore::open(tmp.path().join("store"));
        let chat = tmp.path().join("chat.txt");

        std::fs::write(&chat, "[Steven]: Hello\n[ChatGPT]: Hi").unwrap();
        execute(&store, Some(chat.as_path()), None).unwrap();
        let id = store.load_conversations().unwrap()[0].id.clone();

        std::fs::write(&chat, "[Steven]: Bye").unwrap();
        execute(&store, Some(chat.as_path()), Some(id.as_str())).unwrap();

        let convs = store.load_conversations().unwrap();
        assert_eq!(convs.len(), 1);
        assert_eq!(convs[0].messages.len(), 3);
    }

    #[test]
    fn import_without_headers_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConversationStore::open(tmp.path().join("store"));
        let chat = tmp.path().join("chat.txt");
        std::fs::write(&chat, "plain text only").unwrap();

        execute(&store, Some(chat.as_path()), None).unwrap();
        assert!(store.load_conversations().unwrap().is_empty());
    }
}

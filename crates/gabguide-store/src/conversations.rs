use anyhow::{bail, Context};
use gabguide_core::{Conversation, Message, Settings};
use std::path::{Path, PathBuf};

use crate::{lock_file, store_root, write_atomic};

/// Conversation list and settings persisted as JSON under one root.
///
/// Every mutation is a locked read-modify-write, so two processes importing
/// into the same store cannot lose each other's messages.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    pub root: PathBuf,
    pub conversations_json: PathBuf,
    pub settings_json: PathBuf,
    pub lock_path: PathBuf,
}

impl ConversationStore {
    /// Derive all paths from a root. Pure computation, no I/O.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            conversations_json: root.join("conversations.json"),
            settings_json: root.join("settings.json"),
            lock_path: root.join("store.lock"),
            root,
        }
    }

    pub fn open_default() -> Self {
        Self::open(store_root())
    }

    /// Load all conversations, newest first. Missing file means none.
    pub fn load_conversations(&self) -> anyhow::Result<Vec<Conversation>> {
        read_json_or_default(&self.conversations_json)
    }

    pub fn save_conversations(&self, conversations: &[Conversation]) -> anyhow::Result<()> {
        let _lock = lock_file(&self.lock_path)?;
        self.write_conversations(conversations)
    }

    fn write_conversations(&self, conversations: &[Conversation]) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(conversations)?;
        write_atomic(&self.conversations_json, json.as_bytes())
            .with_context(|| format!("writing {}", self.conversations_json.display()))?;
        tracing::debug!(count = conversations.len(), "saved conversations");
        Ok(())
    }

    /// Load settings; absent fields take their defaults.
    pub fn load_settings(&self) -> anyhow::Result<Settings> {
        read_json_or_default(&self.settings_json)
    }

    pub fn save_settings(&self, settings: &Settings) -> anyhow::Result<()> {
        let _lock = lock_file(&self.lock_path)?;
        let json = serde_json::to_string_pretty(settings)?;
        write_atomic(&self.settings_json, json.as_bytes())
            .with_context(|| format!("writing {}", self.settings_json.display()))
    }

    pub fn get(&self, id: &str) -> anyhow::Result<Option<Conversation>> {
        Ok(self.load_conversations()?.into_iter().find(|c| c.id == id))
    }

    /// Store freshly parsed messages.
    ///
    /// Without `into`, a new conversation is created at the front of the
    /// list. With `into`, the messages are appended to that conversation.
    /// Returns the conversation id, or `None` when there was nothing to import.
    pub fn import_transcript(
        &self,
        messages: Vec<Message>,
        into: Option<&str>,
    ) -> anyhow::Result<Option<String>> {
        if messages.is_empty() {
            return Ok(None);
        }
        let count = messages.len();

        let _lock = lock_file(&self.lock_path)?;
        let mut conversations = self.load_conversations()?;

        let id = match into {
            Some(id) => {
                let conv = conversations
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or_else(|| anyhow::anyhow!("conversation not found: {id}"))?;
                conv.append_messages(messages);
                conv.id.clone()
            }
            None => {
                let conv = Conversation::imported(messages);
                let id = conv.id.clone();
                conversations.insert(0, conv);
                id
            }
        };

        self.write_conversations(&conversations)?;
        tracing::debug!(conversation = %id, messages = count, "imported transcript");
        Ok(Some(id))
    }

    /// Locked read-modify-write of one conversation.
    pub fn update<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Conversation) -> T,
    ) -> anyhow::Result<T> {
        let _lock = lock_file(&self.lock_path)?;
        let mut conversations = self.load_conversations()?;
        let Some(conv) = conversations.iter_mut().find(|c| c.id == id) else {
            bail!("conversation not found: {id}");
        };
        let out = f(conv);
        self.write_conversations(&conversations)?;
        Ok(out)
    }

    /// Returns whether a conversation was removed.
    pub fn delete_conversation(&self, id: &str) -> anyhow::Result<bool> {
        let _lock = lock_file(&self.lock_path)?;
        let mut conversations = self.load_conversations()?;
        let before = conversations.len();
        conversations.retain(|c| c.id != id);
        if conversations.len() == before {
            return Ok(false);
        }
        self.write_conversations(&conversations)?;
        Ok(true)
    }

    /// Drop all conversations. Settings are kept.
    pub fn reset(&self) -> anyhow::Result<()> {
        let _lock = lock_file(&self.lock_path)?;
        if self.conversations_json.exists() {
            std::fs::remove_file(&self.conversations_json)
                .with_context(|| format!("removing {}", self.conversations_json.display()))?;
        }
        tracing::debug!("reset conversation history");
        Ok(())
    }
}

fn read_json_or_default<T>(path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gabguide_core::{ColorByScoring, Model, Role};
    use gabguide_transcript::parse_transcript;

    fn store() -> (tempfile::TempDir, ConversationStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConversationStore::open(tmp.path().join("store"));
        (tmp, store)
    }

    #[test]
    fn empty_store_loads_defaults() {
        let (_tmp, store) = store();
        assert!(store.load_conversations().unwrap().is_empty());
        assert_eq!(store.load_settings().unwrap(), Settings::default());
    }

    #[test]
    fn import_creates_conversation_at_front() {
        let (_tmp, store) = store();
        let first = store
            .import_transcript(parse_transcript("[Steven]: one"), None)
            .unwrap()
            .unwrap();
        let second = store
            .import_transcript(parse_transcript("[Steven]: two"), None)
            .unwrap()
            .unwrap();

        let convs = store.load_conversations().unwrap();
        assert_eq!(convs.len(), 2);
        assert_eq!(convs[0].id, second);
        assert_eq!(convs[1].id, first);
        assert_eq!(convs[0].title, "Imported Chat");
    }

    #[test]
    fn import_nothing_is_noop() {
        let (_tmp, store) = store();
        let id = store
            .import_transcript(parse_transcript("no headers here"), None)
            .unwrap();
        assert!(id.is_none());
        assert!(!store.conversations_json.exists());
    }

    #[test]
    fn import_into_appends_in_order() {
        let (_tmp, store) = store();
        let id = store
            .import_transcript(parse_transcript("[Steven]: Hello\n[ChatGPT]: Hi"), None)
            .unwrap()
            .unwrap();
        store
            .import_transcript(parse_transcript("[Steven]: Bye"), Some(id.as_str()))
            .unwrap();

        let conv = store.get(&id).unwrap().unwrap();
        let texts: Vec<&str> = conv.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "Hi", "Bye"]);
        assert_eq!(conv.messages[1].role(), Role::Counterpart);
    }

    #[test]
    fn import_into_unknown_conversation_fails() {
        let (_tmp, store) = store();
        let err = store
            .import_transcript(parse_transcript("[Steven]: hi"), Some("conv_missing"))
            .unwrap_err();
        assert!(err.to_string().contains("conv_missing"));
    }

    #[test]
    fn update_persists_changes() {
        let (_tmp, store) = store();
        let id = store
            .import_transcript(parse_transcript("[ChatGPT]: hi\n[Steven]: yo"), None)
            .unwrap()
            .unwrap();
        let changed = store
            .update(&id, |c| c.rename_speaker("ChatGPT", "Maria"))
            .unwrap();
        assert_eq!(changed, 1);

        let conv = store.get(&id).unwrap().unwrap();
        assert_eq!(conv.messages[0].sender, "Maria");
        assert_eq!(conv.messages[0].role(), Role::Learner);
    }

    #[test]
    fn save_conversations_round_trip() {
        let (_tmp, store) = store();
        let mut conv = Conversation::imported(parse_transcript("[Steven]: hi"));
        conv.set_title("Coffee order");
        store.save_conversations(std::slice::from_ref(&conv)).unwrap();
        assert_eq!(store.load_conversations().unwrap(), vec![conv]);
    }

    #[test]
    fn update_unknown_conversation_fails() {
        let (_tmp, store) = store();
        assert!(store.update("nope", |_| ()).is_err());
    }

    #[test]
    fn delete_and_reset() {
        let (_tmp, store) = store();
        let a = store
            .import_transcript(parse_transcript("[Steven]: a"), None)
            .unwrap()
            .unwrap();
        store
            .import_transcript(parse_transcript("[Steven]: b"), None)
            .unwrap();

        assert!(store.delete_conversation(&a).unwrap());
        assert!(!store.delete_conversation(&a).unwrap());
        assert_eq!(store.load_conversations().unwrap().len(), 1);

        let settings = Settings {
            api_key: "key".into(),
            ..Settings::default()
        };
        store.save_settings(&settings).unwrap();
        store.reset().unwrap();
        assert!(store.load_conversations().unwrap().is_empty());
        assert_eq!(store.load_settings().unwrap().api_key, "key");
    }

    #[test]
    fn partial_settings_file_merges_defaults() {
        let (_tmp, store) = store();
        std::fs::create_dir_all(&store.root).unwrap();
        std::fs::write(&store.settings_json, r#"{"colorByScoring":"never"}"#).unwrap();
        let settings = store.load_settings().unwrap();
        assert_eq!(settings.color_by_scoring, ColorByScoring::Never);
        assert_eq!(settings.model, Model::Gemini3FlashPreview);
    }

    #[test]
    fn corrupt_conversations_file_is_an_error() {
        let (_tmp, store) = store();
        std::fs::create_dir_all(&store.root).unwrap();
        std::fs::write(&store.conversations_json, "not json").unwrap();
        let err = store.load_conversations().unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }

    #[test]
    fn reads_legacy_role_names() {
        let (_tmp, store) = store();
        std::fs::create_dir_all(&store.root).unwrap();
        let legacy = r#"[{
            "id": "conv-1700000000000",
            "title": "Old chat",
            "createdAt": 1700000000000,
            "updatedAt": 1700000000000,
            "messages": [
                {"id": "msg-1700000000000-0", "sender": "Steven", "text": "Hi",
                 "role": "user", "timestamp": "10:00"},
                {"id": "msg-1700000000000-1", "sender": "ChatGPT", "text": "Hello",
                 "role": "assistant", "timestamp": "10:00", "viewed": true}
            ],
            "summary": null
        }]"#;
        std::fs::write(&store.conversations_json, legacy).unwrap();

        let convs = store.load_conversations().unwrap();
        assert_eq!(convs[0].messages[0].role(), Role::Learner);
        assert_eq!(convs[0].messages[1].role(), Role::Counterpart);
        assert!(convs[0].messages[1].viewed);
        assert_eq!(convs[0].language(), "English");
    }
}

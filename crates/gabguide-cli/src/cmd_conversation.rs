use gabguide_core::{Conversation, Message, ScoreBand};
use gabguide_store::ConversationStore;

/// `gabguide list`
pub fn list(store: &ConversationStore) -> anyhow::Result<()> {
    let conversations = store.load_conversations()?;
    if conversations.is_empty() {
        println!("No conversations yet.");
        return Ok(());
    }
    for c in &conversations {
        println!(
            "{}  {}  {} messages  \"{}\"",
            c.id,
            format_millis(c.updated_at),
            c.messages.len(),
            c.title
        );
    }
    Ok(())
}

/// `gabguide show ID [--json]`
pub fn show(store: &ConversationStore, id: &str, json: bool) -> anyhow::Result<()> {
    let conv = store
        .get(id)?
        .ok_or_else(|| anyhow::anyhow!("conversation not found: {id}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conv)?);
        return Ok(());
    }

    print_header(&conv);
    for m in &conv.messages {
        println!("{}", message_line(m));
    }
    Ok(())
}

fn print_header(conv: &Conversation) {
    println!("{} ({})", conv.title, conv.language());
    println!("Created {}", format_millis(conv.created_at));
    if let Some(s) = &conv.summary {
        println!(
            "Scores: grammar {} / clarity {} / flow {}",
            s.grammar_score, s.clarity_score, s.flow_score
        );
    }
    println!();
}

fn message_line(m: &Message) -> String {
    let mut line = format!("{} [{}] ({}) {}", m.timestamp, m.sender, m.role(), m.text);
    if let Some(a) = &m.analysis {
        line.push_str(&format!(
            "\n      grammar {}/10 ({}), naturalness {}/10 ({})",
            a.grammar_score,
            band_label(ScoreBand::from_score(a.grammar_score)),
            a.naturalness_score,
            band_label(ScoreBand::from_score(a.naturalness_score)),
        ));
    }
    line
}

fn band_label(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::High => "good",
        ScoreBand::Medium => "fair",
        ScoreBand::Low => "needs work",
    }
}

/// Format unix millis as an RFC 3339 timestamp (UTC).
fn format_millis(millis: i64) -> String {
    time::OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
        .ok()
        .and_then(|t| t.format(&time::format_description::well_known::Rfc3339).ok())
        .unwrap_or_else(|| millis.to_string())
}

/// `gabguide rename-speaker ID OLD NEW`
pub fn rename_speaker(
    store: &ConversationStore,
    id: &str,
    old: &str,
    new: &str,
) -> anyhow::Result<()> {
    let changed = store.update(id, |c| c.rename_speaker(old, new))?;
    if changed == 0 {
        println!("No messages from \"{old}\" in {id}");
    } else {
        let role = gabguide_core::classify_speaker(new);
        println!("Renamed {changed} messages: \"{old}\" -> \"{new}\" ({role})");
    }
    Ok(())
}

/// `gabguide title ID TITLE`
pub fn set_title(store: &ConversationStore, id: &str, title: &str) -> anyhow::Result<()> {
    store.update(id, |c| c.set_title(title))?;
    println!("Title set: \"{title}\"");
    Ok(())
}

/// `gabguide delete ID`
pub fn delete(store: &ConversationStore, id: &str) -> anyhow::Result<()> {
    if store.delete_conversation(id)? {
        println!("Deleted {id}");
        Ok(())
    } else {
        anyhow::bail!("conversation not found: {id}")
    }
}

/// `gabguide delete-messages ID MSG_ID...`
pub fn delete_messages(
    store: &ConversationStore,
    id: &str,
    message_ids: &[String],
) -> anyhow::Result<()> {
    let removed = store.update(id, |c| c.delete_messages(message_ids))?;
    println!("Removed {removed} messages from {id}");
    Ok(())
}

/// `gabguide reset --yes`
pub fn reset(store: &ConversationStore, confirmed: bool) -> anyhow::Result<()> {
    if !confirmed {
        anyhow::bail!("refusing to delete all conversations without --yes");
    }
    store.reset()?;
    println!("All conversations deleted.");
    Ok(())
}

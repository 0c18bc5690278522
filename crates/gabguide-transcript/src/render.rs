use gabguide_core::Message;

/// Render messages back into `[sender]: text` transcript form.
///
/// Continuation lines of multi-line messages follow on their own lines, so
/// the output parses back into the same turns as long as no continuation
/// line looks like a header.
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("[{}]: {}", m.sender, m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

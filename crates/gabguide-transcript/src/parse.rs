use gabguide_core::ids::{clock_time_now, MessageIds};
use gabguide_core::Message;

use crate::header::{classify_line, strip_quotes, LineKind};

/// Fold state: closed messages plus the turn still collecting continuations.
#[derive(Default)]
struct Accumulator {
    closed: Vec<Message>,
    open: Option<Message>,
    orphans: usize,
}

impl Accumulator {
    fn open_turn(&mut self, msg: Message) {
        if let Some(prev) = self.open.replace(msg) {
            self.closed.push(prev);
        }
    }

    fn continue_turn(&mut self, line: &str) {
        match self.open.as_mut() {
            Some(msg) => {
                msg.text.push('\n');
                msg.text.push_str(strip_quotes(line.trim()));
            }
            None => {
                tracing::trace!(line, "dropping continuation line before first header");
                self.orphans += 1;
            }
        }
    }

    fn finish(mut self) -> (Vec<Message>, usize) {
        if let Some(last) = self.open.take() {
            self.closed.push(last);
        }
        (self.closed, self.orphans)
    }
}

/// Parse a pasted transcript into speaker-attributed messages.
///
/// Lines shaped `[Name]: text` or `[Name] (note): text` open a new message;
/// any other non-blank line is appended to the open message with `\n`, or
/// dropped when no message has been opened yet. Never fails: the worst case
/// is an empty result.
pub fn parse_transcript(raw: &str) -> Vec<Message> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let mut ids = MessageIds::new();
    let timestamp = clock_time_now();

    let (messages, orphans) = raw
        .lines()
        .filter(|l| !l.trim().is_empty())
        .fold(Accumulator::default(), |mut acc, line| {
            match classify_line(line) {
                LineKind::Header(h) => {
                    // Pasted text is sometimes quoted twice; strip up to two layers.
                    let text = strip_quotes(strip_quotes(h.payload));
                    acc.open_turn(Message::new(ids.next_id(), h.sender, text, &timestamp));
                }
                LineKind::Continuation(line) => acc.continue_turn(line),
            }
            acc
        })
        .finish();

    tracing::debug!(
        messages = messages.len(),
        dropped_lines = orphans,
        "parsed transcript"
    );
    messages
}

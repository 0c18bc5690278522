use ulid::{Generator, Ulid};

/// Conversation ID format: `conv_<ulid>`
pub fn new_conversation_id() -> String {
    format!("conv_{}", Ulid::new().to_string().to_lowercase())
}

/// Monotonic source of message IDs (`msg_<ulid>`) for a batch of messages.
///
/// IDs from one source are strictly increasing even when several are minted
/// inside the same millisecond.
pub struct MessageIds {
    generator: Generator,
}

impl MessageIds {
    pub fn new() -> Self {
        Self {
            generator: Generator::new(),
        }
    }

    pub fn next_id(&mut self) -> String {
        // Overflow needs 2^80 ids in one millisecond; fall back to a fresh ULID.
        let ulid = self.generator.generate().unwrap_or_else(|_| Ulid::new());
        format!("msg_{}", ulid.to_string().to_lowercase())
    }
}

impl Default for MessageIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock time as `HH:MM`, local time when the offset is known.
pub fn clock_time_now() -> String {
    let now = time::OffsetDateTime::now_local()
        .unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    format!("{:02}:{:02}", now.hour(), now.minute())
}

/// Current time in unix milliseconds.
pub fn now_unix_millis() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

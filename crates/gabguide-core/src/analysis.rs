use crate::types::{AnalysisResult, CheatSheet, ConversationSummary, Message, TopicLevel};

/// How many messages (the analyzed one included) are sent as context.
pub const MAX_CONTEXT_MESSAGES: usize = 10;

/// Summary plus a suggested conversation title.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOutcome {
    pub summary: ConversationSummary,
    pub title: String,
}

/// One learner message queued for batch analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub id: String,
    pub text: String,
    /// Context window ending at this message, as built by [`build_context`].
    pub context: String,
}

/// External scoring/feedback backend.
///
/// Implementations own transport, retries and response validation.
pub trait AnalysisProvider {
    /// Score one learner message against the preceding conversation.
    fn analyze_message(
        &self,
        message: &str,
        context: &str,
        language: &str,
    ) -> anyhow::Result<AnalysisResult>;

    /// Score several learner messages in one request.
    ///
    /// Returns `(message id, result)` pairs. Ids the provider did not echo
    /// back simply stay unanalyzed.
    fn analyze_batch(
        &self,
        items: &[BatchItem],
        language: &str,
    ) -> anyhow::Result<Vec<(String, AnalysisResult)>>;

    /// Summarize a whole transcript (`sender: text` per line).
    fn summarize(&self, transcript: &str, language: &str) -> anyhow::Result<SummaryOutcome>;

    /// Vocabulary and example sentences for a small-talk topic.
    ///
    /// `user_context` is the direction the learner wants the conversation to
    /// take, if any.
    fn cheat_sheet(
        &self,
        topic: &str,
        level: TopicLevel,
        user_context: Option<&str>,
        language: &str,
    ) -> anyhow::Result<CheatSheet>;
}

/// Ask the provider for a cheat sheet on `topic`.
///
/// The topic is trimmed and must not be empty. A blank `user_context` is
/// passed on as `None`.
pub fn prepare_cheat_sheet(
    provider: &dyn AnalysisProvider,
    topic: &str,
    level: TopicLevel,
    user_context: Option<&str>,
    language: &str,
) -> anyhow::Result<CheatSheet> {
    let topic = topic.trim();
    if topic.is_empty() {
        anyhow::bail!("cheat sheet topic is empty");
    }
    let user_context = user_context.map(str::trim).filter(|c| !c.is_empty());
    tracing::debug!(topic, level = level.as_str(), language, "requesting cheat sheet");
    provider.cheat_sheet(topic, level, user_context, language)
}

/// Render the context window ending at `up_to_index` (inclusive).
///
/// Out-of-range indexes clamp to the last message.
pub fn build_context(messages: &[Message], up_to_index: usize) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let end = up_to_index.min(messages.len() - 1);
    let start = (end + 1).saturating_sub(MAX_CONTEXT_MESSAGES);
    messages[start..=end]
        .iter()
        .map(|m| format!("{}: {}", m.sender, m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct SheetProvider {
        requests: RefCell<Vec<(String, TopicLevel, Option<String>, String)>>,
    }

    impl AnalysisProvider for SheetProvider {
        fn analyze_message(&self, _: &str, _: &str, _: &str) -> anyhow::Result<AnalysisResult> {
            anyhow::bail!("not used")
        }

        fn analyze_batch(
            &self,
            _: &[BatchItem],
            _: &str,
        ) -> anyhow::Result<Vec<(String, AnalysisResult)>> {
            anyhow::bail!("not used")
        }

        fn summarize(&self, _: &str, _: &str) -> anyhow::Result<SummaryOutcome> {
            anyhow::bail!("not used")
        }

        fn cheat_sheet(
            &self,
            topic: &str,
            level: TopicLevel,
            user_context: Option<&str>,
            language: &str,
        ) -> anyhow::Result<CheatSheet> {
            self.requests.borrow_mut().push((
                topic.to_string(),
                level,
                user_context.map(str::to_string),
                language.to_string(),
            ));
            Ok(CheatSheet {
                vocabulary: vec!["weekend".into()],
                sentences: vec![format!("Let's talk about {topic}.")],
            })
        }
    }

    fn msgs(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| Message::new(format!("msg_{i}"), "Steven", format!("line {i}"), "10:00"))
            .collect()
    }

    #[test]
    fn context_of_empty_list_is_empty() {
        assert_eq!(build_context(&[], 3), "");
    }

    #[test]
    fn context_includes_target_and_predecessors() {
        let m = msgs(3);
        assert_eq!(
            build_context(&m, 1),
            "Steven: line 0\nSteven: line 1"
        );
    }

    #[test]
    fn context_is_bounded() {
        let m = msgs(25);
        let ctx = build_context(&m, 20);
        let lines: Vec<&str> = ctx.lines().collect();
        assert_eq!(lines.len(), MAX_CONTEXT_MESSAGES);
        assert_eq!(lines[0], "Steven: line 11");
        assert_eq!(lines[9], "Steven: line 20");
    }

    #[test]
    fn context_clamps_out_of_range_index() {
        let m = msgs(2);
        assert_eq!(build_context(&m, 99), "Steven: line 0\nSteven: line 1");
    }

    #[test]
    fn cheat_sheet_passes_level_and_context() {
        let provider = SheetProvider::default();
        let sheet = prepare_cheat_sheet(
            &provider,
            "  Hobbies ",
            TopicLevel::B,
            Some("mostly hiking"),
            "Spanish",
        )
        .unwrap();
        assert_eq!(sheet.sentences, vec!["Let's talk about Hobbies.".to_string()]);

        let requests = provider.requests.borrow();
        assert_eq!(
            requests[0],
            (
                "Hobbies".to_string(),
                TopicLevel::B,
                Some("mostly hiking".to_string()),
                "Spanish".to_string()
            )
        );
    }

    #[test]
    fn cheat_sheet_blank_context_is_none() {
        let provider = SheetProvider::default();
        prepare_cheat_sheet(&provider, "Food", TopicLevel::A, Some("   "), "English").unwrap();
        assert_eq!(provider.requests.borrow()[0].2, None);
    }

    #[test]
    fn cheat_sheet_rejects_empty_topic() {
        let provider = SheetProvider::default();
        assert!(prepare_cheat_sheet(&provider, " ", TopicLevel::C, None, "English").is_err());
        assert!(provider.requests.borrow().is_empty());
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::analysis::{build_context, AnalysisProvider, BatchItem};
use crate::ids::{new_conversation_id, now_unix_millis};
use crate::types::{AnalysisResult, ConversationSummary, Message};

pub const DEFAULT_LANGUAGE: &str = "English";
pub const NEW_CONVERSATION_TITLE: &str = "New Conversation";
pub const IMPORTED_CONVERSATION_TITLE: &str = "Imported Chat";

#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("message not found: {0}")]
    MessageNotFound(String),
    #[error("message {0} is not a learner turn")]
    NotLearnerTurn(String),
    #[error("conversation has no messages")]
    EmptyConversation,
    #[error("analysis provider failed: {0}")]
    Provider(#[source] anyhow::Error),
}

/// A stored conversation: ordered messages plus summary and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    /// Unix millis.
    pub created_at: i64,
    /// Unix millis.
    pub updated_at: i64,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub summary: Option<ConversationSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Conversation {
    pub fn new(title: &str) -> Self {
        let now = now_unix_millis();
        Self {
            id: new_conversation_id(),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
            summary: None,
            language: None,
        }
    }

    /// A fresh conversation holding freshly parsed messages.
    pub fn imported(messages: Vec<Message>) -> Self {
        let mut conv = Self::new(IMPORTED_CONVERSATION_TITLE);
        conv.messages = messages;
        conv
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    fn touch(&mut self) {
        self.updated_at = now_unix_millis().max(self.updated_at);
    }

    pub fn append_messages(&mut self, messages: Vec<Message>) {
        if messages.is_empty() {
            return;
        }
        self.messages.extend(messages);
        self.touch();
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.touch();
    }

    /// Remove the messages with the given ids. Returns how many were removed.
    pub fn delete_messages(&mut self, ids: &[String]) -> usize {
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let before = self.messages.len();
        self.messages.retain(|m| !ids.contains(m.id.as_str()));
        let removed = before - self.messages.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Rename every message sent by `old` and reclassify its role.
    pub fn rename_speaker(&mut self, old: &str, new: &str) -> usize {
        let mut changed = 0;
        for msg in self.messages.iter_mut().filter(|m| m.sender == old) {
            msg.rename_sender(new);
            changed += 1;
        }
        if changed > 0 {
            self.touch();
        }
        changed
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Analyze one learner message, reusing a stored analysis when present.
    pub fn analyze_message(
        &mut self,
        id: &str,
        provider: &dyn AnalysisProvider,
    ) -> Result<AnalysisResult, ConversationError> {
        let index = self
            .messages
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| ConversationError::MessageNotFound(id.to_string()))?;

        if !self.messages[index].is_learner() {
            return Err(ConversationError::NotLearnerTurn(id.to_string()));
        }

        if let Some(existing) = self.messages[index].analysis.clone() {
            self.messages[index].viewed = true;
            self.touch();
            return Ok(existing);
        }

        let context = build_context(&self.messages, index);
        let language = self.language().to_string();
        tracing::debug!(message_id = id, %language, "requesting message analysis");
        let result = provider
            .analyze_message(&self.messages[index].text, &context, &language)
            .map_err(ConversationError::Provider)?;

        let msg = &mut self.messages[index];
        msg.analysis = Some(result.clone());
        msg.viewed = true;
        self.touch();
        Ok(result)
    }

    /// Analyze every learner message that has no analysis yet, in one
    /// provider request. Returns how many messages received a result.
    ///
    /// Counterpart turns and analyzed messages are skipped. New results are
    /// not marked viewed.
    pub fn analyze_all(
        &mut self,
        provider: &dyn AnalysisProvider,
    ) -> Result<usize, ConversationError> {
        let items: Vec<BatchItem> = self
            .messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_learner() && m.analysis.is_none())
            .map(|(index, m)| BatchItem {
                id: m.id.clone(),
                text: m.text.clone(),
                context: build_context(&self.messages, index),
            })
            .collect();
        if items.is_empty() {
            return Ok(0);
        }

        let language = self.language().to_string();
        tracing::debug!(pending = items.len(), %language, "requesting batch analysis");
        let results = provider
            .analyze_batch(&items, &language)
            .map_err(ConversationError::Provider)?;

        let pending: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
        let mut attached = 0;
        for (id, result) in results {
            if !pending.contains(id.as_str()) {
                tracing::warn!(message_id = %id, "batch result for unexpected message");
                continue;
            }
            if let Some(msg) = self
                .messages
                .iter_mut()
                .find(|m| m.id == id && m.analysis.is_none())
            {
                msg.analysis = Some(result);
                attached += 1;
            }
        }
        if attached > 0 {
            self.touch();
        }
        Ok(attached)
    }

    /// Transcript text handed to the summarizer: `sender: text` per message.
    pub fn transcript_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.sender, m.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Summarize the conversation and adopt the suggested title.
    ///
    /// An existing summary is returned as-is, without a provider call and
    /// without touching the title.
    pub fn summarize(
        &mut self,
        provider: &dyn AnalysisProvider,
    ) -> Result<&ConversationSummary, ConversationError> {
        if self.messages.is_empty() {
            return Err(ConversationError::EmptyConversation);
        }
        let summary = match self.summary.take() {
            Some(existing) => existing,
            None => {
                let outcome = provider
                    .summarize(&self.transcript_text(), self.language())
                    .map_err(ConversationError::Provider)?;
                self.title = outcome.title;
                self.touch();
                outcome.summary
            }
        };
        Ok(self.summary.insert(summary))
    }
}

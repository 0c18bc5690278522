pub mod analysis;
pub mod conversation;
pub mod ids;
pub mod settings;
pub mod types;

pub use analysis::{
    build_context, prepare_cheat_sheet, AnalysisProvider, BatchItem, SummaryOutcome,
    MAX_CONTEXT_MESSAGES,
};
pub use conversation::{Conversation, ConversationError};
pub use settings::{ColorByScoring, Model, Settings};
pub use types::*;

mod header;
mod parse;
mod render;

pub use gabguide_core::{classify_speaker, Message, Role};
pub use header::{classify_line, strip_quotes, HeaderLine, LineKind};
pub use parse::parse_transcript;
pub use render::render_transcript;

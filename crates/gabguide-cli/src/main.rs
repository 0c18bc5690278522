mod cmd_config;
mod cmd_conversation;
mod cmd_import;
mod cmd_parse;

use clap::{Parser, Subcommand};
use gabguide_store::ConversationStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gabguide",
    version,
    about = "Parse pasted chat transcripts and review learner turns"
)]
struct Cli {
    /// Store directory (defaults to $GABGUIDE_HOME or the platform data dir)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a transcript and print the messages without storing them
    Parse {
        /// Transcript file (stdin when omitted or "-")
        file: Option<PathBuf>,
        /// Print as `[sender]: text` lines instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Parse a transcript and store it as a conversation
    Import {
        /// Transcript file (stdin when omitted or "-")
        file: Option<PathBuf>,
        /// Append to an existing conversation instead of creating one
        #[arg(long)]
        into: Option<String>,
    },
    /// List stored conversations, newest first
    List,
    /// Show one conversation
    Show {
        /// Conversation ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rename a speaker in a conversation and reclassify their role
    RenameSpeaker {
        /// Conversation ID
        id: String,
        /// Current speaker name
        old: String,
        /// New speaker name
        new: String,
    },
    /// Set a conversation's title
    Title {
        /// Conversation ID
        id: String,
        /// New title
        title: String,
    },
    /// Delete a conversation
    Delete {
        /// Conversation ID
        id: String,
    },
    /// Delete messages from a conversation
    DeleteMessages {
        /// Conversation ID
        id: String,
        /// Message IDs to remove
        #[arg(required = true)]
        message_ids: Vec<String>,
    },
    /// Delete all conversations (settings are kept)
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
    /// Get/set settings
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON on stdout stays parseable. RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let store = match cli.store {
        Some(dir) => ConversationStore::open(dir),
        None => ConversationStore::open_default(),
    };
    tracing::debug!(root = %store.root.display(), "using store");

    match cli.cmd {
        Command::Parse { file, text } => cmd_parse::execute(file.as_deref(), text),
        Command::Import { file, into } => {
            cmd_import::execute(&store, file.as_deref(), into.as_deref())
        }
        Command::List => cmd_conversation::list(&store),
        Command::Show { id, json } => cmd_conversation::show(&store, &id, json),
        Command::RenameSpeaker { id, old, new } => {
            cmd_conversation::rename_speaker(&store, &id, &old, &new)
        }
        Command::Title { id, title } => cmd_conversation::set_title(&store, &id, &title),
        Command::Delete { id } => cmd_conversation::delete(&store, &id),
        Command::DeleteMessages { id, message_ids } => {
            cmd_conversation::delete_messages(&store, &id, &message_ids)
        }
        Command::Reset { yes } => cmd_conversation::reset(&store, yes),
        Command::Config { cmd } => cmd_config::run(cmd, &store),
    }
}

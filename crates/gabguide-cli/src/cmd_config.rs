use clap::Subcommand;
use gabguide_core::{ColorByScoring, Model, Settings};
use gabguide_store::ConversationStore;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (api_key, model, color_by_scoring, custom_languages, show_conversation_scores)
        key: String,
        /// Config value (custom_languages takes a comma-separated list)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, store: &ConversationStore) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(store, &key, &value),
        ConfigCmd::Get { key } => get(store, &key),
        ConfigCmd::List => list(store),
    }
}

// ── Command Implementations ──

const KEYS: &[&str] = &[
    "api_key",
    "model",
    "color_by_scoring",
    "custom_languages",
    "show_conversation_scores",
];

/// Apply `key = value` to settings.
fn apply(settings: &mut Settings, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "api_key" => settings.api_key = value.trim().to_string(),
        "model" => {
            settings.model = Model::parse(value).ok_or_else(|| {
                let known: Vec<&str> = Model::ALL.iter().map(Model::as_str).collect();
                anyhow::anyhow!("unknown model {value:?} (known: {})", known.join(", "))
            })?;
        }
        "color_by_scoring" => {
            settings.color_by_scoring = ColorByScoring::parse(value).ok_or_else(|| {
                anyhow::anyhow!("invalid color_by_scoring {value:?} (always, afterRead, never)")
            })?;
        }
        "custom_languages" => {
            settings.custom_languages = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        "show_conversation_scores" => {
            settings.show_conversation_scores = match value {
                "true" => true,
                "false" => false,
                _ => anyhow::bail!("show_conversation_scores must be true or false"),
            };
        }
        _ => anyhow::bail!("unknown config key {key:?} (known: {})", KEYS.join(", ")),
    }
    Ok(())
}

/// Display form of one setting. The API key is masked.
fn display(settings: &Settings, key: &str) -> Option<String> {
    let value = match key {
        "api_key" => mask_key(&settings.api_key),
        "model" => settings.model.as_str().to_string(),
        "color_by_scoring" => settings.color_by_scoring.as_str().to_string(),
        "custom_languages" => settings.custom_languages.join(","),
        "show_conversation_scores" => settings.show_conversation_scores.to_string(),
        _ => return None,
    };
    Some(value)
}

fn mask_key(key: &str) -> String {
    if key.is_empty() {
        "(not set)".to_string()
    } else {
        let tail: Vec<char> = key.chars().rev().take(4).collect();
        let tail: String = tail.into_iter().rev().collect();
        format!("****{tail}")
    }
}

/// `gabguide config set <key> <value>`
pub fn set(store: &ConversationStore, key: &str, value: &str) -> anyhow::Result<()> {
    let mut settings = store.load_settings()?;
    apply(&mut settings, key, value)?;
    store.save_settings(&settings)?;
    tracing::debug!(key, "updated setting");
    if let Some(shown) = display(&settings, key) {
        println!("{key} = {shown}");
    }
    Ok(())
}

/// `gabguide config get <key>`
pub fn get(store: &ConversationStore, key: &str) -> anyhow::Result<()> {
    let settings = store.load_settings()?;
    match display(&settings, key) {
        Some(val) => println!("{val}"),
        None => anyhow::bail!("unknown config key {key:?} (known: {})", KEYS.join(", ")),
    }
    Ok(())
}

/// `gabguide config list`
pub fn list(store: &ConversationStore) -> anyhow::Result<()> {
    let settings = store.load_settings()?;
    for key in KEYS {
        if let Some(v) = display(&settings, key) {
            println!("{key} = {v}");
        }
    }
    Ok(())
}

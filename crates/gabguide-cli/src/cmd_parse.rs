use anyhow::Context;
use gabguide_transcript::{parse_transcript, render_transcript};
use std::io::Read;
use std::path::Path;

/// Read a transcript from a file, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

/// `gabguide parse [FILE] [--text]`
pub fn execute(path: Option<&Path>, text: bool) -> anyhow::Result<()> {
    let raw = read_input(path)?;
    let messages = parse_transcript(&raw);

    if text {
        if !messages.is_empty() {
            println!("{}", render_transcript(&messages));
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&messages)?);
    }
    Ok(())
}

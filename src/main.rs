//! # Recede - Syntax De-emphasis
//!
//! Opens a source file, applies the de-emphasis overlay and prints the
//! resulting highlight spans.
//!
//! ## Quick Start
//!
//! ```bash
//! # Highlight a file with the overlay on
//! cargo run -- path/to/file.rs
//!
//! # Base highlighting only, two feature tiers
//! cargo run -- --no-overlay --level 2 path/to/file.ts
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use recede_core::{Config, Editor};
use recede_syntax::LanguageId;

/// Recede - de-emphasize syntactic noise in source code
#[derive(Parser, Debug)]
#[command(name = "recede")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to highlight
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Language override (rust, javascript, typescript, tsx, python, json)
    #[arg(short = 'L', long, value_name = "NAME")]
    language: Option<LanguageId>,

    /// Leave the overlay off
    #[arg(long)]
    no_overlay: bool,

    /// Highlight level (number of feature tiers enabled)
    #[arg(short, long)]
    level: Option<usize>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over -v
    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    tracing::info!("Starting Recede v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(level) = args.level {
        config.highlight.level = level;
    }
    // The CLI decides explicitly below.
    config.overlay.enable_by_default = false;

    let mut editor = Editor::with_config(config)?;
    let id = match args.language {
        Some(language) => {
            let text = std::fs::read_to_string(&args.file)?;
            editor.open_text(&text, Some(language))?
        }
        None => editor.open_file(&args.file)?,
    };

    if !args.no_overlay {
        editor.set_overlay(id, true)?;
    }
    if let Some(label) = editor.status_label(id)? {
        tracing::info!("Mode:{}", label);
    }

    let doc = editor.document(id)?;
    if doc.language().is_none() {
        anyhow::bail!("No grammar for {}", args.file.display());
    }

    for span in editor.highlight_spans(id)? {
        let point = doc.buffer().byte_to_point(span.start)?;
        let text = doc.span_text(&span)?;
        println!(
            "{}:{}\t{}\t{:?}",
            point.row + 1,
            point.column + 1,
            span.style,
            text
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["recede", "main.rs"]);
        assert_eq!(args.file, PathBuf::from("main.rs"));
        assert!(!args.no_overlay);
        assert!(args.level.is_none());
    }

    #[test]
    fn test_args_with_options() {
        let args = Args::parse_from(["recede", "--no-overlay", "-l", "2", "-L", "tsx", "-vv", "a.js"]);
        assert!(args.no_overlay);
        assert_eq!(args.level, Some(2));
        assert_eq!(args.language, Some(LanguageId::Tsx));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_args_require_file() {
        assert!(Args::try_parse_from(["recede"]).is_err());
    }
}

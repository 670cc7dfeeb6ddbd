use super::resolve;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use resonance_editor::EditorConfig;
use resonance_markup::{MountOrigin, RichTextBridge, Sanitizer};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarkupOutput {
    /// Sanitized presentational HTML
    Html,
    /// Editor document JSON
    Document,
    /// Plain text, one line per block
    Text,
}

#[derive(Debug, Args)]
pub struct MarkupArgs {
    /// Persisted value: editor document JSON or legacy markup
    pub input: PathBuf,

    /// Output representation
    #[arg(short, long, value_enum, default_value = "html")]
    pub to: MarkupOutput,
}

pub fn markup(args: MarkupArgs, cwd: &Path) -> Result<()> {
    let config = EditorConfig::load(cwd)?;
    let input = resolve(cwd, &args.input);
    let raw = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let sanitizer = Arc::new(Sanitizer::new(config.sanitizer));
    let bridge = RichTextBridge::mount("markup", Some(&raw), "", sanitizer);

    if bridge.origin() != MountOrigin::DocumentState {
        eprintln!(
            "  {} {} is not document JSON, imported as markup",
            "•".yellow(),
            input.display()
        );
    }

    match args.to {
        MarkupOutput::Html => println!("{}", bridge.presentation()),
        MarkupOutput::Document => {
            println!("{}", serde_json::to_string_pretty(bridge.document())?)
        }
        MarkupOutput::Text => println!("{}", bridge.document().plain_text()),
    }

    Ok(())
}

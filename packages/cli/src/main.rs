mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{bind, fields, init, markup, BindArgs, FieldsArgs, InitArgs, MarkupArgs};

/// Resonance CLI - in-place content editing toolkit
#[derive(Parser, Debug)]
#[command(name = "resonance")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a resonance.config.json with default settings
    Init(InitArgs),

    /// Bind a rendered tree to a scope's image attributes
    Bind(BindArgs),

    /// Convert rich text between markup and editor documents
    Markup(MarkupArgs),

    /// Print the publish fields a scope would emit
    Fields(FieldsArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Bind(args) => bind(args, &cwd),
            Command::Markup(args) => markup(args, &cwd),
            Command::Fields(args) => fields(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

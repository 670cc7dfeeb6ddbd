use anyhow::Result;
use clap::Args;
use colored::Colorize;
use resonance_content::IdPolicy;
use resonance_editor::{EditorConfig, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Origin publish acknowledgments must come from
    #[arg(short, long, default_value = "http://localhost")]
    pub origin: String,

    /// Keep field ids stable across renders
    #[arg(long)]
    pub stable_ids: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = EditorConfig {
        origin: args.origin,
        id_policy: if args.stable_ids {
            IdPolicy::Stable
        } else {
            IdPolicy::PerRender
        },
        ..EditorConfig::default()
    };

    fs::write(&config_path, config.to_json()?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!("    origin:      {}", config.origin.cyan());
    println!("    mount delay: {}ms", config.mount_delay_ms);
    println!();
    println!("Next steps:");
    println!("  1. Export your content values to a registry JSON file");
    println!("  2. Run: resonance fields <registry> <scope> <descriptors>");

    Ok(())
}

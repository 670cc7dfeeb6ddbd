use super::{load_descriptors, load_registry, resolve};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use resonance_content::{
    bind as bind_tree, editable_sites, resolve as resolve_values, OverrideLayer,
};
use resonance_vdom::{render_html, RenderOptions, VirtualDomDocument};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct BindArgs {
    /// Registry JSON with persisted content values
    pub registry: PathBuf,

    /// Scope whose bundle supplies the values
    pub scope: String,

    /// Attribute descriptors (JSON array)
    pub descriptors: PathBuf,

    /// Rendered tree (JSON)
    pub tree: PathBuf,

    /// Print the bound tree as JSON instead of HTML
    #[arg(long)]
    pub json: bool,

    /// Pretty print HTML output
    #[arg(long)]
    pub pretty: bool,
}

pub fn bind(args: BindArgs, cwd: &Path) -> Result<()> {
    let registry = load_registry(cwd, &args.registry)?;
    let descriptors = load_descriptors(cwd, &args.descriptors)?;

    let tree_path = resolve(cwd, &args.tree);
    let source = fs::read_to_string(&tree_path)
        .with_context(|| format!("Failed to read tree {}", tree_path.display()))?;
    let tree = VirtualDomDocument::from_json(&source)?.into_root();

    let bundle = registry.bundle_for(&args.scope);
    let values = resolve_values(&bundle, &OverrideLayer::new(), &descriptors);
    debug!(scope = %args.scope, values = values.len(), "Binding tree");
    let outcome = bind_tree(&tree, &args.scope, &descriptors, &values);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.tree)?);
    } else {
        let options = RenderOptions {
            pretty: args.pretty,
            ..RenderOptions::default()
        };
        println!("{}", render_html(&outcome.tree, &options));
    }

    for site in editable_sites(&outcome.tree) {
        eprintln!(
            "  {} {} {} ({})",
            "✓".green(),
            site.control,
            site.attribute,
            site.path
        );
    }
    for key in &outcome.unmatched {
        eprintln!("  {} no node for {}", "•".yellow(), key);
    }

    Ok(())
}

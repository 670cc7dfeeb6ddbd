use super::{load_descriptors, load_registry};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use resonance_content::{ContentScope, EditMode, FieldEmitter, RenderContext};
use resonance_editor::EditorConfig;
use resonance_markup::Sanitizer;
use resonance_vdom::VNode;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Args)]
pub struct FieldsArgs {
    /// Registry JSON with persisted content values
    pub registry: PathBuf,

    /// Scope to emit
    pub scope: String,

    /// Attribute descriptors (JSON array)
    pub descriptors: PathBuf,
}

pub fn fields(args: FieldsArgs, cwd: &Path) -> Result<()> {
    let config = EditorConfig::load(cwd)?;
    let registry = load_registry(cwd, &args.registry)?;
    let descriptors = load_descriptors(cwd, &args.descriptors)?;

    debug!(scope = %args.scope, descriptors = descriptors.len(), "Emitting fields");
    let sanitizer = Arc::new(Sanitizer::new(config.sanitizer.clone()));
    let mut scope = ContentScope::new(&args.scope, registry.bundle_for(&args.scope), sanitizer);
    let ctx = RenderContext::new(EditMode::Editing);
    scope.attributes(&ctx, &descriptors, |_| VNode::fragment(Vec::new()))?;

    let mut emitter = FieldEmitter::new(config.id_policy);
    let fields = scope.collect_fields(&mut emitter);

    println!("{}", serde_json::to_string_pretty(&fields)?);
    eprintln!(
        "  {} {} fields for {}",
        "✓".green(),
        fields.len(),
        args.scope.cyan()
    );

    Ok(())
}

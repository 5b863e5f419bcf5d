//! Subcommand implementations
//!
//! Each `execute` returns whether the command succeeded. Unknown symbols
//! and error diagnostics are reported on stdout and give exit code 1.

pub mod check;
pub mod imports;
pub mod lookup;
pub mod resolve;

use anyhow::Context;
use mosaic_engine::CompositeServiceSet;
use mosaic_project::Project;
use std::path::Path;

use crate::output::StyledOutput;

/// Load the project from `--manifest`, or search upward from the current directory
pub fn load_project(manifest: Option<&Path>) -> anyhow::Result<Project> {
    let project = match manifest {
        Some(path) => Project::load(path)
            .with_context(|| format!("failed to load project from {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            Project::discover(&cwd)?
        }
    };
    tracing::debug!(root = %project.root().display(), "using project");
    Ok(project)
}

/// Print the import lists of a service set
pub fn print_services(out: &mut StyledOutput, services: &CompositeServiceSet) {
    let join = |items: Vec<String>| {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.join(", ")
        }
    };
    out.field(
        "default imports",
        &join(services.default_imports.iter().map(ToString::to_string).collect()),
    );
    out.field(
        "low-priority imports",
        &join(services.low_priority_imports.iter().map(ToString::to_string).collect()),
    );
    out.field(
        "excluded",
        &join(services.excluded_imports.iter().map(ToString::to_string).collect()),
    );
}

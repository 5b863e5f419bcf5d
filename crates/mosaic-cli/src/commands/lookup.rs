//! `mosaic lookup`: resolve a qualified name from a module.

use super::load_project;
use crate::output::StyledOutput;
use mosaic_engine::FqName;
use std::path::Path;

pub fn execute(
    out: &mut StyledOutput,
    manifest: Option<&Path>,
    module: &str,
    fq_name: &str,
) -> anyhow::Result<bool> {
    let project = load_project(manifest)?;
    let module = project.module(module)?.clone();
    let fq_name = FqName::new(fq_name);

    let Some(symbol) = project.resolver().find_symbol(&module, &fq_name)? else {
        out.error("not found");
        out.plain(&format!(": {} is not visible from {}", fq_name, module));
        out.newline();
        return Ok(false);
    };

    out.success(&symbol.fq_name.to_string());
    out.newline();
    out.field("kind", &symbol.kind.to_string());
    out.field("source", &symbol.source.to_string());
    out.field("origin", &symbol.origin);
    if let Some(class) = &symbol.class {
        out.field("descriptor module", class.module.name());
        if !class.supertypes.is_empty() {
            let supertypes: Vec<String> =
                class.supertypes.iter().map(ToString::to_string).collect();
            out.field("supertypes", &supertypes.join(", "));
        }
        if let Some(part) = &class.package_part {
            out.field("package part", part);
        }
    }
    Ok(true)
}

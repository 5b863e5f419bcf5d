//! `mosaic check`: run declaration checkers over modules.

use super::load_project;
use crate::output::StyledOutput;
use mosaic_engine::Severity;
use std::path::Path;

pub fn execute(
    out: &mut StyledOutput,
    manifest: Option<&Path>,
    modules: &[String],
) -> anyhow::Result<bool> {
    let project = load_project(manifest)?;
    let resolver = project.resolver();

    let mut errors = 0usize;
    let mut warnings = 0usize;
    for module in project.select_modules(modules)? {
        let module_resolver = resolver.resolver_for_module(&module)?;
        for diagnostic in module_resolver.container().check_declarations() {
            match diagnostic.severity {
                Severity::Error => {
                    errors += 1;
                    out.error("error");
                }
                Severity::Warning => {
                    warnings += 1;
                    out.warning("warning");
                }
            }
            out.plain(&format!(
                "[{}] {}: {} ({})",
                diagnostic.checker, module, diagnostic.message, diagnostic.fq_name
            ));
            out.newline();
        }
    }

    let summary = format!("{} error(s), {} warning(s)", errors, warnings);
    if errors > 0 {
        out.error(&summary);
    } else {
        out.success(&summary);
    }
    out.newline();
    Ok(errors == 0)
}

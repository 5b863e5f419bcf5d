//! `mosaic resolve`: build module resolvers and describe them.

use super::{load_project, print_services};
use crate::output::StyledOutput;
use crate::Format;
use mosaic_engine::{ModuleInfo, ResolverForModule};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ModuleReport {
    module: String,
    platform: String,
    kind: &'static str,
    providers: Vec<ProviderReport>,
    checkers: Vec<String>,
    extensions: Vec<String>,
    default_imports: Vec<String>,
    low_priority_imports: Vec<String>,
    excluded_imports: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ProviderReport {
    source: String,
    description: String,
}

impl ModuleReport {
    fn new(module: &ModuleInfo, resolver: &ResolverForModule) -> Self {
        let container = resolver.container();
        let services = container.services();
        Self {
            module: module.name().to_string(),
            platform: container.platform().to_string(),
            kind: if module.is_library() { "library" } else { "source" },
            providers: resolver
                .symbol_provider()
                .providers()
                .iter()
                .map(|provider| ProviderReport {
                    source: provider.source().to_string(),
                    description: provider.describe(),
                })
                .collect(),
            checkers: container
                .checkers()
                .iter()
                .map(|checker| format!("{} ({})", checker.kind, checker.registered_by))
                .collect(),
            extensions: container
                .extensions()
                .iter()
                .map(|extension| format!("{} ({})", extension.kind, extension.provided_by))
                .collect(),
            default_imports: services.default_imports.iter().map(ToString::to_string).collect(),
            low_priority_imports: services
                .low_priority_imports
                .iter()
                .map(ToString::to_string)
                .collect(),
            excluded_imports: services.excluded_imports.iter().map(ToString::to_string).collect(),
        }
    }
}

pub fn execute(
    out: &mut StyledOutput,
    manifest: Option<&Path>,
    modules: &[String],
    format: Format,
) -> anyhow::Result<bool> {
    let project = load_project(manifest)?;
    let resolver = project.resolver();

    let mut reports = Vec::new();
    for module in project.select_modules(modules)? {
        let module_resolver = resolver.resolver_for_module(&module)?;
        if format == Format::Pretty {
            print_module(out, &module, &module_resolver);
        } else {
            reports.push(ModuleReport::new(&module, &module_resolver));
        }
    }

    if format == Format::Json {
        out.plain(&serde_json::to_string_pretty(&reports)?);
        out.newline();
    } else {
        let stats = resolver.cache().stats();
        out.plain(&format!(
            "{} module(s) resolved, {} built",
            stats.entries, stats.builds
        ));
        out.newline();
    }
    Ok(true)
}

fn print_module(out: &mut StyledOutput, module: &ModuleInfo, resolver: &ResolverForModule) {
    let container = resolver.container();

    out.success(module.name());
    out.plain(" ");
    out.info(&format!("[{}]", container.platform()));
    if module.is_library() {
        out.plain(" library");
    }
    out.newline();

    out.bold("  providers");
    out.newline();
    for (i, provider) in resolver.symbol_provider().providers().iter().enumerate() {
        out.plain(&format!("    {}. {} ({})", i + 1, provider.describe(), provider.source()));
        out.newline();
    }

    let checkers: Vec<String> = container
        .checkers()
        .iter()
        .map(|checker| checker.kind.to_string())
        .collect();
    out.field("checkers", &checkers.join(", "));

    let extensions: Vec<String> = container
        .extensions()
        .iter()
        .map(|extension| format!("{} ({})", extension.kind, extension.provided_by))
        .collect();
    if !extensions.is_empty() {
        out.field("extensions", &extensions.join(", "));
    }

    print_services(out, container.services());
    out.newline();
}

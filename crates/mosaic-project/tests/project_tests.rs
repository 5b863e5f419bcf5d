//! Integration tests for loading projects from mosaic.toml
//!
//! Each test writes a project directory with tempfile and resolves modules
//! through the manifest-backed environment.

use mosaic_engine::{FqName, Severity, SymbolSource};
use mosaic_project::{ManifestError, Project, ProjectError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MANIFEST: &str = r#"
[project]
name = "demo"
language-version = "2.0"
api-version = "1.9"

[[module]]
name = "stdlib-common"
kind = "library"
platforms = ["common"]
metadata = [
    { package = "lang.text", declarations = [{ name = "StringBuilder", kind = "class", expect = true }] },
]

[[module]]
name = "host"
platforms = ["jvm"]
java-classes = [
    { name = "demo.jvm.Host", supertypes = ["java.lang.Object"] },
    { name = "demo.jvm.Port" },
]

[[module]]
name = "shared"
platforms = ["jvm", "common"]
dependencies = ["stdlib-common", "host"]

[[module.files]]
name = "Greeter.kt"
package = "demo"
declarations = [
    { name = "Greeter", kind = "class" },
    { name = "Clock", kind = "class", expect = true },
]

[[module.files]]
name = "Text.kt"
package = "lang.text"
declarations = [{ name = "StringBuilder", kind = "class", actual = true }]

[[module]]
name = "web-lib"
kind = "library"
platforms = ["js"]
roots = ["web"]

[[module]]
name = "posix"
kind = "library"
platforms = ["native"]
metadata = [{ package = "posix.io", declarations = [{ name = "File", kind = "class" }] }]

[[module]]
name = "cli"
platforms = ["native"]
native = true
dependencies = ["posix"]
"#;

fn write_project(dir: &Path) {
    fs::write(dir.join("mosaic.toml"), MANIFEST).unwrap();
    let web = dir.join("web");
    fs::create_dir_all(&web).unwrap();
    fs::write(
        web.join("dom.jsmeta"),
        r#"{
            "version": [1, 4, 0],
            "body": {
                "header": { "module-name": "web-dom" },
                "packages": [{ "package": "web.dom", "declarations": [{ "name": "Element", "kind": "class" }] }]
            }
        }"#,
    )
    .unwrap();
    fs::write(
        web.join("future.jsmeta"),
        r#"{ "version": [2, 0, 0], "body": { "not": "decodable" } }"#,
    )
    .unwrap();
}

fn load() -> (TempDir, Project) {
    let dir = TempDir::new().unwrap();
    write_project(dir.path());
    let project = Project::load(dir.path()).unwrap();
    (dir, project)
}

#[test]
fn test_load_from_directory() {
    let (_dir, project) = load();
    let resolver = project.resolver();

    assert_eq!(resolver.name(), "demo");
    let names: Vec<&str> = resolver.modules().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["stdlib-common", "host", "shared", "web-lib", "posix", "cli"]);
    assert_eq!(resolver.settings().api_version.to_string(), "1.9");
}

#[test]
fn test_discover_from_subdirectory() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path());
    let nested = dir.path().join("src").join("deep");
    fs::create_dir_all(&nested).unwrap();

    let project = Project::discover(&nested).unwrap();
    assert_eq!(project.manifest().project.name, "demo");
    assert_eq!(project.root(), dir.path());
}

#[test]
fn test_missing_and_invalid_manifests() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Project::load(dir.path()),
        Err(ProjectError::Manifest(ManifestError::IoError(_)))
    ));

    fs::write(
        dir.path().join("mosaic.toml"),
        "[project]\nname = \"demo\"\n\n[[module]]\nname = \"app\"\ndependencies = [\"ghost\"]\n",
    )
    .unwrap();
    assert!(matches!(
        Project::load(dir.path()),
        Err(ProjectError::Manifest(ManifestError::ValidationError(_)))
    ));
}

#[test]
fn test_jvm_common_module_surface() {
    let (_dir, project) = load();
    let shared = project.module("shared").unwrap().clone();
    let resolver = project.resolver().resolver_for_module(&shared).unwrap();

    assert_eq!(
        resolver.symbol_provider().sources(),
        vec![SymbolSource::Module, SymbolSource::CommonMetadata, SymbolSource::Jvm]
    );

    let greeter = resolver.symbol_provider().find(&FqName::new("demo.Greeter")).unwrap();
    assert_eq!(greeter.source, SymbolSource::Module);

    // The module's actual shadows the library's expect
    let builder = resolver
        .symbol_provider()
        .find(&FqName::new("lang.text.StringBuilder"))
        .unwrap();
    assert_eq!(builder.source, SymbolSource::Module);

    let jvm_parts = resolver.container().package_parts().package_parts(&FqName::new("demo"));
    assert_eq!(jvm_parts, vec!["demo/GreeterKt".to_string()]);
}

#[test]
fn test_java_class_resolved_by_owner_once_built() {
    let (_dir, project) = load();
    let resolver = project.resolver();
    let host = project.module("host").unwrap().clone();
    let shared = project.module("shared").unwrap().clone();
    let class = FqName::new("demo.jvm.Host");

    // Owner not built yet: resolved locally
    let local = resolver.find_symbol(&shared, &class).unwrap().unwrap();
    assert_eq!(local.source, SymbolSource::Jvm);
    assert_eq!(local.origin, "shared");
    assert_eq!(
        local.class.as_ref().unwrap().supertypes,
        vec![FqName::new("java.lang.Object")]
    );

    resolver.resolver_for_module(&host).unwrap();
    let port = resolver
        .find_symbol(&shared, &FqName::new("demo.jvm.Port"))
        .unwrap()
        .unwrap();
    assert_eq!(port.origin, "host");

    // The earlier resolution is kept
    let again = resolver.find_symbol(&shared, &class).unwrap().unwrap();
    assert_eq!(again, local);
}

#[test]
fn test_expect_without_actual_reported() {
    let (_dir, project) = load();
    let shared = project.module("shared").unwrap().clone();
    let resolver = project.resolver().resolver_for_module(&shared).unwrap();

    let diagnostics = resolver.container().check_declarations();
    assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
    assert_eq!(diagnostics[0].fq_name, FqName::new("demo.Clock"));
    assert_eq!(diagnostics[0].severity, Severity::Error);
}

#[test]
fn test_js_library_reads_compatible_metadata() {
    let (_dir, project) = load();
    let web = project.module("web-lib").unwrap().clone();
    let resolver = project.resolver().resolver_for_module(&web).unwrap();

    // The 2.0.0 artifact is skipped before its body is decoded
    assert_eq!(
        resolver.symbol_provider().sources(),
        vec![SymbolSource::Module, SymbolSource::JsMetadata]
    );
    let element = resolver.symbol_provider().find(&FqName::new("web.dom.Element")).unwrap();
    assert_eq!(element.source, SymbolSource::JsMetadata);
    assert!(resolver.symbol_provider().package_exists(&FqName::new("web")));
}

#[test]
fn test_native_module_gets_native_fragments() {
    let (_dir, project) = load();
    let resolver = project.resolver();

    let cli = resolver
        .resolver_for_module(project.module("cli").unwrap())
        .unwrap();
    assert_eq!(
        cli.symbol_provider().sources(),
        vec![SymbolSource::Module, SymbolSource::Native]
    );
    let file = cli.symbol_provider().find(&FqName::new("posix.io.File")).unwrap();
    assert_eq!(file.origin, "posix");

    let posix = resolver
        .resolver_for_module(project.module("posix").unwrap())
        .unwrap();
    assert_eq!(posix.symbol_provider().sources(), vec![SymbolSource::Module]);
}

#[test]
fn test_select_modules() {
    let (_dir, project) = load();
    assert_eq!(project.select_modules(&[]).unwrap().len(), 6);

    let picked = project
        .select_modules(&["cli".to_string(), "host".to_string()])
        .unwrap();
    assert_eq!(picked[0].name(), "cli");
    assert!(matches!(
        project.select_modules(&["nope".to_string()]),
        Err(ProjectError::UnknownModule(name)) if name == "nope"
    ));
}

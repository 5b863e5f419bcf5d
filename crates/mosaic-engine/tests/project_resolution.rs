//! Integration tests for project-level module resolution
//!
//! Covers resolver caching, provider composition order, cross-module class
//! resolution between mutually referencing modules, and JS metadata
//! filtering.

mod support;

use mosaic_engine::container::{ContainerBuilder, JavaClass};
use mosaic_engine::fragments::MetadataVersion;
use mosaic_engine::module::{Declaration, DeclarationKind, MetadataPart, SyntheticFile};
use mosaic_engine::{
    CheckerKind, FileBasedDeclarationProviderFactory, FqName, LanguageVersionSettings,
    ModuleContent, ModuleInfo, ProjectEnvironment, ResolveError, ResolverForProject,
    SymbolSource, TargetPlatform,
};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::{Arc, Barrier, Weak};
use std::thread;
use support::{js_artifact, owned_by_prefix, StaticClasses, StaticMetadata, StaticParts};

fn environment(
    parts: StaticParts,
    ownership: Vec<(&'static str, ModuleInfo)>,
) -> ProjectEnvironment {
    let parts = Arc::new(parts);
    ProjectEnvironment::new(
        Arc::new(FileBasedDeclarationProviderFactory),
        parts.clone(),
        parts,
        Arc::new(owned_by_prefix(ownership)),
    )
}

fn greeter_file() -> SyntheticFile {
    SyntheticFile::new(
        "Greeter.kt",
        "demo",
        vec![Declaration::new("Greeter", DeclarationKind::Class)],
    )
}

#[test]
fn test_resolver_is_cached() {
    let app = ModuleInfo::source("app", TargetPlatform::js());
    let project = ResolverForProject::new(
        "demo",
        vec![ModuleContent::new(app.clone(), vec![greeter_file()], Vec::new())],
        LanguageVersionSettings::default(),
        TargetPlatform::js(),
        environment(StaticParts::default(), Vec::new()),
    );

    assert!(project.try_get_resolver_for_module(&app).is_none());
    let first = project.resolver_for_module(&app).unwrap();
    let second = project.resolver_for_module(&app).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &project.try_get_resolver_for_module(&app).unwrap()));
    assert_eq!(project.cache().stats().builds, 1);
}

#[test]
fn test_concurrent_requests_build_once() {
    let app = ModuleInfo::source("app", TargetPlatform::js());
    let project = ResolverForProject::new(
        "demo",
        vec![ModuleContent::new(app.clone(), vec![greeter_file()], Vec::new())],
        LanguageVersionSettings::default(),
        TargetPlatform::js(),
        environment(StaticParts::default(), Vec::new()),
    );

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let project = Arc::clone(&project);
            let barrier = Arc::clone(&barrier);
            let app = app.clone();
            thread::spawn(move || {
                barrier.wait();
                project.resolver_for_module(&app).unwrap()
            })
        })
        .collect();

    let resolvers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(resolvers.iter().all(|r| Arc::ptr_eq(r, &resolvers[0])));
    assert_eq!(project.cache().stats().builds, 1);
}

#[test]
fn test_unknown_module() {
    let project = ResolverForProject::new(
        "demo",
        Vec::new(),
        LanguageVersionSettings::default(),
        TargetPlatform::js(),
        environment(StaticParts::default(), Vec::new()),
    );
    let ghost = ModuleInfo::source("ghost", TargetPlatform::js());
    assert_eq!(
        project.resolver_for_module(&ghost).unwrap_err(),
        ResolveError::UnknownModule("ghost".to_string())
    );
}

#[test]
fn test_provider_order_for_jvm_common() {
    let app = ModuleInfo::source("app", TargetPlatform::parse("jvm,common").unwrap());
    let parts = StaticParts {
        metadata: vec![MetadataPart {
            package: FqName::new("demo"),
            declarations: vec![
                Declaration::expect("demo.Greeter", DeclarationKind::Class),
                Declaration::expect("demo.Clock", DeclarationKind::Class),
            ],
            origin: "demo-common".to_string(),
        }],
        facades: Vec::new(),
    };
    let env = environment(parts, vec![("java", app.clone())])
        .with_java_classes(Arc::new(StaticClasses(vec![JavaClass::new("java.util.Random")])));
    let project = ResolverForProject::new(
        "demo",
        vec![ModuleContent::new(app.clone(), vec![greeter_file()], Vec::new())],
        LanguageVersionSettings::default(),
        TargetPlatform::jvm(),
        env,
    );

    let resolver = project.resolver_for_module(&app).unwrap();
    let surface = resolver.symbol_provider();
    assert_eq!(
        surface.sources(),
        vec![SymbolSource::Module, SymbolSource::CommonMetadata, SymbolSource::Jvm]
    );

    // Own declarations shadow common metadata
    let greeter = surface.find(&FqName::new("demo.Greeter")).unwrap();
    assert_eq!(greeter.source, SymbolSource::Module);
    let clock = surface.find(&FqName::new("demo.Clock")).unwrap();
    assert_eq!(clock.source, SymbolSource::CommonMetadata);
    let random = surface.find(&FqName::new("java.util.Random")).unwrap();
    assert_eq!(random.source, SymbolSource::Jvm);
    assert_eq!(random.class.unwrap().module, app);

    assert_eq!(
        resolver
            .container()
            .checker_count(CheckerKind::ExpectedActualDeclaration),
        1
    );
}

#[test]
fn test_js_metadata_filtering() {
    let lib = ModuleInfo::library("html", TargetPlatform::js(), vec![PathBuf::from("/libs/html")]);
    let loader = StaticMetadata(vec![
        js_artifact("html-core", MetadataVersion::new(1, 4, 0), "html", "Tag"),
        js_artifact("html-next", MetadataVersion::new(1, 9, 0), "html", "Future"),
        js_artifact("html-dom", MetadataVersion::new(1, 2, 3), "html.dom", "Node"),
        js_artifact("html-old", MetadataVersion::new(0, 9, 0), "html", "Legacy"),
    ]);
    let env = environment(StaticParts::default(), Vec::new())
        .with_library_metadata(Arc::new(loader));
    let project = ResolverForProject::new(
        "demo",
        vec![ModuleContent::new(lib.clone(), Vec::new(), Vec::new())],
        LanguageVersionSettings::default(),
        TargetPlatform::js(),
        env,
    );

    let resolver = project.resolver_for_module(&lib).unwrap();
    let surface = resolver.symbol_provider();
    assert_eq!(
        surface.sources(),
        vec![SymbolSource::Module, SymbolSource::JsMetadata, SymbolSource::JsMetadata]
    );
    assert!(surface.find(&FqName::new("html.Tag")).is_some());
    assert!(surface.find(&FqName::new("html.dom.Node")).is_some());
    assert!(surface.find(&FqName::new("html.Future")).is_none());
    assert!(surface.find(&FqName::new("html.Legacy")).is_none());
}

#[test]
fn test_js_metadata_ignored_for_source_modules() {
    let app = ModuleInfo::source("app", TargetPlatform::js());
    let loader = StaticMetadata(vec![js_artifact(
        "html-core",
        MetadataVersion::CURRENT,
        "html",
        "Tag",
    )]);
    let env = environment(StaticParts::default(), Vec::new())
        .with_library_metadata(Arc::new(loader));
    let project = ResolverForProject::new(
        "demo",
        vec![ModuleContent::new(app.clone(), Vec::new(), Vec::new())],
        LanguageVersionSettings::default(),
        TargetPlatform::js(),
        env,
    );

    let resolver = project.resolver_for_module(&app).unwrap();
    assert_eq!(resolver.symbol_provider().sources(), vec![SymbolSource::Module]);
}

#[test]
fn test_class_owned_by_non_jvm_module_resolves_locally() {
    let app = ModuleInfo::source("app", TargetPlatform::jvm());
    let web = ModuleInfo::source("web", TargetPlatform::js());
    let env = environment(StaticParts::default(), vec![("web", web.clone())])
        .with_java_classes(Arc::new(StaticClasses(vec![JavaClass::new("web.Widget")])));
    let project = ResolverForProject::new(
        "demo",
        vec![
            ModuleContent::new(app.clone(), Vec::new(), vec![web.clone()]),
            ModuleContent::new(web.clone(), Vec::new(), Vec::new()),
        ],
        LanguageVersionSettings::default(),
        TargetPlatform::jvm(),
        env,
    );

    // The owner is built and available, but does not target JVM
    project.resolver_for_module(&web).unwrap();
    let symbol = project
        .find_symbol(&app, &FqName::new("web.Widget"))
        .unwrap()
        .unwrap();
    assert_eq!(symbol.class.unwrap().module, app);
}

fn owner_project(
    default_platform: TargetPlatform,
) -> (Arc<ResolverForProject>, ModuleInfo, ModuleInfo) {
    let app = ModuleInfo::source("app", TargetPlatform::jvm());
    let core = ModuleInfo::new("core", None, mosaic_engine::ModuleKind::Source);
    let env = environment(StaticParts::default(), vec![("core", core.clone())])
        .with_java_classes(Arc::new(StaticClasses(vec![
            JavaClass::new("core.Engine"),
            JavaClass::new("core.Gear"),
        ])));
    let project = ResolverForProject::new(
        "demo",
        vec![
            ModuleContent::new(app.clone(), Vec::new(), vec![core.clone()]),
            ModuleContent::new(core.clone(), Vec::new(), Vec::new()),
        ],
        LanguageVersionSettings::default(),
        default_platform,
        env,
    );
    (project, app, core)
}

#[test]
fn test_class_owned_by_built_jvm_module_uses_owner() {
    let (project, app, core) = owner_project(TargetPlatform::jvm());

    let engine = FqName::new("core.Engine");
    let before = project.find_symbol(&app, &engine).unwrap().unwrap();
    assert_eq!(before.class.as_ref().unwrap().module, app);

    // Once the unrestricted owner is built, its resolver is authoritative
    // for classes the module has not resolved yet
    project.resolver_for_module(&core).unwrap();
    let gear = project.find_symbol(&app, &FqName::new("core.Gear")).unwrap().unwrap();
    assert_eq!(gear.class.unwrap().module, core);

    // An earlier resolution keeps its descriptor
    let after = project.find_symbol(&app, &engine).unwrap().unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_repeated_class_resolution_is_stable() {
    let (project, app, core) = owner_project(TargetPlatform::jvm());
    let class_resolver = {
        let resolver = project.resolver_for_module(&app).unwrap();
        let jvm = resolver.container().jvm().unwrap();
        Arc::clone(jvm.module_class_resolver())
    };

    let engine = JavaClass::new("core.Engine");
    let first = class_resolver.resolve_class(&engine).unwrap();
    project.resolver_for_module(&core).unwrap();
    let second = class_resolver.resolve_class(&engine).unwrap();

    assert_eq!(first, second);
    assert_eq!(second.module, app);
}

#[test]
fn test_unrestricted_owner_without_jvm_falls_back_locally() {
    let (project, app, core) = owner_project(TargetPlatform::js());

    let engine = FqName::new("core.Engine");
    let before = project.find_symbol(&app, &engine).unwrap().unwrap();
    assert_eq!(before.source, SymbolSource::Jvm);

    // core is built for the JS default platform and has no Java classes
    let owner = project.resolver_for_module(&core).unwrap();
    assert!(owner.java_class_resolver().is_none());

    let gear = project.find_symbol(&app, &FqName::new("core.Gear")).unwrap().unwrap();
    assert_eq!(gear.source, SymbolSource::Jvm);
    assert_eq!(gear.class.unwrap().module, app);

    let after = project.find_symbol(&app, &engine).unwrap().unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_mutually_referencing_modules_terminate() {
    let alpha = ModuleInfo::source("alpha", TargetPlatform::jvm());
    let beta = ModuleInfo::source("beta", TargetPlatform::jvm());

    let handle: Arc<OnceCell<Weak<ResolverForProject>>> = Arc::new(OnceCell::new());
    let outcomes: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    // While one module is being built, look up the other module's class
    // through the other module's resolver.
    let hook = {
        let handle = Arc::clone(&handle);
        let outcomes = Arc::clone(&outcomes);
        let (alpha, beta) = (alpha.clone(), beta.clone());
        Arc::new(move |builder: &mut ContainerBuilder| {
            let Some(project) = handle.get().and_then(Weak::upgrade) else {
                return;
            };
            let (other, class) = if *builder.context().module() == alpha {
                (&beta, "alpha.Alpha")
            } else {
                (&alpha, "beta.Beta")
            };
            let outcome = match project.resolver_for_module(other) {
                Ok(resolver) => match resolver.symbol_provider().find(&FqName::new(class)) {
                    Some(symbol) => format!(
                        "{} via {}",
                        class,
                        symbol.class.map(|c| c.module.name().to_string()).unwrap_or_default()
                    ),
                    None => format!("{} unresolved", class),
                },
                Err(err) => format!("{} failed: {}", class, err),
            };
            outcomes.lock().push(outcome);
        })
    };

    let env = environment(
        StaticParts::default(),
        vec![("alpha", alpha.clone()), ("beta", beta.clone())],
    )
    .with_java_classes(Arc::new(StaticClasses(vec![
        JavaClass::new("alpha.Alpha"),
        JavaClass::new("beta.Beta").with_supertype("alpha.Alpha"),
    ])))
    .with_post_configure(hook);

    let project = ResolverForProject::new(
        "demo",
        vec![
            ModuleContent::new(alpha.clone(), Vec::new(), vec![beta.clone()]),
            ModuleContent::new(beta.clone(), Vec::new(), vec![alpha.clone()]),
        ],
        LanguageVersionSettings::default(),
        TargetPlatform::jvm(),
        env,
    );
    handle.set(Arc::downgrade(&project)).unwrap();

    project.resolver_for_module(&alpha).unwrap();
    assert!(project.cache().contains(&alpha));
    assert!(project.cache().contains(&beta));

    let outcomes = outcomes.lock().clone();
    assert_eq!(outcomes.len(), 2);
    // beta's build re-entered alpha on the same thread and was refused
    assert!(outcomes[0].starts_with("beta.Beta failed"));
    // alpha was still building, so beta resolved alpha's class itself
    assert_eq!(outcomes[1], "alpha.Alpha via beta");

    // After both are built, a first lookup goes through the owner
    let from_alpha = project.find_symbol(&alpha, &FqName::new("beta.Beta")).unwrap().unwrap();
    assert_eq!(from_alpha.class.unwrap().module, beta);
    // beta keeps the descriptor it produced while alpha was building
    let from_beta = project.find_symbol(&beta, &FqName::new("alpha.Alpha")).unwrap().unwrap();
    assert_eq!(from_beta.class.unwrap().module, beta);
}

#[test]
fn test_failed_build_is_not_cached() {
    let app = ModuleInfo::source("app", TargetPlatform::js());

    struct NoPackageParts;

    impl mosaic_engine::module::PackagePartProviderFactory for NoPackageParts {
        fn create(
            &self,
            _content: &ModuleContent,
        ) -> Option<Arc<dyn mosaic_engine::module::PackagePartProvider>> {
            None
        }
    }

    let env = ProjectEnvironment::new(
        Arc::new(FileBasedDeclarationProviderFactory),
        Arc::new(NoPackageParts),
        Arc::new(StaticParts::default()),
        Arc::new(owned_by_prefix(Vec::new())),
    );
    let project = ResolverForProject::new(
        "demo",
        vec![ModuleContent::new(app.clone(), Vec::new(), Vec::new())],
        LanguageVersionSettings::default(),
        TargetPlatform::js(),
        env,
    );

    let err = project.resolver_for_module(&app).unwrap_err();
    assert!(matches!(err, ResolveError::Container(_)));
    assert!(!project.cache().contains(&app));
    assert!(project.try_get_resolver_for_module(&app).is_none());
}

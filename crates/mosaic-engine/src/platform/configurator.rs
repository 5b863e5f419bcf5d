//! Platform checker and extension configurators

use super::PlatformKind;
use crate::container::{CheckerKind, ContainerBuilder, ExtensionKind, Registrant};

/// Registers a platform's checkers and extensions into a container
///
/// Closed over the known platform kinds; a composite platform holds its
/// constituents in order and configures each of them in turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformConfigurator {
    /// JVM checkers and extensions
    Jvm,
    /// JS checkers and extensions
    Js,
    /// Common checkers
    Common,
    /// Native checkers and extensions
    Native,
    /// Constituent configurators in constituent order
    Composite(Vec<PlatformConfigurator>),
}

impl PlatformConfigurator {
    /// Configurator for a single platform kind
    pub fn for_kind(kind: PlatformKind) -> Self {
        match kind {
            PlatformKind::Jvm => PlatformConfigurator::Jvm,
            PlatformKind::Js => PlatformConfigurator::Js,
            PlatformKind::Common => PlatformConfigurator::Common,
            PlatformKind::Native => PlatformConfigurator::Native,
        }
    }

    /// Flattened platform kinds this configurator covers
    pub fn kinds(&self) -> Vec<PlatformKind> {
        match self {
            PlatformConfigurator::Jvm => vec![PlatformKind::Jvm],
            PlatformConfigurator::Js => vec![PlatformKind::Js],
            PlatformConfigurator::Common => vec![PlatformKind::Common],
            PlatformConfigurator::Native => vec![PlatformKind::Native],
            PlatformConfigurator::Composite(parts) => {
                parts.iter().flat_map(|part| part.kinds()).collect()
            }
        }
    }

    /// Register this configurator's checkers and extensions
    pub fn configure(&self, builder: &mut ContainerBuilder) {
        match self {
            PlatformConfigurator::Composite(parts) => {
                for part in parts {
                    part.configure(builder);
                }
            }
            single => {
                let Some(kind) = single.kinds().first().copied() else {
                    return;
                };
                let registrant = Registrant::Platform(kind);
                for checker in Self::checkers_for(kind) {
                    builder.register_checker(*checker, registrant);
                }
                for extension in Self::extensions_for(kind) {
                    builder.register_extension(*extension, kind);
                }
            }
        }
    }

    fn checkers_for(kind: PlatformKind) -> &'static [CheckerKind] {
        match kind {
            PlatformKind::Jvm => &[
                CheckerKind::ExpectedActualDeclaration,
                CheckerKind::JvmName,
                CheckerKind::JvmFieldApplicability,
                CheckerKind::JvmSyntheticApplicability,
            ],
            PlatformKind::Js => &[
                CheckerKind::ExpectedActualDeclaration,
                CheckerKind::JsReservedName,
                CheckerKind::JsModuleAnnotation,
                CheckerKind::JsDynamicCall,
            ],
            PlatformKind::Common => &[CheckerKind::ExpectedActualDeclaration],
            PlatformKind::Native => &[
                CheckerKind::ExpectedActualDeclaration,
                CheckerKind::NativeThrows,
                CheckerKind::NativeSharedImmutable,
            ],
        }
    }

    fn extensions_for(kind: PlatformKind) -> &'static [ExtensionKind] {
        match kind {
            PlatformKind::Jvm => &[
                ExtensionKind::IdentifierChecker,
                ExtensionKind::OverloadFilter,
                ExtensionKind::TypeSpecificityComparator,
                ExtensionKind::ClassMapper,
                ExtensionKind::SyntheticScopes,
            ],
            PlatformKind::Js => &[
                ExtensionKind::IdentifierChecker,
                ExtensionKind::TypeSpecificityComparator,
            ],
            PlatformKind::Common => &[],
            PlatformKind::Native => &[
                ExtensionKind::IdentifierChecker,
                ExtensionKind::ClassMapper,
            ],
        }
    }
}

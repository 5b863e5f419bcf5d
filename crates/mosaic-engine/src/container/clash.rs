//! Duplicate registration resolution
//!
//! When several constituent configurators register the same single-valued
//! kind, one registration is kept. The expected/actual checker is the
//! known case: every platform registers its own copy, and keeping them all
//! would report each expect/actual problem once per constituent.

use super::checkers::{Checker, CheckerKind, ExtensionKind, PlatformExtension};

/// What a clash resolver arbitrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClashTarget {
    /// Registrations of a checker kind
    Checker(CheckerKind),
    /// Registrations of an extension kind
    Extension(ExtensionKind),
}

/// Picks one registration among duplicates of the same kind
///
/// The policy is first-registered wins, so the result follows constituent
/// order and is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionClashResolver {
    target: ClashTarget,
}

impl ExtensionClashResolver {
    /// Resolver for duplicate checkers of `kind`
    pub fn for_checker(kind: CheckerKind) -> Self {
        Self {
            target: ClashTarget::Checker(kind),
        }
    }

    /// Resolver for duplicate extensions of `kind`
    pub fn for_extension(kind: ExtensionKind) -> Self {
        Self {
            target: ClashTarget::Extension(kind),
        }
    }

    /// What this resolver arbitrates
    pub fn target(&self) -> ClashTarget {
        self.target
    }

    /// Select one candidate; `None` only for an empty list
    pub fn resolve<'a, T>(&self, candidates: &'a [T]) -> Option<&'a T> {
        candidates.first()
    }

    /// Collapse duplicates of the target checker kind in place
    ///
    /// Checkers of other kinds keep their positions.
    pub fn apply_to_checkers(&self, checkers: &mut Vec<Checker>) {
        let ClashTarget::Checker(kind) = self.target else {
            return;
        };
        let candidates: Vec<Checker> =
            checkers.iter().filter(|c| c.kind == kind).copied().collect();
        if candidates.len() < 2 {
            return;
        }
        let Some(winner) = self.resolve(&candidates).copied() else {
            return;
        };

        tracing::debug!(
            checker = %kind,
            dropped = candidates.len() - 1,
            kept = %winner.registered_by,
            "resolved duplicate checker registrations"
        );
        let mut kept = false;
        checkers.retain(|checker| {
            if checker.kind != kind {
                return true;
            }
            if !kept && *checker == winner {
                kept = true;
                return true;
            }
            false
        });
    }

    /// Collapse duplicates of the target extension kind in place
    pub fn apply_to_extensions(&self, extensions: &mut Vec<PlatformExtension>) {
        let ClashTarget::Extension(kind) = self.target else {
            return;
        };
        let candidates: Vec<PlatformExtension> =
            extensions.iter().filter(|e| e.kind == kind).copied().collect();
        let Some(winner) = self.resolve(&candidates).copied() else {
            return;
        };

        let mut kept = false;
        extensions.retain(|extension| {
            if extension.kind != kind {
                return true;
            }
            if !kept && *extension == winner {
                kept = true;
                return true;
            }
            false
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::checkers::Registrant;
    use crate::platform::PlatformKind;

    fn checker(kind: CheckerKind, platform: PlatformKind) -> Checker {
        Checker {
            kind,
            registered_by: Registrant::Platform(platform),
        }
    }

    #[test]
    fn test_resolve_first_wins() {
        let resolver = ExtensionClashResolver::for_checker(CheckerKind::ExpectedActualDeclaration);
        assert_eq!(resolver.resolve(&[3, 1, 2]), Some(&3));
        assert_eq!(resolver.resolve::<u8>(&[]), None);
    }

    #[test]
    fn test_collapse_checkers() {
        let mut checkers = vec![
            checker(CheckerKind::ExpectedActualDeclaration, PlatformKind::Jvm),
            checker(CheckerKind::JvmName, PlatformKind::Jvm),
            checker(CheckerKind::ExpectedActualDeclaration, PlatformKind::Common),
        ];
        ExtensionClashResolver::for_checker(CheckerKind::ExpectedActualDeclaration)
            .apply_to_checkers(&mut checkers);

        assert_eq!(
            checkers,
            vec![
                checker(CheckerKind::ExpectedActualDeclaration, PlatformKind::Jvm),
                checker(CheckerKind::JvmName, PlatformKind::Jvm),
            ]
        );
    }

    #[test]
    fn test_other_kinds_untouched() {
        let mut checkers = vec![
            checker(CheckerKind::JvmName, PlatformKind::Jvm),
            checker(CheckerKind::JvmName, PlatformKind::Jvm),
        ];
        ExtensionClashResolver::for_checker(CheckerKind::ExpectedActualDeclaration)
            .apply_to_checkers(&mut checkers);
        assert_eq!(checkers.len(), 2);
    }

    #[test]
    fn test_collapse_extensions() {
        let mut extensions = vec![
            PlatformExtension {
                kind: ExtensionKind::IdentifierChecker,
                provided_by: PlatformKind::Js,
            },
            PlatformExtension {
                kind: ExtensionKind::ClassMapper,
                provided_by: PlatformKind::Native,
            },
            PlatformExtension {
                kind: ExtensionKind::IdentifierChecker,
                provided_by: PlatformKind::Native,
            },
        ];
        ExtensionClashResolver::for_extension(ExtensionKind::IdentifierChecker)
            .apply_to_extensions(&mut extensions);

        assert_eq!(extensions.len(), 2);
        assert_eq!(extensions[0].provided_by, PlatformKind::Js);
        assert_eq!(extensions[1].kind, ExtensionKind::ClassMapper);
    }
}

//! Declaration checkers and platform extensions

use super::components::CommonComponents;
use crate::module::Declaration;
use crate::platform::{FqName, PlatformKind, TargetPlatform};
use std::fmt;

/// Characters a JVM binary name may not contain
const JVM_PROHIBITED_CHARS: &[char] = &['.', ';', '[', ']', '/', '<', '>', ':', '\\'];

/// Words that cannot name a top-level JS declaration
const JS_RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "eval", "export", "extends", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "let", "new", "package", "private",
    "protected", "public", "static", "switch", "typeof", "var", "void", "while", "with", "yield",
];

/// Kinds of declaration checkers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CheckerKind {
    /// Usage of deprecated declarations
    DeprecatedUsage,
    /// Inline function parameter rules
    InlineParameters,
    /// `operator` modifier applicability
    OperatorModifier,
    /// `infix` modifier applicability
    InfixModifier,
    /// Opt-in marker usage
    ExperimentalUsage,
    /// `expect` declarations and their `actual` counterparts
    ExpectedActualDeclaration,
    /// Names that cannot be JVM binary names
    JvmName,
    /// `@JvmField` applicability
    JvmFieldApplicability,
    /// `@JvmSynthetic` applicability
    JvmSyntheticApplicability,
    /// Names reserved in JS
    JsReservedName,
    /// `@JsModule` usage
    JsModuleAnnotation,
    /// Calls on `dynamic` receivers
    JsDynamicCall,
    /// `@Throws` placement
    NativeThrows,
    /// `@SharedImmutable` placement
    NativeSharedImmutable,
}

impl CheckerKind {
    /// Checkers every platform registers before platform-specific ones
    pub const DEFAULTS: [CheckerKind; 5] = [
        CheckerKind::DeprecatedUsage,
        CheckerKind::InlineParameters,
        CheckerKind::OperatorModifier,
        CheckerKind::InfixModifier,
        CheckerKind::ExperimentalUsage,
    ];
}

impl fmt::Display for CheckerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Who registered a checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Registrant {
    /// Shared default set
    Default,
    /// A platform configurator
    Platform(PlatformKind),
    /// The embedding environment's post-configuration hook
    Environment,
}

impl fmt::Display for Registrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Registrant::Default => write!(f, "default"),
            Registrant::Platform(kind) => write!(f, "{}", kind),
            Registrant::Environment => write!(f, "environment"),
        }
    }
}

/// A registered checker instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checker {
    /// Checker kind
    pub kind: CheckerKind,
    /// Registrant
    pub registered_by: Registrant,
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Reported but compilation proceeds
    Warning,
    /// Compilation fails
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A finding reported by a checker
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// Reporting checker
    pub checker: CheckerKind,
    /// Severity
    pub severity: Severity,
    /// Declaration the finding is about
    pub fq_name: FqName,
    /// Message
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.severity, self.message, self.fq_name)
    }
}

/// What a checker sees besides the declaration itself
pub struct CheckContext<'a> {
    /// Platform of the module being checked
    pub platform: &'a TargetPlatform,
    /// All declarations of the module
    pub declarations: &'a [Declaration],
    /// Expect lookup, present when the platform includes Common
    pub common: Option<&'a CommonComponents>,
}

impl Checker {
    /// Run the checker against one declaration
    ///
    /// Checkers that need resolved bodies or annotations report nothing at
    /// this level.
    pub fn check(&self, decl: &Declaration, ctx: &CheckContext<'_>) -> Option<Diagnostic> {
        match self.kind {
            CheckerKind::ExpectedActualDeclaration => check_expected_actual(decl, ctx),
            CheckerKind::JvmName => check_jvm_name(decl),
            CheckerKind::JsReservedName => check_js_reserved_name(decl),
            _ => None,
        }
    }
}

fn check_expected_actual(decl: &Declaration, ctx: &CheckContext<'_>) -> Option<Diagnostic> {
    if decl.is_expect && decl.is_actual {
        return Some(Diagnostic {
            checker: CheckerKind::ExpectedActualDeclaration,
            severity: Severity::Error,
            fq_name: decl.fq_name.clone(),
            message: "declaration cannot be both expect and actual".to_string(),
        });
    }

    // Common-only modules leave their expects to platform modules.
    let platform_specific = ctx
        .platform
        .components()
        .iter()
        .any(|kind| *kind != PlatformKind::Common);
    if !platform_specific {
        return None;
    }

    if decl.is_actual {
        let common = ctx.common?;
        if common.find_expected(&decl.fq_name).is_some() {
            return None;
        }
        return Some(Diagnostic {
            checker: CheckerKind::ExpectedActualDeclaration,
            severity: Severity::Error,
            fq_name: decl.fq_name.clone(),
            message: format!(
                "actual {} '{}' has no corresponding expect declaration",
                decl.kind,
                decl.fq_name.short_name()
            ),
        });
    }

    if !decl.is_expect {
        return None;
    }

    let has_actual = ctx
        .declarations
        .iter()
        .any(|other| other.is_actual && other.fq_name == decl.fq_name);
    if has_actual {
        return None;
    }

    Some(Diagnostic {
        checker: CheckerKind::ExpectedActualDeclaration,
        severity: Severity::Error,
        fq_name: decl.fq_name.clone(),
        message: format!(
            "expect {} '{}' has no actual declaration for {}",
            decl.kind,
            decl.fq_name.short_name(),
            ctx.platform
        ),
    })
}

fn check_jvm_name(decl: &Declaration) -> Option<Diagnostic> {
    let name = decl.fq_name.short_name();
    let bad = name.chars().find(|c| JVM_PROHIBITED_CHARS.contains(c))?;
    Some(Diagnostic {
        checker: CheckerKind::JvmName,
        severity: Severity::Error,
        fq_name: decl.fq_name.clone(),
        message: format!("name '{}' contains '{}', which is prohibited on JVM", name, bad),
    })
}

fn check_js_reserved_name(decl: &Declaration) -> Option<Diagnostic> {
    let name = decl.fq_name.short_name();
    if !JS_RESERVED_WORDS.contains(&name) {
        return None;
    }
    Some(Diagnostic {
        checker: CheckerKind::JsReservedName,
        severity: Severity::Warning,
        fq_name: decl.fq_name.clone(),
        message: format!("name '{}' is reserved in JavaScript", name),
    })
}

/// Kinds of single-valued platform extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtensionKind {
    /// Validates identifiers against platform naming rules
    IdentifierChecker,
    /// Filters overload candidates hidden on the platform
    OverloadFilter,
    /// Breaks ties between equally specific platform types
    TypeSpecificityComparator,
    /// Maps platform classes to language classes
    ClassMapper,
    /// Synthetic member scopes (e.g. property accessors of platform classes)
    SyntheticScopes,
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A registered platform extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformExtension {
    /// Extension kind
    pub kind: ExtensionKind,
    /// Providing platform
    pub provided_by: PlatformKind,
}

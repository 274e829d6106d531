//! Finding types for key reachability analysis.
//!
//! This module defines every finding the engine can emit. Each finding is
//! self-contained: it carries the source context, the full key path and, when
//! one exists, the translation id, so the reporter never needs the key tree.

use enum_dispatch::enum_dispatch;

use crate::core::SourceContext;
use crate::core::tree::BuildError;

// ============================================================
// Severity and Kind
// ============================================================

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Kind identifier for each finding type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FindingKind {
    UnusedKey,
    AccessedButUndeclared,
    ReachedOnlyOpaquely,
    MisuseOfLazyKey,
    UnsupportedLeafShape,
    DuplicateKey,
    BuildError,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FindingKind::UnusedKey => write!(f, "unused-key"),
            FindingKind::AccessedButUndeclared => write!(f, "accessed-but-undeclared"),
            FindingKind::ReachedOnlyOpaquely => write!(f, "reached-only-opaquely"),
            FindingKind::MisuseOfLazyKey => write!(f, "misuse-of-lazy-key"),
            FindingKind::UnsupportedLeafShape => write!(f, "unsupported-leaf-shape"),
            FindingKind::DuplicateKey => write!(f, "duplicate-key"),
            FindingKind::BuildError => write!(f, "build-error"),
        }
    }
}

/// How a lazy key was misused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyMisuse {
    /// A plain string key was invoked: `LABELS.bird()`.
    CallOnPlainKey,
    /// A nested object was invoked: `LABELS.bird()` where `bird` has children.
    CallOnObject,
    /// A lazy key was accessed like an object: `LABELS.getBird.name`.
    AccessPastLazyKey,
}

impl std::fmt::Display for LazyMisuse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LazyMisuse::CallOnPlainKey => write!(f, "called a key that is not declared lazy"),
            LazyMisuse::CallOnObject => write!(f, "called a nested key object"),
            LazyMisuse::AccessPastLazyKey => {
                write!(f, "accessed a property of a lazy key without calling it")
            }
        }
    }
}

// ============================================================
// Finding Types - Key Tree (declaration site)
// ============================================================

/// Leaf key declared in `translate(...)` that no expression reaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedKeyFinding {
    pub context: SourceContext,
    /// Full key path including the binding, e.g. `LABELS.dog`.
    pub key_path: String,
    pub translation_id: String,
}

/// Leaf key reached only because an ancestor object was forwarded whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachedOnlyOpaquelyFinding {
    pub context: SourceContext,
    pub key_path: String,
    pub translation_id: String,
    /// Configured through `opaqueReachSeverity`.
    pub severity: Severity,
}

/// Property whose value is neither a string, a `[id, "lazy"]` pair nor an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLeafShapeFinding {
    pub context: SourceContext,
    pub key_path: String,
    /// Short description of what was found instead (e.g. "number literal").
    pub found: String,
}

/// Same key declared twice in one object literal. The later one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyFinding {
    pub context: SourceContext,
    pub key_path: String,
}

/// The whole `translate(...)` declaration could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildErrorFinding {
    pub context: SourceContext,
    /// Name of the variable the translate call is bound to.
    pub binding: String,
    pub error: BuildError,
}

// ============================================================
// Finding Types - Usage site
// ============================================================

/// Expression accesses a key that the translate call never declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessedButUndeclaredFinding {
    pub context: SourceContext,
    /// Accessed path including the binding, e.g. `LABELS.a.fish`.
    pub key_path: String,
}

/// Lazy key used as a plain value or plain key invoked as a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MisuseOfLazyKeyFinding {
    pub context: SourceContext,
    pub key_path: String,
    pub translation_id: Option<String>,
    pub misuse: LazyMisuse,
}

// ============================================================
// Finding Enum
// ============================================================

/// A finding produced by the analysis of one file.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    UnusedKey(UnusedKeyFinding),
    AccessedButUndeclared(AccessedButUndeclaredFinding),
    ReachedOnlyOpaquely(ReachedOnlyOpaquelyFinding),
    MisuseOfLazyKey(MisuseOfLazyKeyFinding),
    UnsupportedLeafShape(UnsupportedLeafShapeFinding),
    DuplicateKey(DuplicateKeyFinding),
    BuildError(BuildErrorFinding),
}

// ============================================================
// Report Trait
// ============================================================

/// Uniform view over every finding type, used by the reporters.
///
/// Dispatched on [`Finding`] with `enum_dispatch`.
#[enum_dispatch]
pub trait Report {
    /// Where the finding points (declaration site or usage site).
    fn context(&self) -> &SourceContext;

    fn kind(&self) -> FindingKind;

    fn severity(&self) -> Severity;

    /// Full key path including the binding name.
    fn key_path(&self) -> &str;

    fn translation_id(&self) -> Option<&str> {
        None
    }

    /// Primary message to display.
    fn message(&self) -> String;

    /// Optional hint for fixing the finding.
    fn hint(&self) -> Option<&str> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for UnusedKeyFinding {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn kind(&self) -> FindingKind {
        FindingKind::UnusedKey
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn key_path(&self) -> &str {
        &self.key_path
    }

    fn translation_id(&self) -> Option<&str> {
        Some(&self.translation_id)
    }

    fn message(&self) -> String {
        format!("{} is declared but never used", self.key_path)
    }

    fn hint(&self) -> Option<&str> {
        Some("remove the key from the translate() declaration")
    }
}

impl Report for ReachedOnlyOpaquelyFinding {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn kind(&self) -> FindingKind {
        FindingKind::ReachedOnlyOpaquely
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn key_path(&self) -> &str {
        &self.key_path
    }

    fn translation_id(&self) -> Option<&str> {
        Some(&self.translation_id)
    }

    fn message(&self) -> String {
        format!(
            "{} is only reached through a forwarded parent object",
            self.key_path
        )
    }
}

impl Report for UnsupportedLeafShapeFinding {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn kind(&self) -> FindingKind {
        FindingKind::UnsupportedLeafShape
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn key_path(&self) -> &str {
        &self.key_path
    }

    fn message(&self) -> String {
        format!("{} has an unsupported value ({})", self.key_path, self.found)
    }

    fn hint(&self) -> Option<&str> {
        Some(r#"use a string, a nested object, or ["id", "lazy"]"#)
    }
}

impl Report for DuplicateKeyFinding {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn kind(&self) -> FindingKind {
        FindingKind::DuplicateKey
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn key_path(&self) -> &str {
        &self.key_path
    }

    fn message(&self) -> String {
        format!(
            "{} is declared more than once, the last declaration wins",
            self.key_path
        )
    }
}

impl Report for BuildErrorFinding {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn kind(&self) -> FindingKind {
        FindingKind::BuildError
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn key_path(&self) -> &str {
        &self.binding
    }

    fn message(&self) -> String {
        format!("{} cannot be analyzed: {}", self.binding, self.error)
    }
}

impl Report for AccessedButUndeclaredFinding {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn kind(&self) -> FindingKind {
        FindingKind::AccessedButUndeclared
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn key_path(&self) -> &str {
        &self.key_path
    }

    fn message(&self) -> String {
        format!("{} is accessed but not declared", self.key_path)
    }
}

impl Report for MisuseOfLazyKeyFinding {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn kind(&self) -> FindingKind {
        FindingKind::MisuseOfLazyKey
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn key_path(&self) -> &str {
        &self.key_path
    }

    fn translation_id(&self) -> Option<&str> {
        self.translation_id.as_deref()
    }

    fn message(&self) -> String {
        format!("{}: {}", self.key_path, self.misuse)
    }

    fn hint(&self) -> Option<&str> {
        match self.misuse {
            LazyMisuse::CallOnPlainKey => Some(r#"declare the key as ["id", "lazy"]"#),
            LazyMisuse::CallOnObject => None,
            LazyMisuse::AccessPastLazyKey => Some("call the lazy key before using its value"),
        }
    }
}

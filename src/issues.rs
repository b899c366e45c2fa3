//! Diagnostic types produced while processing query declarations.
//!
//! Each issue is self-contained with everything the reporter needs to show it.
//! Declaration-scoped issues carry the declaring element and its source
//! location; run-scoped issues only name the properties file involved.

use enum_dispatch::enum_dispatch;

use crate::core::SourceContext;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    ResourceNotFound,
    ResourceReadFailure,
    StoreLoadFailure,
    StoreWriteFailure,
    StoreWritten,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::ResourceNotFound => write!(f, "resource-not-found"),
            Rule::ResourceReadFailure => write!(f, "resource-read-failure"),
            Rule::StoreLoadFailure => write!(f, "store-load-failure"),
            Rule::StoreWriteFailure => write!(f, "store-write-failure"),
            Rule::StoreWritten => write!(f, "store-written"),
        }
    }
}

// ============================================================
// Issue Types - Declarations
// ============================================================

/// A resource-shaped parameter value names a resource that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNotFoundIssue {
    /// Declaring element (e.g. `PersonRepository.all`).
    pub element: String,
    pub context: Option<SourceContext>,
    /// Annotation parameter holding the reference.
    pub parameter: String,
    /// The referenced resource name.
    pub resource: String,
}

impl ResourceNotFoundIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ResourceNotFound
    }
}

/// A referenced resource exists but its content could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReadFailureIssue {
    pub element: String,
    pub context: Option<SourceContext>,
    pub parameter: String,
    pub resource: String,
    /// Underlying I/O or decoding error.
    pub cause: String,
}

impl ResourceReadFailureIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ResourceReadFailure
    }
}

// ============================================================
// Issue Types - Properties Store (run-scoped)
// ============================================================

/// An existing properties file could not be loaded; merging continued from empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLoadFailureIssue {
    pub path: String,
    pub cause: String,
}

impl StoreLoadFailureIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::StoreLoadFailure
    }
}

/// The merged properties file could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreWriteFailureIssue {
    pub path: String,
    pub cause: String,
}

impl StoreWriteFailureIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::StoreWriteFailure
    }
}

/// The merged properties file was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreWrittenIssue {
    pub path: String,
    /// Total entries in the written file.
    pub entry_count: usize,
    /// Entries contributed by this run.
    pub merged_count: usize,
}

impl StoreWrittenIssue {
    pub fn severity() -> Severity {
        Severity::Info
    }

    pub fn rule() -> Rule {
        Rule::StoreWritten
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A diagnostic recorded during a run.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    ResourceNotFound(ResourceNotFoundIssue),
    ResourceReadFailure(ResourceReadFailureIssue),
    StoreLoadFailure(StoreLoadFailureIssue),
    StoreWriteFailure(StoreWriteFailureIssue),
    StoreWritten(StoreWrittenIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::ResourceNotFound(_) => ResourceNotFoundIssue::severity(),
            Issue::ResourceReadFailure(_) => ResourceReadFailureIssue::severity(),
            Issue::StoreLoadFailure(_) => StoreLoadFailureIssue::severity(),
            Issue::StoreWriteFailure(_) => StoreWriteFailureIssue::severity(),
            Issue::StoreWritten(_) => StoreWrittenIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::ResourceNotFound(_) => ResourceNotFoundIssue::rule(),
            Issue::ResourceReadFailure(_) => ResourceReadFailureIssue::rule(),
            Issue::StoreLoadFailure(_) => StoreLoadFailureIssue::rule(),
            Issue::StoreWriteFailure(_) => StoreWriteFailureIssue::rule(),
            Issue::StoreWritten(_) => StoreWrittenIssue::rule(),
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Declaration with a known source position.
    Source(&'a SourceContext),
    /// Declaration without position (e.g. from a manifest entry without location).
    Element { name: &'a str },
    /// Run-scoped, tied to a properties file.
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
#[enum_dispatch]
pub trait Report {
    /// Get the location for this issue.
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    /// Severity level.
    fn report_severity(&self) -> Severity;

    /// Rule identifier.
    fn report_rule(&self) -> Rule;

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

fn declaration_location<'a>(
    context: &'a Option<SourceContext>,
    element: &'a str,
) -> ReportLocation<'a> {
    match context {
        Some(ctx) => ReportLocation::Source(ctx),
        None => ReportLocation::Element { name: element },
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for ResourceNotFoundIssue {
    fn location(&self) -> ReportLocation<'_> {
        declaration_location(&self.context, &self.element)
    }

    fn message(&self) -> String {
        format!("resource '{}' not found.", self.resource)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("referenced by `{}` on {}", self.parameter, self.element))
    }
}

impl Report for ResourceReadFailureIssue {
    fn location(&self) -> ReportLocation<'_> {
        declaration_location(&self.context, &self.element)
    }

    fn message(&self) -> String {
        format!(
            "error while reading resource '{}': {}",
            self.resource, self.cause
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("referenced by `{}` on {}", self.parameter, self.element))
    }
}

impl Report for StoreLoadFailureIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File { path: &self.path }
    }

    fn message(&self) -> String {
        format!("error loading properties '{}'.", self.path)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("{} (existing entries were not merged)", self.cause))
    }
}

impl Report for StoreWriteFailureIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File { path: &self.path }
    }

    fn message(&self) -> String {
        format!("unable to create file '{}'.", self.path)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(self.cause.clone())
    }
}

impl Report for StoreWrittenIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File { path: &self.path }
    }

    fn message(&self) -> String {
        format!(
            "generated '{}' with {} {}",
            self.path,
            self.entry_count,
            if self.entry_count == 1 {
                "query"
            } else {
                "queries"
            }
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("{} merged in this run", self.merged_count))
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    /// Declarations with a position first, then positionless declarations,
    /// then run-scoped issues.
    fn sort_rank(&self) -> u8 {
        match self.location() {
            ReportLocation::Source(_) => 0,
            ReportLocation::Element { .. } => 1,
            ReportLocation::File { .. } => 2,
        }
    }

    fn sort_name(&self) -> &str {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.file_path(),
            ReportLocation::Element { name } => name,
            ReportLocation::File { path } => path,
        }
    }

    fn sort_position(&self) -> (usize, usize) {
        match self.location() {
            ReportLocation::Source(ctx) => (ctx.line(), ctx.col()),
            _ => (0, 0),
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_rank()
            .cmp(&other.sort_rank())
            .then_with(|| self.sort_name().cmp(other.sort_name()))
            .then_with(|| self.sort_position().cmp(&other.sort_position()))
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Tests
// ============================================================

//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format. Kept apart from the core so
//! namedsql can be used as a library without printing anything.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, InitSummary, RunSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::MergeOutcome;
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
///
/// Issues are sorted and displayed with severity, location, source context
/// and details, followed by a problem count when anything was an error.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when no errors were recorded.
pub fn print_success(summary: &RunSummary, checked_only: bool) {
    print_success_to(summary, checked_only, &mut io::stdout().lock());
}

/// Print a success message to a custom writer.
pub fn print_success_to<W: Write>(summary: &RunSummary, checked_only: bool, writer: &mut W) {
    let declarations = summary.declaration_count();
    let verb = if checked_only { "Checked" } else { "Processed" };
    let what = format!(
        "{} {} {}",
        verb,
        declarations,
        if declarations == 1 {
            "declaration"
        } else {
            "declarations"
        }
    );

    let origin = if summary.from_manifest {
        " from manifest".to_string()
    } else {
        format!(
            " in {} source {}",
            summary.source_files,
            if summary.source_files == 1 {
                "file"
            } else {
                "files"
            }
        )
    };

    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!("{}{} - no issues found", what, origin).green()
    );
}

/// Print the per-flavor breakdown of a run.
pub fn print_flavors_to<W: Write>(summary: &RunSummary, writer: &mut W) {
    for flavor in &summary.flavors {
        let outcome = match &flavor.outcome {
            None => String::new(),
            Some(MergeOutcome::Skipped) => ", nothing to write".to_string(),
            Some(MergeOutcome::Written { entry_count, .. }) => {
                format!(", {} entries written", entry_count)
            }
            Some(MergeOutcome::Failed) => ", write failed".to_string(),
        };
        let _ = writeln!(
            writer,
            "  {} {} declaration(s), {} resolved, {} named quer{}{}",
            format!("{}:", flavor.flavor).bold(),
            flavor.declaration_count,
            flavor.resolved_count,
            flavor.plain_reference_count,
            if flavor.plain_reference_count == 1 {
                "y"
            } else {
                "ies"
            },
            outcome
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();

    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Info => "info".bold().green(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match loc {
        ReportLocation::Source(ctx) => {
            let _ = writeln!(
                writer,
                "{:>width$}{} {}:{}:{}",
                "",
                "-->".blue(),
                ctx.file_path(),
                ctx.line(),
                ctx.col(),
                width = max_line_width
            );

            if let Some(source_line) = &ctx.source_line {
                let caret_char = match severity {
                    Severity::Error => "^".red(),
                    Severity::Info => "^".green(),
                };

                let _ = writeln!(
                    writer,
                    "{:>width$} {}",
                    "",
                    "|".blue(),
                    width = max_line_width
                );
                let _ = writeln!(
                    writer,
                    "{:>width$} {} {}",
                    ctx.line().to_string().blue(),
                    "|".blue(),
                    source_line,
                    width = max_line_width
                );

                // Caret pointing to the column (col is 1-based)
                let prefix: String = source_line
                    .chars()
                    .take(ctx.col().saturating_sub(1))
                    .collect();
                let caret_padding = UnicodeWidthStr::width(prefix.as_str());
                let _ = writeln!(
                    writer,
                    "{:>width$} {} {:>padding$}{}",
                    "",
                    "|".blue(),
                    "",
                    caret_char,
                    width = max_line_width,
                    padding = caret_padding
                );
            }
        }
        ReportLocation::Element { name } => {
            let _ = writeln!(
                writer,
                "{:>width$}{} {}",
                "",
                "-->".blue(),
                name,
                width = max_line_width
            );
        }
        ReportLocation::File { path } => {
            let _ = writeln!(
                writer,
                "{:>width$}{} {}",
                "",
                "-->".blue(),
                path,
                width = max_line_width
            );
        }
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();

    if total_errors > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} ({} {})",
            FAILURE_MARK.red(),
            total_errors,
            if total_errors == 1 {
                "problem"
            } else {
                "problems"
            },
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
        );
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line()),
            _ => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Process(summary) => print_run(result, summary, false, verbose),
        CommandSummary::Check(summary) => print_run(result, summary, true, verbose),
        CommandSummary::Init(summary) => print_init(summary),
    }
}

fn print_run(result: &CommandResult, summary: &RunSummary, checked_only: bool, verbose: bool) {
    report(&result.issues);

    if result.error_count == 0 {
        print_success(summary, checked_only);
    }

    if verbose {
        print_flavors_to(summary, &mut io::stdout().lock());
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
    if let Some(error) = &summary.error {
        eprintln!("Error: {}", error);
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::core::{FlavorSummary, QueryFlavor, SourceContext, SourceLocation};
    use crate::issues::{
        ResourceNotFoundIssue, ResourceReadFailureIssue, StoreLoadFailureIssue, StoreWrittenIssue,
    };

    fn strip_ansi(s: &str) -> String {
        let mut result = String::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                // Skip until 'm'
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next == 'm' {
                        break;
                    }
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    fn render(issues: &[Issue]) -> String {
        let mut output = Vec::new();
        report_to(issues, &mut output);
        strip_ansi(&String::from_utf8(output).unwrap())
    }

    fn not_found(context: Option<SourceContext>) -> Issue {
        Issue::ResourceNotFound(ResourceNotFoundIssue {
            element: "PersonRepository.all".to_string(),
            context,
            parameter: "name".to_string(),
            resource: "missing.sql".to_string(),
        })
    }

    fn run_summary(from_manifest: bool) -> RunSummary {
        RunSummary {
            flavors: vec![FlavorSummary {
                flavor: QueryFlavor::Jpa,
                declaration_count: 3,
                resolved_count: 2,
                plain_reference_count: 1,
                outcome: Some(MergeOutcome::Written {
                    path: PathBuf::from("target/classes/META-INF/jpa-named-queries.properties"),
                    entry_count: 4,
                    merged_count: 2,
                }),
            }],
            source_files: 1,
            from_manifest,
        }
    }

    #[test]
    fn test_report_empty() {
        assert!(render(&[]).is_empty());
    }

    #[test]
    fn test_report_source_issue() {
        let loc = SourceLocation::new("src/main/java/PersonRepository.java", 12, 5);
        let ctx = SourceContext::new(loc, Some("    @Query(name = \"missing.sql\")".to_string()));

        let output = render(&[not_found(Some(ctx))]);

        assert!(output.contains("error: resource 'missing.sql' not found.  resource-not-found"));
        assert!(output.contains("--> src/main/java/PersonRepository.java:12:5"));
        assert!(output.contains("12 |     @Query(name = \"missing.sql\")"));
        assert!(output.contains("   |     ^"));
        assert!(output.contains("= note: referenced by `name` on PersonRepository.all"));
        assert!(output.contains("1 problem (1 error)"));
    }

    #[test]
    fn test_report_issue_without_location() {
        let output = render(&[not_found(None)]);

        assert!(output.contains("--> PersonRepository.all"));
        assert!(!output.contains(" | "));
    }

    #[test]
    fn test_report_sorted_and_counted() {
        let written = Issue::StoreWritten(StoreWrittenIssue {
            path: "target/classes/META-INF/jpa-named-queries.properties".to_string(),
            entry_count: 1,
            merged_count: 1,
        });
        let load = Issue::StoreLoadFailure(StoreLoadFailureIssue {
            path: "META-INF/jpa-named-queries.properties".to_string(),
            cause: "line 3: malformed \\uxxxx encoding".to_string(),
        });
        let read = Issue::ResourceReadFailure(ResourceReadFailureIssue {
            element: "Repo.a".to_string(),
            context: Some(SourceContext::new(SourceLocation::new("Repo.java", 3, 1), None)),
            parameter: "name".to_string(),
            resource: "a.sql".to_string(),
            cause: "invalid UTF-8".to_string(),
        });

        let output = render(&[written, load, read]);

        let read_at = output.find("error while reading resource 'a.sql'").unwrap();
        let load_at = output.find("error loading properties").unwrap();
        let info_at = output.find("info: generated").unwrap();
        assert!(read_at < load_at);
        assert!(load_at < info_at);
        assert!(output.contains("jpa-named-queries.properties' with 1 query"));
        assert!(output.contains("2 problems (2 errors)"));
    }

    #[test]
    fn test_info_only_has_no_summary() {
        let output = render(&[Issue::StoreWritten(StoreWrittenIssue {
            path: "out.properties".to_string(),
            entry_count: 2,
            merged_count: 2,
        })]);

        assert!(output.contains("with 2 queries"));
        assert!(!output.contains("problem"));
    }

    #[test]
    fn test_print_success() {
        let mut output = Vec::new();
        print_success_to(&run_summary(false), false, &mut output);
        let stripped = strip_ansi(&String::from_utf8(output).unwrap());

        assert!(stripped.contains("Processed 3 declarations in 1 source file - no issues found"));
    }

    #[test]
    fn test_print_success_from_manifest() {
        let mut output = Vec::new();
        print_success_to(&run_summary(true), true, &mut output);
        let stripped = strip_ansi(&String::from_utf8(output).unwrap());

        assert!(stripped.contains("Checked 3 declarations from manifest"));
    }

    #[test]
    fn test_print_flavors() {
        let mut output = Vec::new();
        print_flavors_to(&run_summary(false), &mut output);
        let stripped = strip_ansi(&String::from_utf8(output).unwrap());

        assert_eq!(
            stripped,
            "  jpa: 3 declaration(s), 2 resolved, 1 named query, 4 entries written\n"
        );
    }
}

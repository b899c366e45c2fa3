//! Extraction policy: what to do with each recognized parameter value.
//!
//! | value                       | outcome                                   |
//! |-----------------------------|-------------------------------------------|
//! | blank                       | skipped                                   |
//! | resolves                    | staged as `value = content`               |
//! | missing, ends with suffix   | `resource-not-found` error                |
//! | missing, no suffix          | plain query name, skipped silently        |
//! | exists but unreadable       | `resource-read-failure` error             |
//!
//! Only resource-shaped values are mandatory; a bare query name such as
//! `Person.findByLastname` is left for the data-access framework to resolve.

use crate::{
    core::{
        Diagnostics, PropertyStore, QueryDeclaration,
        resolver::{Resolution, ResourceResolver, is_blank},
    },
    issues::{ResourceNotFoundIssue, ResourceReadFailureIssue},
};

/// Classification of one parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Blank,
    Resolved(String),
    Missing,
    PlainReference,
    ReadFailed(String),
}

/// Entries staged for merging plus what was skipped along the way.
#[derive(Debug, Default)]
pub struct Extracted {
    pub entries: PropertyStore,
    /// Values treated as plain query names.
    pub plain_references: Vec<String>,
    /// Number of declarations evaluated.
    pub declaration_count: usize,
}

pub struct ExtractionPolicy<'a> {
    resolver: &'a dyn ResourceResolver,
    suffix: String,
}

impl<'a> ExtractionPolicy<'a> {
    pub fn new(resolver: &'a dyn ResourceResolver, suffix: impl Into<String>) -> Self {
        Self {
            resolver,
            suffix: suffix.into().to_lowercase(),
        }
    }

    /// Case-insensitive suffix check.
    pub fn is_resource_name(&self, value: &str) -> bool {
        value.to_lowercase().ends_with(&self.suffix)
    }

    pub fn classify(&self, value: &str) -> Extraction {
        if is_blank(value) {
            return Extraction::Blank;
        }
        match self.resolver.resolve(value) {
            Resolution::Found(content) => Extraction::Resolved(content),
            Resolution::ReadFailure(cause) => Extraction::ReadFailed(cause),
            Resolution::NotFound if self.is_resource_name(value) => Extraction::Missing,
            Resolution::NotFound => Extraction::PlainReference,
        }
    }

    /// Evaluate every declaration; errors are recorded and evaluation continues.
    pub fn apply(
        &self,
        declarations: &[QueryDeclaration],
        diagnostics: &mut Diagnostics,
    ) -> Extracted {
        let mut extracted = Extracted {
            declaration_count: declarations.len(),
            ..Default::default()
        };

        for declaration in declarations {
            for (parameter, value) in declaration.parameters() {
                match self.classify(value) {
                    Extraction::Blank => {}
                    Extraction::Resolved(content) => {
                        extracted.entries.insert(value.to_string(), content);
                    }
                    Extraction::PlainReference => {
                        extracted.plain_references.push(value.to_string());
                    }
                    Extraction::Missing => diagnostics.record(ResourceNotFoundIssue {
                        element: declaration.element.clone(),
                        context: declaration.context.clone(),
                        parameter: parameter.to_string(),
                        resource: value.to_string(),
                    }),
                    Extraction::ReadFailed(cause) => diagnostics.record(ResourceReadFailureIssue {
                        element: declaration.element.clone(),
                        context: declaration.context.clone(),
                        parameter: parameter.to_string(),
                        resource: value.to_string(),
                        cause,
                    }),
                }
            }
        }

        extracted
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use crate::core::policy::*;
    use crate::core::resolver::MemoryNamespace;
    use crate::core::{SourceContext, SourceLocation};
    use crate::issues::{Issue, Report};

    fn declaration(element: &str, values: &[(&str, &str)]) -> QueryDeclaration {
        QueryDeclaration::new(
            element,
            Some(SourceContext::new(SourceLocation::new("PersonRepository.java", 7, 5), None)),
            vec!["name".to_string(), "countName".to_string()],
            values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn test_blank_value_is_skipped() {
        let ns = MemoryNamespace::default();
        let policy = ExtractionPolicy::new(&ns, ".sql");
        let mut diagnostics = Diagnostics::new();

        let declarations = [declaration("Repo.all", &[("name", "  ")])];
        let extracted = policy.apply(&declarations, &mut diagnostics);

        assert!(extracted.entries.is_empty());
        assert!(diagnostics.is_empty());
        assert!(ns.lookups.borrow().is_empty());
    }

    #[test]
    fn test_resolved_values_are_staged() {
        let ns = MemoryNamespace::default()
            .with("a.sql", "SELECT 1")
            .with("b.sql", "SELECT 2");
        let policy = ExtractionPolicy::new(&ns, ".sql");
        let mut diagnostics = Diagnostics::new();

        let declarations = [
            declaration("Repo.a", &[("name", "a.sql")]),
            declaration("Repo.b", &[("name", "b.sql")]),
        ];
        let extracted = policy.apply(&declarations, &mut diagnostics);

        let expected: PropertyStore = [
            ("a.sql".to_string(), "SELECT 1".to_string()),
            ("b.sql".to_string(), "SELECT 2".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(extracted.entries, expected);
        assert!(diagnostics.is_empty());
        assert_eq!(extracted.declaration_count, 2);
    }

    #[test]
    fn test_missing_resource_is_an_error() {
        let ns = MemoryNamespace::default().with("count.sql", "select count(*)");
        let policy = ExtractionPolicy::new(&ns, ".sql");
        let mut diagnostics = Diagnostics::new();

        let values = [("name", "missing.sql"), ("countName", "count.sql")];
        let declarations = [declaration("Repo.all", &values)];
        let extracted = policy.apply(&declarations, &mut diagnostics);

        assert_eq!(diagnostics.error_count(), 1);
        let issue = &diagnostics.issues()[0];
        assert!(matches!(issue, Issue::ResourceNotFound(_)));
        assert_eq!(issue.message(), "resource 'missing.sql' not found.");
        assert!(matches!(issue.location(), crate::issues::ReportLocation::Source(_)));
        // The sibling parameter is still extracted.
        assert_eq!(extracted.entries.len(), 1);
        assert!(!extracted.entries.contains_key("missing.sql"));
    }

    #[test]
    fn test_suffix_match_is_case_insensitive() {
        let ns = MemoryNamespace::default();
        let policy = ExtractionPolicy::new(&ns, ".sql");

        assert_eq!(policy.classify("queries/ALL.SQL"), Extraction::Missing);
        assert_eq!(policy.classify("queries/all.Sql"), Extraction::Missing);
    }

    #[test]
    fn test_plain_name_is_skipped_silently() {
        let ns = MemoryNamespace::default();
        let policy = ExtractionPolicy::new(&ns, ".sql");
        let mut diagnostics = Diagnostics::new();

        let values = [("name", "Person.findByLastname")];
        let declarations = [declaration("Repo.find", &values)];
        let extracted = policy.apply(&declarations, &mut diagnostics);

        assert!(extracted.entries.is_empty());
        assert!(diagnostics.is_empty());
        assert_eq!(extracted.plain_references, vec!["Person.findByLastname"]);
    }

    #[test]
    fn test_existing_plain_name_is_staged() {
        let ns = MemoryNamespace::default().with("queries/person", "select 1");
        let policy = ExtractionPolicy::new(&ns, ".sql");

        assert_eq!(
            policy.classify("queries/person"),
            Extraction::Resolved("select 1".to_string())
        );
    }

    #[test]
    fn test_read_failure_is_an_error_with_cause() {
        let ns = MemoryNamespace::default().with_failure("broken.sql", "disk on fire");
        let policy = ExtractionPolicy::new(&ns, ".sql");
        let mut diagnostics = Diagnostics::new();

        let declarations = [declaration("Repo.broken", &[("name", "broken.sql")])];
        let extracted = policy.apply(&declarations, &mut diagnostics);

        assert!(extracted.entries.is_empty());
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(
            diagnostics.issues()[0].message(),
            "error while reading resource 'broken.sql': disk on fire"
        );
    }

    #[test]
    fn test_all_declarations_are_evaluated_after_errors() {
        let ns = MemoryNamespace::default().with("ok.sql", "select 1");
        let policy = ExtractionPolicy::new(&ns, ".sql");
        let mut diagnostics = Diagnostics::new();

        let declarations = [
            declaration("Repo.a", &[("name", "missing-a.sql")]),
            declaration("Repo.b", &[("name", "missing-b.sql")]),
            declaration("Repo.c", &[("name", "ok.sql")]),
        ];
        let extracted = policy.apply(&declarations, &mut diagnostics);

        assert_eq!(diagnostics.error_count(), 2);
        assert!(extracted.entries.contains_key("ok.sql"));
    }

    #[test]
    fn test_custom_suffix() {
        let ns = MemoryNamespace::default();
        let policy = ExtractionPolicy::new(&ns, ".Query");

        assert_eq!(policy.classify("all.query"), Extraction::Missing);
        assert_eq!(policy.classify("all.sql"), Extraction::PlainReference);
    }
}

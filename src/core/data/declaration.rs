use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::source::{SourceContext, SourceLocation};

/// One annotation attached to a declared element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationInstance {
    /// Fully qualified annotation type (e.g. `org.springframework.data.jpa.repository.Query`).
    #[serde(rename = "type")]
    pub type_name: String,
    /// Literal string parameters as declared.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl AnnotationInstance {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// A program element (method, type) with its annotations, as supplied by a
/// declaration source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclaredElement {
    /// Human-readable element reference (e.g. `PersonRepository.findAll`).
    pub name: String,
    #[serde(default)]
    pub location: Option<SourceLocation>,
    /// Source line at `location`, only known for scanned sources.
    #[serde(skip)]
    pub source_line: Option<String>,
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
}

impl DeclaredElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
            source_line: None,
            annotations: Vec::new(),
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn annotated(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn context(&self) -> Option<SourceContext> {
        self.location
            .clone()
            .map(|location| SourceContext::new(location, self.source_line.clone()))
    }
}

/// Recognized parameters extracted from one matching annotation.
///
/// Every recognized parameter has a value; undeclared ones hold `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDeclaration {
    /// Reference to the declaring element.
    pub element: String,
    /// Where the element is declared, if known.
    pub context: Option<SourceContext>,
    parameter_names: Vec<String>,
    values: HashMap<String, String>,
}

impl QueryDeclaration {
    pub fn new(
        element: impl Into<String>,
        context: Option<SourceContext>,
        parameter_names: Vec<String>,
        values: HashMap<String, String>,
    ) -> Self {
        Self {
            element: element.into(),
            context,
            parameter_names,
            values,
        }
    }

    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// Raw value of a parameter; `""` when absent.
    pub fn value(&self, parameter: &str) -> &str {
        self.values.get(parameter).map(String::as_str).unwrap_or("")
    }

    /// `(parameter, value)` pairs in recognized-parameter order.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameter_names
            .iter()
            .map(|name| (name.as_str(), self.value(name)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::core::{AnnotationInstance, DeclaredElement, QueryDeclaration, SourceLocation};

    #[test]
    fn test_missing_value_is_blank() {
        let decl = QueryDeclaration::new(
            "Repo.all",
            None,
            vec!["name".to_string(), "countName".to_string()],
            HashMap::from([("name".to_string(), "all.sql".to_string())]),
        );

        let params: Vec<_> = decl.parameters().collect();
        assert_eq!(params, vec![("name", "all.sql"), ("countName", "")]);
        assert_eq!(decl.value("unknown"), "");
    }

    #[test]
    fn test_deserialize_element() {
        let json = r#"{
            "name": "PersonRepository.all",
            "location": { "file": "src/PersonRepository.java", "line": 12, "col": 5 },
            "annotations": [
                { "type": "org.example.Query", "parameters": { "name": "sql/all.sql" } }
            ]
        }"#;
        let element: DeclaredElement = serde_json::from_str(json).unwrap();

        let query = AnnotationInstance::new("org.example.Query");
        let expected = DeclaredElement::new("PersonRepository.all")
            .at(SourceLocation::new("src/PersonRepository.java", 12, 5))
            .annotated(query.with_parameter("name", "sql/all.sql"));
        assert_eq!(element, expected);
        assert!(element.context().unwrap().source_line.is_none());
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let json = r#"{ "name": "Repo.all", "anotations": [] }"#;
        assert!(serde_json::from_str::<DeclaredElement>(json).is_err());
    }
}

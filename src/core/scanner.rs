//! Annotation scanner: turns declared elements into query declarations.

use std::collections::HashMap;

use crate::core::{AnnotationInstance, DeclaredElement, QueryDeclaration};

/// Extract one `QueryDeclaration` per element carrying `annotation_type`.
///
/// Only the first matching annotation of an element is used. Each name in
/// `parameter_names` gets the declared literal or `""`. Element order is kept.
pub fn scan_declarations(
    annotation_type: &str,
    parameter_names: &[&str],
    elements: &[DeclaredElement],
) -> Vec<QueryDeclaration> {
    elements
        .iter()
        .filter_map(|element| {
            find_annotation(annotation_type, element)
                .map(|annotation| extract(element, annotation, parameter_names))
        })
        .collect()
}

fn find_annotation<'a>(
    annotation_type: &str,
    element: &'a DeclaredElement,
) -> Option<&'a AnnotationInstance> {
    element
        .annotations
        .iter()
        .find(|a| a.type_name == annotation_type)
}

fn extract(
    element: &DeclaredElement,
    annotation: &AnnotationInstance,
    parameter_names: &[&str],
) -> QueryDeclaration {
    let values: HashMap<String, String> = parameter_names
        .iter()
        .map(|name| {
            let value = annotation.parameters.get(*name).cloned();
            (name.to_string(), value.unwrap_or_default())
        })
        .collect();

    QueryDeclaration::new(
        element.name.clone(),
        element.context(),
        parameter_names.iter().map(|s| s.to_string()).collect(),
        values,
    )
}

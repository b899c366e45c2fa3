use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Annotation flavor: which `@Query` annotation is scanned, which of its
/// parameters may reference a SQL file, and where the merged properties go.
///
/// This is a static table; nothing about an annotation is discovered at runtime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum QueryFlavor {
    /// Spring Data JPA `@Query`.
    Jpa,
    /// Spring Data JDBC `@Query`.
    Jdbc,
}

impl QueryFlavor {
    pub fn all() -> Vec<QueryFlavor> {
        vec![QueryFlavor::Jpa, QueryFlavor::Jdbc]
    }

    /// Fully qualified annotation type this flavor matches.
    pub const fn annotation_type(self) -> &'static str {
        match self {
            QueryFlavor::Jpa => "org.springframework.data.jpa.repository.Query",
            QueryFlavor::Jdbc => "org.springframework.data.jdbc.repository.query.Query",
        }
    }

    /// Recognized parameter names, in extraction order.
    pub const fn parameter_names(self) -> &'static [&'static str] {
        match self {
            QueryFlavor::Jpa => &["name", "countName"],
            QueryFlavor::Jdbc => &["name"],
        }
    }

    /// Relative path of the generated properties file.
    pub const fn output_path(self) -> &'static str {
        match self {
            QueryFlavor::Jpa => "META-INF/jpa-named-queries.properties",
            QueryFlavor::Jdbc => "META-INF/jdbc-named-queries.properties",
        }
    }
}

impl std::fmt::Display for QueryFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryFlavor::Jpa => write!(f, "jpa"),
            QueryFlavor::Jdbc => write!(f, "jdbc"),
        }
    }
}

use serde::Deserialize;

/// Pure position information in a declaring source file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceLocation {
    #[serde(rename = "file")]
    pub file_path: String,
    #[serde(default = "first_position")]
    pub line: usize,
    #[serde(default = "first_position")]
    pub col: usize,
}

fn first_position() -> usize {
    1
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

/// Position with the source line it points into.
///
/// The source line is only known when declarations come from a source scan;
/// manifest declarations carry a bare location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub location: SourceLocation,
    /// The source code line content for display.
    pub source_line: Option<String>,
}

impl SourceContext {
    pub fn new(location: SourceLocation, source_line: Option<String>) -> Self {
        Self {
            location,
            source_line,
        }
    }

    // Convenience accessors
    pub fn file_path(&self) -> &str {
        &self.location.file_path
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn col(&self) -> usize {
        self.location.col
    }
}

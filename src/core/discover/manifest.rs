//! Serialized declaration list.
//!
//! Accepts either a bare JSON array of elements or `{ "elements": [...] }`:
//!
//! ```json
//! [
//!   {
//!     "name": "PersonRepository.all",
//!     "location": { "file": "src/main/java/PersonRepository.java", "line": 14, "col": 5 },
//!     "annotations": [
//!       {
//!         "type": "org.springframework.data.jpa.repository.Query",
//!         "parameters": { "name": "sql/person/all.sql" }
//!       }
//!     ]
//!   }
//! ]
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;

use crate::core::DeclaredElement;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestDocument {
    elements: Vec<DeclaredElement>,
}

pub fn parse_manifest(content: &str) -> Result<Vec<DeclaredElement>> {
    let json: Value = serde_json::from_str(content).context("Manifest is not valid JSON")?;

    match json {
        Value::Array(_) => serde_json::from_value(json).context("Invalid declaration in manifest"),
        Value::Object(_) => {
            let document: ManifestDocument =
                serde_json::from_value(json).context("Invalid manifest document")?;
            Ok(document.elements)
        }
        _ => bail!("Manifest must be a JSON array or an object with an 'elements' array"),
    }
}

pub fn load_manifest(path: &Path) -> Result<Vec<DeclaredElement>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    parse_manifest(&content).with_context(|| format!("Failed to parse manifest: {:?}", path))
}

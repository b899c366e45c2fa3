//! Core pipeline: scan → policy (using the resolver) → merge.
//!
//! ## Module Structure
//!
//! - `data`: Declarations, flavors and source locations
//! - `scanner`: Extracts recognized parameters from matching annotations
//! - `resolver`: Resource lookup against ordered root directories
//! - `policy`: Decides per value whether to stage, skip or report
//! - `properties`: `.properties` text codec
//! - `merge`: Load-merge-store cycle for one properties file
//! - `diagnostics`: Run-wide issue collector
//! - `discover`: Where declared elements come from (manifest or Java sources)
//! - `context`: Configured pipeline for one invocation

pub mod context;
pub mod data;
pub mod diagnostics;
pub mod discover;
pub mod merge;
pub mod policy;
pub mod properties;
pub mod resolver;
pub mod scanner;

pub use context::{FlavorSummary, ProcessContext, RunMode, RunReport};
pub use data::{
    AnnotationInstance, DeclaredElement, QueryDeclaration, QueryFlavor, SourceContext,
    SourceLocation,
};
pub use diagnostics::Diagnostics;
pub use merge::{MergeOutcome, PropertiesMerge};
pub use policy::{Extracted, Extraction, ExtractionPolicy};
pub use properties::PropertyStore;
pub use resolver::{Resolution, ResourceNamespace, ResourceResolver};
pub use scanner::scan_declarations;

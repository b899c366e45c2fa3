//! Core data types used across all pipeline stages.
//!
//! ## Module Structure
//!
//! - `declaration`: Declared elements, annotations and extracted query declarations
//! - `flavor`: Static table of supported `@Query` flavors
//! - `source`: Source code location types (SourceContext, SourceLocation)

pub mod declaration;
pub mod flavor;
pub mod source;

pub use declaration::{AnnotationInstance, DeclaredElement, QueryDeclaration};
pub use flavor::QueryFlavor;
pub use source::{SourceContext, SourceLocation};

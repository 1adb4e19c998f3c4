pub mod definition;
pub mod form;

pub use definition::{DefinitionError, FieldDefinition, FieldKind, PageDefinition};
pub use form::{FormPage, PageError};

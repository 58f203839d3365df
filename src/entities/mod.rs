//! Deed data model
//!
//! - [`DeedModel`] - the document under construction
//! - [`FieldId`] - addressable fields and their entry rules

pub mod deed;
pub mod field;

pub use deed::{DeedModel, Party, Sale, Title, Vehicle, Witness};
pub use field::{FieldError, FieldGroup, FieldId, FieldKind};

//! Form domain layer
//!
//! Field identities with their metadata, and the owned `FormData` record that
//! every input commits to before any decision is made.

mod field;
mod form_data;

pub use field::{Field, FieldKind, Gender};
pub use form_data::{AllergyAdd, FormData, CONDITIONS};

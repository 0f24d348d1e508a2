//! Response decoding and JSON encoding engine.
//!
//! - [`field`]: single-value conversions with tri-state [`Presence`].
//! - [`model`]: the [`Model`] trait, [`FieldReader`] and [`ObjectWriter`].
//! - [`array`]: order-preserving, all-or-nothing array decoding.
//! - [`variant`]: discriminator-driven dispatch over a closed member table.
//! - [`open`]: property bags that keep undeclared keys of extensible models.

pub mod array;
pub mod field;
pub mod model;
pub mod open;
pub mod variant;

pub use array::decode_array;
pub use field::{Binary, FieldValue, Presence, decode_field};
pub use model::{FieldReader, Model, ObjectWriter};
pub use open::{PropertyBag, capture_residual};
pub use variant::{MemberDecoder, VariantMember, VariantTable};

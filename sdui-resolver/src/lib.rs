//! Resolvers: pure transforms `ScreenDefinition × DataBag → ScreenDefinition`.
//!
//! Each resolver returns a new definition and never fails; data that is
//! missing simply leaves fields unresolved. All three are idempotent, and
//! they are meant to run in the order of [`ResolverPipeline`]:
//!
//! 1. [`resolve_form_fields`]: synthesizes slots for empty form sections
//! 2. [`resolve_slot_bindings`]: copies `slot:<key>` data into label/value
//! 3. [`resolve_placeholders`]: substitutes `{key}` tokens in text
//!
//! Bindings may produce text containing placeholders, which is why
//! substitution runs last.

mod form_fields;
mod pipeline;
mod placeholder;
mod slot_binding;

pub use form_fields::{resolve_form_fields, FIELDS_KEY};
pub use pipeline::ResolverPipeline;
pub use placeholder::{resolve_placeholders, substitute, Placeholders};
pub use slot_binding::{bind_item_layout, resolve_slot_bindings};

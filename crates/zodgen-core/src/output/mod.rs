//! Output renderers.
//!
//! Each renderer takes the `generate` result and produces the text of one
//! emitted file. Rendering is where deferred references become `z.lazy`
//! wrappers; the expression trees themselves stay acyclic.

mod integration;
mod zod;

pub use integration::render_integration_file;
pub use zod::render_schema_file;

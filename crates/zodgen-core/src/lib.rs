//! Declaration-to-validator generation.
//!
//! `zodgen-core` converts TypeScript type declarations (type aliases,
//! interfaces, enums, namespaces) into an ordered list of zod validator
//! construction expressions, plus a companion file of compile-time assertions
//! proving each validator's inferred shape matches the original declaration.
//!
//! # Architecture
//!
//! ```text
//! Input             Analysis                         Output
//! ─────────     ──────────────────────────────   ─────────────────
//! TypeScript ─> Declaration ─> dependency  ─┐
//! source        table          graph        ├─> ordered records ─┬─> schema file
//! (input/)      (table.rs)     (graph.rs)   │    (generate.rs)   └─> integration-test file
//!                              ordering  ───┘                         (output/)
//!                              (order.rs)
//! ```
//!
//! The ordering engine emits every schema after the schemas it references,
//! breaking self-referential cycles with deferred (`z.lazy`) references and
//! reporting mutual cycles as non-fatal diagnostics; everything else still
//! emits.
//!
//! # Example
//!
//! ```
//! use zodgen_core::{GenerateConfig, generate, parse_declarations, render_schema_file};
//!
//! let declarations = parse_declarations(
//!     r#"
//!     export type Name = "superman" | "clark kent";
//!
//!     export interface Superman {
//!         name: Name;
//!         age: number;
//!     }
//!     "#,
//! )
//! .unwrap();
//!
//! let result = generate(declarations, &GenerateConfig::default());
//! assert!(result.diagnostics.is_empty());
//!
//! let file = render_schema_file(&result.records, "./hero");
//! assert!(file.contains("export const supermanSchema"));
//! ```

pub mod compile;
pub mod config;
pub mod expr;
pub mod graph;
pub mod input;
pub mod ir;
pub mod order;
pub mod output;
pub mod resolve;
pub mod table;

mod generate;

// Re-export commonly used items
pub use config::{DEFAULT_MAX_RUN, GenerateConfig, default_schema_name};
pub use generate::{EmissionRecord, GenerateResult, TypeAssertion, generate};
pub use input::ParseError;
#[cfg(feature = "input-typescript")]
pub use input::parse_declarations;
pub use output::{render_integration_file, render_schema_file};

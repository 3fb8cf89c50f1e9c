//! Cross-component function registry generator.
//!
//! Turns declarative function catalogues into the artifacts a frontend and a backend need
//! to agree on which function a given opcode names.
//!
//! # Pipeline
//!
//! ```text
//! catalogue ─► registry ─► opcode ─► operator ─► alias ─► emit ─► output
//!  (ingest)    (group)    (assign)  (derive)   (check)  (render) (write)
//! ```
//!
//! - [`catalogue`] - KDL ingestion and declaration shape checks
//! - [`registry`] - Overload sets keyed by normalized name, in first-occurrence order
//! - [`opcode`] - Opcode mangling and the sentinel-bracketed opcode space
//! - [`operator`] - Distinct operator list
//! - [`alias`] - Alias → operator consistency
//! - [`emit`] - The four artifact emitters
//! - [`output`] - Atomic artifact writes
//! - [`manifest`] - JSON view of the resolved registry
//! - [`compile`] - `build.rs` support
//!
//! Every phase is fatal on error and nothing is written unless all phases succeed.

pub mod alias;
#[cfg(test)]
mod arbitrary;
pub mod catalogue;
pub mod compile;
pub mod emit;
pub mod entry;
pub mod error;
pub mod kind;
pub mod manifest;
pub mod opcode;
pub mod operator;
pub mod output;
pub mod pipeline;
pub mod registry;

pub use alias::{AliasMap, check_aliases};
pub use catalogue::Catalogue;
pub use emit::{Artifact, ArtifactKind, EmitOptions, Emitter, render_all};
pub use entry::{FunctionEntry, INVALID_OPCODE, INVALID_OPERATOR, LAST_OPCODE};
pub use error::{RegistryError, Result};
pub use kind::ValueKind;
pub use manifest::Manifest;
pub use opcode::{OpcodeSpace, assign_opcodes};
pub use operator::{OperatorList, derive_operators};
pub use output::{OutputPaths, WriteOutcome, WriteReport, write_all, write_artifact};
pub use pipeline::{Generated, Resolved, generate, resolve};
pub use registry::{OverloadSet, Registry, RegistryBuilder};

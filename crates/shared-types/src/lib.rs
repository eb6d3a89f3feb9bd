//! # Shared Types Crate
//!
//! Ledger data model shared across subsystems: entity identifiers, key trees,
//! transaction bodies with their signature maps, and the state records that
//! signing decisions are derived from.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Deserialized Only**: Consumers never parse wire bytes themselves; the
//!   envelope codec lives next to the types it encodes.
//! - **Versioned State**: Every state record carries a version marker so that
//!   derived results can be invalidated when the record changes.

pub mod entities;
pub mod errors;
pub mod ledger;
pub mod transaction;

pub use entities::*;
pub use errors::*;
pub use ledger::*;
pub use transaction::*;

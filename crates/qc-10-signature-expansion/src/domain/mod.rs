//! # Domain Layer
//!
//! Pure expansion logic. Ledger state is reached only through the
//! outbound ports.

pub mod accessor;
pub mod errors;
pub mod expansion;
pub mod linked_refs;
pub mod lookup;
pub mod matcher;
pub mod order;
pub mod platform_sig;
pub mod rationalization;
pub mod sig_meta;
pub mod span_cache;

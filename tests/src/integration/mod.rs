//! # Integration Tests
//!
//! End-to-end flows through `ExpandHandleSpan` with real signatures and the
//! in-memory ledger.

pub mod concurrency;
pub mod flows;

//! # Quantum-Chain Test Suite
//!
//! Unified test crate for the signature expansion pipeline.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs        # Key pairs, ledger setup, signed contents
//! │   └── integration/
//! │       ├── flows.rs       # Intake → handle flows, scenarios, invalidation
//! │       └── concurrency.rs # Many intake threads, one handle thread
//! └── benches/
//!     └── expansion_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # By category
//! cargo test -p qc-tests integration::flows
//! cargo test -p qc-tests integration::concurrency
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

pub mod fixtures;
pub mod integration;

//! Ports (hexagonal boundaries) for signature expansion.

pub mod inbound;
pub mod outbound;

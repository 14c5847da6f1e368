//! Tailor Rules
//!
//! Signature engine, canonicalization passes and utility collapse.
//! This crate turns class strings into the shortest spelling that compiles
//! to the same CSS under a given design system.

pub mod builtin;
mod canonical;
pub mod collapse;
pub mod engine;
pub mod signature;

// Re-export commonly used types
pub use collapse::collapse_candidates;
pub use engine::{CanonicalizationEngine, CanonicalizationPass, PASSES, PassFn};
pub use signature::{Signature, SignatureEngine, SignatureFeatures, SignatureOptions};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Tailor Core
//!
//! Building blocks for class canonicalization: lossless value and selector
//! tokenizers, a mutable tree walker, `calc()` constant folding, the CSS node
//! tree and the built-in design system that compiles candidates to CSS.

pub mod candidate;
pub mod config;
pub mod css;
pub mod design_system;
pub mod error;
pub mod fold;
pub mod result;
pub mod selector_parser;
pub mod theme;
pub mod value_parser;
pub mod walk;

// Re-export commonly used types
pub use candidate::{Candidate, CandidateKind, Modifier, UtilityValue, Variant, VariantValue};
pub use config::{CanonicalizeOptions, ConfigLoader, TailorConfig};
pub use css::CssNode;
pub use design_system::{ClassEntry, CompileOptions, DefaultDesignSystem, DesignSystem};
pub use error::{ErrorKind, TailorError};
pub use result::Result;
pub use theme::{ResolveOptions, Theme, ThemeEntry};
pub use walk::{ExitAction, Visitor, WalkAction, WalkContext, WalkNode};

/// Initialize tracing for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tailor=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

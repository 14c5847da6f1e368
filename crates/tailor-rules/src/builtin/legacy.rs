//! Legacy aliases
//!
//! Utilities that were renamed but still compile under their old name.

use super::{on_base, parse_equivalent};
use crate::signature::{SignatureEngine, SignatureOptions};
use tailor_core::{Candidate, CandidateKind};

/// Pass ID for legacy alias migration
pub const LEGACY_ALIASES: &str = "legacy-aliases";

const ALIASES: &[(&str, &str)] = &[
    ("flex-grow", "grow"),
    ("flex-shrink", "shrink"),
    ("overflow-ellipsis", "text-ellipsis"),
    ("decoration-slice", "box-decoration-slice"),
    ("decoration-clone", "box-decoration-clone"),
];

fn modern_name(root: &str) -> Option<String> {
    if let Some((_, modern)) = ALIASES.iter().find(|(legacy, _)| *legacy == root) {
        return Some(modern.to_string());
    }
    root.strip_prefix("bg-gradient-to-")
        .map(|direction| format!("bg-linear-to-{direction}"))
}

/// Rewrite legacy utility names to their current spelling
pub fn migrate_legacy_aliases(
    engine: &SignatureEngine,
    options: &SignatureOptions,
    candidate: Candidate,
) -> Candidate {
    let CandidateKind::Static { root } = &candidate.kind else {
        return candidate;
    };
    let Some(modern) = modern_name(root) else {
        return candidate;
    };
    on_base(candidate, |base| parse_equivalent(engine, options, base, &modern))
}

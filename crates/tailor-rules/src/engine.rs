//! Canonicalization engine
//!
//! Runs the built-in passes over each candidate until nothing changes and
//! optionally collapses the result into shorthands.

use crate::builtin;
use crate::collapse::collapse_candidates;
use crate::signature::{SignatureEngine, SignatureOptions};
use indexmap::IndexSet;
use rayon::prelude::*;
use std::sync::Arc;
use tailor_core::{Candidate, CanonicalizeOptions, DesignSystem};
use tracing::{debug, trace};

/// Signature of every pass
pub type PassFn = fn(&SignatureEngine, &SignatureOptions, Candidate) -> Candidate;

/// A named pass in the pipeline
#[derive(Debug, Clone, Copy)]
pub struct CanonicalizationPass {
    pub id: &'static str,
    pub description: &'static str,
    pub run: PassFn,
}

/// Passes in the order they run
pub static PASSES: &[CanonicalizationPass] = &[
    CanonicalizationPass {
        id: builtin::CANONICAL_VARIANTS,
        description: "Rewrite arbitrary and functional variants to their named form",
        run: builtin::canonicalize_variants,
    },
    CanonicalizationPass {
        id: builtin::LEGACY_ALIASES,
        description: "Replace legacy utility names such as bg-gradient-to-t",
        run: builtin::migrate_legacy_aliases,
    },
    CanonicalizationPass {
        id: builtin::THEME_TO_VAR,
        description: "Convert theme() calls to var() or --theme()",
        run: builtin::theme_to_var,
    },
    CanonicalizationPass {
        id: builtin::ARBITRARY_TO_NAMED,
        description: "Replace arbitrary properties and values with named utilities",
        run: builtin::arbitrary_to_named,
    },
    CanonicalizationPass {
        id: builtin::BARE_VALUES,
        description: "Promote bracketed numbers, percentages and ratios to bare values",
        run: builtin::promote_bare_values,
    },
    CanonicalizationPass {
        id: builtin::DEPRECATED_UTILITIES,
        description: "Rename deprecated utilities",
        run: builtin::rename_deprecated_utilities,
    },
    CanonicalizationPass {
        id: builtin::REDUNDANT_DATA_TYPES,
        description: "Drop data type hints the value already implies",
        run: builtin::drop_redundant_data_types,
    },
    CanonicalizationPass {
        id: builtin::OPTIMIZE_MODIFIERS,
        description: "Drop or simplify modifiers",
        run: builtin::optimize_modifiers,
    },
];

/// Rounds before a candidate is considered stable
const MAX_ROUNDS: usize = 8;

pub struct CanonicalizationEngine {
    signatures: SignatureEngine,
}

impl CanonicalizationEngine {
    pub fn new(design_system: Arc<dyn DesignSystem>) -> Self {
        Self {
            signatures: SignatureEngine::new(design_system),
        }
    }

    pub fn signatures(&self) -> &SignatureEngine {
        &self.signatures
    }

    pub fn design_system(&self) -> &dyn DesignSystem {
        self.signatures.design_system()
    }

    /// Canonical spelling of one candidate
    ///
    /// Unparseable or uncompilable input comes back unchanged.
    pub fn canonicalize_candidate(&self, text: &str, options: &CanonicalizeOptions) -> String {
        let options = SignatureOptions::from(options);
        let mut current = text.to_string();
        for _ in 0..MAX_ROUNDS {
            let next = self.canonicalize_once(&current, &options);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn canonicalize_once(&self, text: &str, options: &SignatureOptions) -> String {
        let design_system = self.design_system();
        let original = self.signatures.utility_signature(text, options);
        if !original.is_valid() {
            trace!("Skipping {text}: does not compile");
            return text.to_string();
        }

        for candidate in design_system.parse_candidate(text) {
            let rewritten = PASSES
                .iter()
                .fold(candidate, |candidate, pass| (pass.run)(&self.signatures, options, candidate));
            let printed = design_system.print_candidate(&rewritten);
            if printed == text {
                continue;
            }
            if self.signatures.utility_signature(&printed, options) == original {
                debug!("Canonicalized {text} → {printed}");
                return printed;
            }
            trace!("Rejected {text} → {printed}: signature changed");
        }
        text.to_string()
    }

    /// Canonicalize a batch of candidates
    ///
    /// Candidates run in parallel; with `collapse` set, candidates sharing
    /// variants are then merged into shorthands. Duplicates are removed,
    /// keeping the first occurrence.
    pub fn canonicalize_candidates<S>(&self, candidates: &[S], options: &CanonicalizeOptions) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        let signature_options = SignatureOptions::from(options);
        self.signatures.warm(&signature_options);

        let mut canonical: Vec<String> = candidates
            .par_iter()
            .map(|candidate| self.canonicalize_candidate(candidate.as_ref(), options))
            .collect();

        if options.collapse {
            canonical = collapse_candidates(&self.signatures, &signature_options, canonical);
        }

        let unique: IndexSet<String> = canonical.into_iter().collect();
        unique.into_iter().collect()
    }
}

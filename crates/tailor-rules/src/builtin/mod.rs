//! Built-in canonicalization passes
//!
//! Every pass takes a candidate by value and returns either a rewritten
//! candidate or the input untouched. A rewrite is only kept when it compiles
//! to the same signature as the candidate it replaces.

pub mod arbitrary;
pub mod bare_value;
pub mod data_type;
pub mod deprecated;
pub mod legacy;
pub mod modifier;
pub mod theme;
pub mod variant;

pub use arbitrary::{ARBITRARY_TO_NAMED, arbitrary_to_named};
pub use bare_value::{BARE_VALUES, promote_bare_values};
pub use data_type::{REDUNDANT_DATA_TYPES, drop_redundant_data_types};
pub use deprecated::{DEPRECATED_UTILITIES, rename_deprecated_utilities};
pub use legacy::{LEGACY_ALIASES, migrate_legacy_aliases};
pub use modifier::{OPTIMIZE_MODIFIERS, optimize_modifiers};
pub use theme::{THEME_TO_VAR, theme_to_var};
pub use variant::{CANONICAL_VARIANTS, canonicalize_variants};

use crate::signature::{SignatureEngine, SignatureOptions};
use tailor_core::{Candidate, CandidateKind, UtilityValue};

/// Whether `replacement` compiles to the same CSS as `original`
pub(crate) fn is_equivalent(
    engine: &SignatureEngine,
    options: &SignatureOptions,
    original: &Candidate,
    replacement: &Candidate,
) -> bool {
    let before = engine.candidate_signature(original, options);
    before.is_valid() && before == engine.candidate_signature(replacement, options)
}

/// First of `attempts` equivalent to `original`
pub(crate) fn first_equivalent(
    engine: &SignatureEngine,
    options: &SignatureOptions,
    original: &Candidate,
    attempts: impl IntoIterator<Item = Candidate>,
) -> Option<Candidate> {
    attempts
        .into_iter()
        .find(|attempt| attempt != original && is_equivalent(engine, options, original, attempt))
}

/// Parse an unprefixed class name into the candidate equivalent to `original`
pub(crate) fn parse_equivalent(
    engine: &SignatureEngine,
    options: &SignatureOptions,
    original: &Candidate,
    name: &str,
) -> Option<Candidate> {
    let design_system = engine.design_system();
    let text = match design_system.prefix() {
        Some(prefix) if !name.starts_with(&format!("{prefix}:")) => format!("{prefix}:{name}"),
        _ => name.to_string(),
    };
    first_equivalent(engine, options, original, design_system.parse_candidate(&text))
}

/// `candidate` with its arbitrary value replaced by `value`
pub(crate) fn with_arbitrary_value(candidate: &Candidate, value: String) -> Candidate {
    let mut rewritten = candidate.clone();
    match &mut rewritten.kind {
        CandidateKind::Arbitrary { value: current, .. }
        | CandidateKind::Functional {
            value: Some(UtilityValue::Arbitrary { value: current, .. }),
            ..
        } => *current = value,
        _ => {}
    }
    rewritten
}

/// Run `rewrite` on the context-free candidate and re-attach variants and
/// importance to the result
pub(crate) fn on_base(candidate: Candidate, rewrite: impl FnOnce(&Candidate) -> Option<Candidate>) -> Candidate {
    let base = candidate.base();
    match rewrite(&base) {
        Some(rewritten) => rewritten.with_context_of(&candidate),
        None => candidate,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::signature::{SignatureEngine, SignatureOptions};
    use std::sync::Arc;
    use tailor_core::{Candidate, DefaultDesignSystem};

    pub fn engine() -> SignatureEngine {
        SignatureEngine::new(Arc::new(DefaultDesignSystem::new()))
    }

    /// Parse `input`, run `pass` and print the result
    pub fn run(
        engine: &SignatureEngine,
        pass: fn(&SignatureEngine, &SignatureOptions, Candidate) -> Candidate,
        input: &str,
    ) -> String {
        let design_system = engine.design_system();
        let candidate = design_system.parse_candidate(input).remove(0);
        let rewritten = pass(engine, &SignatureOptions::default(), candidate);
        design_system.print_candidate(&rewritten)
    }
}

//! Arbitrary properties and values with a named equivalent
//!
//! `[display:flex]` → `flex`, `w-[64rem]` → `w-256`. The signature table is
//! consulted first, then functional roots are tried with the value spelled
//! as a bare value, a spacing multiple or an arbitrary value, each with and
//! without the original modifier. Replacements must keep every CSS variable
//! the original reads.

use super::on_base;
use crate::signature::{Signature, SignatureEngine, SignatureOptions};
use tailor_core::fold::{canonicalize_dimension, format_number, parse_dimension};
use tailor_core::design_system::is_spacing_multiplier;
use tailor_core::{Candidate, CandidateKind, UtilityValue};
use tracing::trace;

/// Pass ID for arbitrary-to-named conversion
pub const ARBITRARY_TO_NAMED: &str = "arbitrary-to-named";

enum Lookup {
    Found(Candidate),
    Ambiguous,
    Missing,
}

/// The single enumerable utility with `signature`
fn lookup(engine: &SignatureEngine, options: &SignatureOptions, signature: &Signature) -> Lookup {
    let names = engine.utilities_with_signature(signature, options);
    match names.as_slice() {
        [] => Lookup::Missing,
        [name] => {
            let design_system = engine.design_system();
            design_system
                .parse_candidate(name)
                .into_iter()
                .find(|candidate| engine.candidate_signature(candidate, options) == *signature)
                .map_or(Lookup::Missing, Lookup::Found)
        }
        _ => Lookup::Ambiguous,
    }
}

/// `value` as a multiple of the spacing scale
fn spacing_multiple(engine: &SignatureEngine, options: &SignatureOptions, value: &str) -> Option<String> {
    let spacing = engine.design_system().resolve_theme_value("--spacing")?;
    let spacing = canonicalize_dimension(&parse_dimension(spacing.trim())?, options.rem_px);
    let value = canonicalize_dimension(&parse_dimension(value.trim())?, options.rem_px);
    if spacing.unit != value.unit || spacing.value == 0.0 {
        return None;
    }
    let multiplier = format_number(value.value / spacing.value);
    is_spacing_multiplier(&multiplier).then_some(multiplier)
}

/// Candidate replacements in the order they are tried
fn replacements(
    engine: &SignatureEngine,
    options: &SignatureOptions,
    base: &Candidate,
    value: &str,
) -> Vec<Candidate> {
    let roots: Vec<String> = match &base.kind {
        CandidateKind::Functional { root, .. } => vec![root.clone()],
        CandidateKind::Arbitrary { .. } => engine.design_system().functional_roots(),
        CandidateKind::Static { .. } => return Vec::new(),
    };
    let modifier = base.modifier().cloned();
    let trimmed = value.trim();
    let is_bare = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '%'));
    let multiple = spacing_multiple(engine, options, trimmed);

    let mut values = Vec::new();
    if is_bare {
        values.push(UtilityValue::named(trimmed.trim_end_matches('%')));
    }
    if let Some(multiple) = multiple {
        values.push(UtilityValue::named(multiple));
    }
    if matches!(base.kind, CandidateKind::Arbitrary { .. }) {
        values.push(UtilityValue::arbitrary(trimmed));
    }

    let mut attempts = Vec::new();
    for root in &roots {
        for value in &values {
            let mut attempt = Candidate::functional(root.clone(), Some(value.clone()));
            attempts.push(attempt.clone());
            if modifier.is_some() {
                attempt.set_modifier(modifier.clone());
                attempts.push(attempt);
            }
        }
    }
    attempts
}

fn find_replacement(engine: &SignatureEngine, options: &SignatureOptions, base: &Candidate) -> Option<Candidate> {
    let signature = engine.candidate_signature(base, options);
    if !signature.is_valid() {
        return None;
    }
    let keeps_variables = |replacement: &Candidate| engine.preserves_variables(base, replacement);

    match lookup(engine, options, &signature) {
        Lookup::Found(replacement) if keeps_variables(&replacement) => return Some(replacement),
        Lookup::Ambiguous => {
            trace!("Several utilities match {}", engine.design_system().print_candidate(base));
            return None;
        }
        _ => {}
    }

    if let Some(modifier) = base.modifier().cloned() {
        let mut unmodified = base.clone();
        unmodified.set_modifier(None);
        if let Lookup::Found(mut replacement) = lookup(engine, options, &engine.candidate_signature(&unmodified, options)) {
            replacement.set_modifier(Some(modifier));
            if engine.candidate_signature(&replacement, options) == signature && keeps_variables(&replacement) {
                return Some(replacement);
            }
        }
    }

    let value = base.arbitrary_value()?;
    replacements(engine, options, base, value)
        .into_iter()
        .find(|attempt| engine.candidate_signature(attempt, options) == signature && keeps_variables(attempt))
}

pub fn arbitrary_to_named(engine: &SignatureEngine, options: &SignatureOptions, candidate: Candidate) -> Candidate {
    if candidate.arbitrary_value().is_none() {
        return candidate;
    }
    on_base(candidate, |base| find_replacement(engine, options, base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{engine, run};
    use std::sync::Arc;
    use tailor_core::{DefaultDesignSystem, Theme};

    #[test]
    fn test_arbitrary_property_to_static() {
        let engine = engine();
        assert_eq!(run(&engine, arbitrary_to_named, "[display:flex]"), "flex");
        assert_eq!(run(&engine, arbitrary_to_named, "[display:_flex_]"), "flex");
        assert_eq!(run(&engine, arbitrary_to_named, "md:[font-style:italic]!"), "md:italic!");
    }

    #[test]
    fn test_spacing_multiple() {
        let engine = engine();
        assert_eq!(run(&engine, arbitrary_to_named, "w-[64rem]"), "w-256");
        assert_eq!(run(&engine, arbitrary_to_named, "[width:64rem]"), "w-256");
        assert_eq!(run(&engine, arbitrary_to_named, "-mt-[0.5rem]"), "-mt-2");
    }

    #[test]
    fn test_colour_with_modifier() {
        let mut theme = Theme::new();
        theme.add("--color-red-500", "red");
        let engine = SignatureEngine::new(Arc::new(DefaultDesignSystem::with_theme(theme)));
        assert_eq!(
            run(&engine, arbitrary_to_named, "[color:var(--color-red-500)]"),
            "text-red-500"
        );
        assert_eq!(
            run(&engine, arbitrary_to_named, "[color:var(--color-red-500)]/50"),
            "text-red-500/50"
        );
    }

    #[test]
    fn test_variables_must_survive() {
        let engine = engine();
        assert_eq!(
            run(&engine, arbitrary_to_named, "[width:var(--w)]"),
            "w-(--w)"
        );
    }

    #[test]
    fn test_no_equivalent() {
        let engine = engine();
        assert_eq!(run(&engine, arbitrary_to_named, "w-[13px]"), "w-[13px]");
        assert_eq!(run(&engine, arbitrary_to_named, "[cursor:pointer]"), "[cursor:pointer]");
    }
}

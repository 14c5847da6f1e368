//! Arbitrary values that have a bare spelling
//!
//! `z-[10]` → `z-10`, `opacity-[50%]` → `opacity-50`,
//! `aspect-[4/3]` → `aspect-4/3`.

use super::{first_equivalent, on_base};
use crate::signature::{SignatureEngine, SignatureOptions};
use tailor_core::fold::{format_number, parse_dimension};
use tailor_core::{Candidate, CandidateKind, Modifier, UtilityValue};

/// Pass ID for bare value promotion
pub const BARE_VALUES: &str = "bare-values";

fn is_whole(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn bare_forms(root: &str, value: &str) -> Vec<Candidate> {
    let value = value.trim();
    let named = |value: String| Candidate::functional(root, Some(UtilityValue::named(value)));

    if let Some((numerator, denominator)) = value.split_once('/') {
        let (numerator, denominator) = (numerator.trim(), denominator.trim());
        if !is_whole(numerator) || !is_whole(denominator) {
            return Vec::new();
        }
        let mut ratio = Candidate::functional(
            root,
            Some(UtilityValue::Named {
                value: numerator.to_string(),
                fraction: Some(format!("{numerator}/{denominator}")),
            }),
        );
        ratio.set_modifier(Some(Modifier::Named(denominator.to_string())));
        return vec![ratio];
    }

    let Some(dimension) = parse_dimension(value) else {
        return Vec::new();
    };
    if dimension.value < 0.0 || (dimension.value * 4.0).fract() != 0.0 {
        return Vec::new();
    }
    match dimension.unit.as_deref() {
        None | Some("%") => vec![named(format_number(dimension.value))],
        _ => Vec::new(),
    }
}

pub fn promote_bare_values(engine: &SignatureEngine, options: &SignatureOptions, candidate: Candidate) -> Candidate {
    let CandidateKind::Functional {
        root,
        value: Some(UtilityValue::Arbitrary { value, .. }),
        modifier: None,
    } = &candidate.kind
    else {
        return candidate;
    };
    let attempts = bare_forms(root, value);
    if attempts.is_empty() {
        return candidate;
    }
    on_base(candidate, |base| first_equivalent(engine, options, base, attempts))
}

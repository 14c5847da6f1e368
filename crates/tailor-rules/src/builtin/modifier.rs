//! Modifier simplification
//!
//! Tried in order: dropping the modifier, unwrapping `/[50%]` to `/50`,
//! scaling a `/[0.5]` fraction to `/50`.

use super::{first_equivalent, on_base};
use crate::signature::{SignatureEngine, SignatureOptions};
use tailor_core::fold::{format_number, parse_dimension};
use tailor_core::{Candidate, Modifier};

/// Pass ID for modifier simplification
pub const OPTIMIZE_MODIFIERS: &str = "optimize-modifiers";

fn simplified(modifier: &Modifier) -> Vec<Modifier> {
    let Modifier::Arbitrary(value) = modifier else {
        return Vec::new();
    };
    let Some(dimension) = parse_dimension(value.trim()) else {
        return Vec::new();
    };
    match dimension.unit.as_deref() {
        Some("%") | None if dimension.value >= 0.0 => {
            let mut attempts = vec![Modifier::Named(format_number(dimension.value))];
            if dimension.unit.is_none() && dimension.value <= 1.0 {
                attempts.push(Modifier::Named(format_number(dimension.value * 100.0)));
            }
            attempts
        }
        _ => Vec::new(),
    }
}

pub fn optimize_modifiers(engine: &SignatureEngine, options: &SignatureOptions, candidate: Candidate) -> Candidate {
    let Some(modifier) = candidate.modifier().cloned() else {
        return candidate;
    };

    on_base(candidate, |base| {
        let mut attempts = Vec::new();
        let mut without = base.clone();
        without.set_modifier(None);
        attempts.push(without);
        for replacement in simplified(&modifier) {
            let mut attempt = base.clone();
            attempt.set_modifier(Some(replacement));
            attempts.push(attempt);
        }
        first_equivalent(engine, options, base, attempts)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{engine, run};

    #[test]
    fn test_full_opacity_is_dropped() {
        let engine = engine();
        assert_eq!(run(&engine, optimize_modifiers, "bg-red-500/[100%]"), "bg-red-500");
        assert_eq!(run(&engine, optimize_modifiers, "bg-red-500/100"), "bg-red-500");
    }

    #[test]
    fn test_brackets_are_removed() {
        let engine = engine();
        assert_eq!(run(&engine, optimize_modifiers, "bg-red-500/[50%]"), "bg-red-500/50");
        assert_eq!(run(&engine, optimize_modifiers, "bg-red-500/[0.5]"), "bg-red-500/50");
    }

    #[test]
    fn test_meaningful_modifier_is_kept() {
        let engine = engine();
        assert_eq!(run(&engine, optimize_modifiers, "bg-red-500/50"), "bg-red-500/50");
        assert_eq!(
            run(&engine, optimize_modifiers, "bg-red-500/(--alpha)"),
            "bg-red-500/(--alpha)"
        );
    }
}

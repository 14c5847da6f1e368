//! Explicit data types the value already implies

use super::{first_equivalent, on_base};
use crate::signature::{SignatureEngine, SignatureOptions};
use tailor_core::{Candidate, CandidateKind, UtilityValue};

/// Pass ID for redundant data type removal
pub const REDUNDANT_DATA_TYPES: &str = "redundant-data-types";

/// Drop `color:` from `bg-[color:red]` when `bg-[red]` means the same
pub fn drop_redundant_data_types(
    engine: &SignatureEngine,
    options: &SignatureOptions,
    candidate: Candidate,
) -> Candidate {
    let has_data_type = matches!(
        &candidate.kind,
        CandidateKind::Functional {
            value: Some(UtilityValue::Arbitrary {
                data_type: Some(_),
                ..
            }),
            ..
        }
    );
    if !has_data_type {
        return candidate;
    }

    on_base(candidate, |base| {
        let mut untyped = base.clone();
        if let CandidateKind::Functional {
            value: Some(UtilityValue::Arbitrary { data_type, .. }),
            ..
        } = &mut untyped.kind
        {
            *data_type = None;
        }
        first_equivalent(engine, options, base, [untyped])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{engine, run};

    #[test]
    fn test_inferred_type_is_dropped() {
        let engine = engine();
        assert_eq!(run(&engine, drop_redundant_data_types, "bg-[color:red]"), "bg-[red]");
        assert_eq!(run(&engine, drop_redundant_data_types, "text-[length:2rem]"), "text-[2rem]");
    }

    #[test]
    fn test_needed_type_is_kept() {
        let engine = engine();
        // `var()` alone is read as a colour by `text-*`
        assert_eq!(
            run(&engine, drop_redundant_data_types, "text-[length:var(--size)]"),
            "text-(length:--size)"
        );
    }
}

//! Deprecated utilities with a direct replacement

use super::{on_base, parse_equivalent};
use crate::signature::{SignatureEngine, SignatureOptions};
use tailor_core::{Candidate, CandidateKind};

/// Pass ID for deprecated utility renames
pub const DEPRECATED_UTILITIES: &str = "deprecated-utilities";

const RENAMES: &[(&str, &str)] = &[("break-words", "wrap-break-word"), ("order-none", "order-0")];

pub fn rename_deprecated_utilities(
    engine: &SignatureEngine,
    options: &SignatureOptions,
    candidate: Candidate,
) -> Candidate {
    let CandidateKind::Static { root } = &candidate.kind else {
        return candidate;
    };
    let Some((_, replacement)) = RENAMES.iter().find(|(deprecated, _)| deprecated == root) else {
        return candidate;
    };
    on_base(candidate, |base| parse_equivalent(engine, options, base, replacement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{engine, run};

    #[test]
    fn test_renames() {
        let engine = engine();
        assert_eq!(run(&engine, rename_deprecated_utilities, "break-words"), "wrap-break-word");
        assert_eq!(run(&engine, rename_deprecated_utilities, "md:order-none"), "md:order-0");
        assert_eq!(run(&engine, rename_deprecated_utilities, "order-1"), "order-1");
    }
}

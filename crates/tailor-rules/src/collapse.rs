//! Utility collapse
//!
//! Candidates with the same variants and importance are merged into a
//! single utility when one covers exactly the declarations of several
//! (`mt-1 mr-1 mb-1 ml-1` → `m-1`). Larger merges are tried first.

use crate::signature::{SignatureEngine, SignatureOptions};
use indexmap::{IndexMap, IndexSet};
use tailor_core::Candidate;
use tracing::{debug, trace};

/// Largest group searched exhaustively
const MAX_GROUP: usize = 16;

struct Member {
    /// Position in the input
    position: usize,
    candidate: Candidate,
    /// Printed candidate without variants or importance
    base: String,
    /// Utilities setting any of this member's declarations
    related: IndexSet<String>,
}

/// Disjoint sets over member indexes
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let (a, b) = (self.find(a), self.find(b));
        if a != b {
            self.parent[b] = a;
        }
    }
}

/// Every `size`-bit mask below `1 << width`, in increasing order
fn masks(width: usize, size: usize) -> impl Iterator<Item = u32> {
    let limit = 1u32 << width;
    std::iter::successors(Some((1u32 << size) - 1), |&mask| {
        let lowest = mask & mask.wrapping_neg();
        let ripple = mask + lowest;
        Some((((ripple ^ mask) >> 2) / lowest) | ripple)
    })
    .take_while(move |&mask| mask < limit)
}

fn members_of(mask: u32) -> impl Iterator<Item = usize> {
    (0..MAX_GROUP).filter(move |bit| mask & (1 << bit) != 0)
}

fn related_utilities(engine: &SignatureEngine, options: &SignatureOptions, base: &str) -> IndexSet<String> {
    let Some(declarations) = engine.declarations(base, options) else {
        return IndexSet::new();
    };
    declarations
        .iter()
        .flat_map(|(property, value)| engine.utilities_setting(property, value, options))
        .collect()
}

/// The single utility equivalent to the members in `mask`, if any
fn replacement_for(
    engine: &SignatureEngine,
    options: &SignatureOptions,
    group: &[Member],
    mask: u32,
) -> Option<Candidate> {
    let mut selected = members_of(mask).map(|idx| &group[idx]);
    let first = selected.next()?;
    let rest: Vec<&Member> = selected.collect();

    let shared: Vec<&String> = first
        .related
        .iter()
        .filter(|name| rest.iter().all(|member| member.related.contains(*name)))
        .collect();
    if shared.is_empty() {
        return None;
    }

    let combined = std::iter::once(first)
        .chain(rest.iter().copied())
        .map(|member| member.base.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let signature = engine.utility_signature(&combined, options);
    if !signature.is_valid() {
        return None;
    }

    let design_system = engine.design_system();
    shared.into_iter().find_map(|name| {
        if engine.utility_signature(name, options) != signature {
            return None;
        }
        let replacement = design_system.parse_candidate(name).into_iter().next()?;
        debug!("Collapsed {combined} → {name}");
        Some(replacement.with_context_of(&first.candidate))
    })
}

/// Replacements for one group, keyed by the position they take
fn collapse_group(
    engine: &SignatureEngine,
    options: &SignatureOptions,
    group: &[Member],
) -> (IndexMap<usize, Candidate>, IndexSet<usize>) {
    let mut replacements = IndexMap::new();
    let mut consumed = IndexSet::new();
    let mut taken: u32 = 0;

    for size in (2..=group.len()).rev() {
        for mask in masks(group.len(), size) {
            if mask & taken != 0 {
                continue;
            }
            let Some(replacement) = replacement_for(engine, options, group, mask) else {
                continue;
            };
            taken |= mask;
            let mut positions = members_of(mask).map(|idx| group[idx].position);
            if let Some(first) = positions.next() {
                replacements.insert(first, replacement);
            }
            consumed.extend(positions);
        }
    }
    (replacements, consumed)
}

/// Split members into sets connected through a shared related utility
fn connected_groups(members: Vec<Member>) -> Vec<Vec<Member>> {
    let mut sets = UnionFind::new(members.len());
    for a in 0..members.len() {
        for b in a + 1..members.len() {
            if members[a]
                .related
                .iter()
                .any(|name| members[b].related.contains(name))
            {
                sets.union(a, b);
            }
        }
    }

    let mut groups: IndexMap<usize, Vec<Member>> = IndexMap::new();
    for (idx, member) in members.into_iter().enumerate() {
        groups.entry(sets.find(idx)).or_default().push(member);
    }
    groups
        .into_values()
        .filter(|group| group.len() > 1)
        .collect()
}

/// Merge candidates into shorthand utilities where possible
///
/// Candidates are compared with shorthand properties expanded. Merged
/// candidates take the position of the first member; the others are
/// removed. Anything that does not parse is left in place.
pub fn collapse_candidates(
    engine: &SignatureEngine,
    options: &SignatureOptions,
    candidates: Vec<String>,
) -> Vec<String> {
    let options = options.expanded();
    engine.warm(&options);
    let design_system = engine.design_system();

    let mut contexts: IndexMap<(String, bool), Vec<Member>> = IndexMap::new();
    for (position, text) in candidates.iter().enumerate() {
        let Some(candidate) = design_system.parse_candidate(text).into_iter().next() else {
            continue;
        };
        let variants = candidate
            .variants
            .iter()
            .map(|variant| design_system.print_variant(variant))
            .collect::<Vec<_>>()
            .join(":");
        let base = design_system.print_candidate(&candidate.base());
        let related = related_utilities(engine, &options, &base);
        contexts
            .entry((variants, candidate.important))
            .or_default()
            .push(Member {
                position,
                candidate,
                base,
                related,
            });
    }

    let mut replacements = IndexMap::new();
    let mut consumed = IndexSet::new();
    for members in contexts.into_values() {
        for mut group in connected_groups(members) {
            if group.len() > MAX_GROUP {
                trace!("Collapse group of {} truncated to {MAX_GROUP}", group.len());
                group.truncate(MAX_GROUP);
            }
            let (group_replacements, group_consumed) = collapse_group(engine, &options, &group);
            replacements.extend(group_replacements);
            consumed.extend(group_consumed);
        }
    }

    candidates
        .into_iter()
        .enumerate()
        .filter(|(position, _)| !consumed.contains(position))
        .map(|(position, text)| match replacements.get(&position) {
            Some(replacement) => design_system.print_candidate(replacement),
            None => text,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::SignatureFeatures;
    use std::sync::Arc;
    use tailor_core::DefaultDesignSystem;

    fn collapse_with(options: SignatureOptions, input: &[&str]) -> Vec<String> {
        let engine = SignatureEngine::new(Arc::new(DefaultDesignSystem::new()));
        let candidates = input.iter().map(|text| text.to_string()).collect();
        collapse_candidates(&engine, &options, candidates)
    }

    fn collapse(input: &[&str]) -> Vec<String> {
        collapse_with(SignatureOptions::default(), input)
    }

    #[test]
    fn test_masks_largest_first_order() {
        let all: Vec<u32> = masks(4, 2).collect();
        assert_eq!(all, vec![0b0011, 0b0101, 0b0110, 0b1001, 0b1010, 0b1100]);
        assert_eq!(masks(3, 3).collect::<Vec<_>>(), vec![0b111]);
    }

    #[test]
    fn test_four_sides_collapse() {
        assert_eq!(collapse(&["mt-1", "mr-1", "mb-1", "ml-1"]), vec!["m-1"]);
    }

    #[test]
    fn test_partial_collapse_keeps_position() {
        assert_eq!(
            collapse(&["flex", "mt-1", "mr-1", "italic", "mb-1", "ml-1"]),
            vec!["flex", "m-1", "italic"]
        );
    }

    #[test]
    fn test_logical_shorthand_needs_physical_mapping() {
        assert_eq!(collapse(&["ml-2", "mr-2"]), vec!["ml-2", "mr-2"]);

        let options = SignatureOptions {
            features: SignatureFeatures {
                logical_to_physical: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(collapse_with(options, &["ml-2", "mr-2"]), vec!["mx-2"]);
    }

    #[test]
    fn test_variants_must_match() {
        assert_eq!(
            collapse(&["hover:mt-1", "mb-1"]),
            vec!["hover:mt-1", "mb-1"]
        );
        assert_eq!(
            collapse(&["hover:mt-1", "hover:mr-1", "hover:mb-1", "hover:ml-1"]),
            vec!["hover:m-1"]
        );
    }

    #[test]
    fn test_different_values_do_not_collapse() {
        assert_eq!(collapse(&["ml-1", "mr-2"]), vec!["ml-1", "mr-2"]);
    }

    #[test]
    fn test_unparseable_is_kept() {
        assert_eq!(collapse(&["not-a-utility", "flex"]), vec!["not-a-utility", "flex"]);
    }
}

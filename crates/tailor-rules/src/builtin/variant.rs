//! Variant canonicalization
//!
//! Each variant is rewritten on its own, compound variants inside out.
//! Rewrites, in order:
//!
//! - `theme()` inside arbitrary variants becomes `--theme()`
//! - arbitrary selectors with a named shape: `[&>*]` → `*`, `[&_*]` → `**`,
//!   `[p_&]` → `in-[p]`, `[@media_not_print]` → `not-[@media_print]`,
//!   `[&[data-open]]` → `data-[open]`, `[&[aria-busy=true]]` → `aria-busy`,
//!   `[&:nth-child(2)]` → `nth-[2]`
//! - bare values: `nth-[2]` → `nth-2`, `data-[open]` → `data-open`,
//!   `aria-[busy=true]` → `aria-busy`
//! - the enumerable variant with the same signature, if any
//!
//! A rewrite is kept only when the variant signature is unchanged.

use super::theme::rewrite_theme_calls;
use crate::canonical::normalize_selector;
use crate::signature::{Signature, SignatureEngine, SignatureOptions};
use tailor_core::{Candidate, DesignSystem, Variant, VariantValue};

/// Pass ID for variant canonicalization
pub const CANONICAL_VARIANTS: &str = "canonical-variants";

const NTH_PSEUDO_CLASSES: &[(&str, &str)] = &[
    ("nth-child", "nth"),
    ("nth-last-child", "nth-last"),
    ("nth-of-type", "nth-of-type"),
    ("nth-last-of-type", "nth-last-of-type"),
];

fn signature(engine: &SignatureEngine, options: &SignatureOptions, variant: &Variant) -> Signature {
    engine.variant_signature(&engine.design_system().print_variant(variant), options)
}

fn modernize_theme(design_system: &dyn DesignSystem, variant: &Variant) -> Option<Variant> {
    match variant {
        Variant::Arbitrary { selector, relative } if selector.contains("theme(") => Some(Variant::Arbitrary {
            selector: rewrite_theme_calls(design_system, selector, true)?,
            relative: *relative,
        }),
        Variant::Functional {
            root,
            value: Some(VariantValue::Arbitrary(value)),
            modifier,
        } if value.contains("theme(") => Some(Variant::Functional {
            root: root.clone(),
            value: Some(VariantValue::Arbitrary(rewrite_theme_calls(design_system, value, true)?)),
            modifier: modifier.clone(),
        }),
        _ => None,
    }
}

fn functional(root: &str, value: VariantValue) -> Variant {
    Variant::functional(root, value)
}

/// Attribute body of `&[prefix…]`, brackets excluded
fn attribute<'a>(selector: &'a str, prefix: &str) -> Option<&'a str> {
    let body = selector.strip_prefix(&format!("&[{prefix}"))?.strip_suffix(']')?;
    (!body.is_empty() && !body.contains(['[', ']'])).then_some(body)
}

fn simplify_arbitrary(variant: &Variant) -> Option<Variant> {
    let Variant::Arbitrary {
        selector,
        relative: false,
    } = variant
    else {
        return None;
    };
    let selector = selector.trim();

    for (at_rule, negated) in [("@media not ", "@media "), ("@supports not ", "@supports ")] {
        if let Some(query) = selector.strip_prefix(at_rule) {
            return Some(Variant::compound(
                "not",
                Variant::arbitrary(format!("{negated}{}", query.trim())),
            ));
        }
    }
    if selector.starts_with('@') {
        return None;
    }

    let normalized = normalize_selector(selector);
    match normalized.as_str() {
        "&>*" => return Some(Variant::static_variant("*")),
        "& *" => return Some(Variant::static_variant("**")),
        _ => {}
    }
    if let Some(ancestor) = normalized.strip_suffix(" &")
        && !ancestor.contains('&')
    {
        return Some(functional("in", VariantValue::Arbitrary(ancestor.trim().to_string())));
    }
    if let Some(body) = attribute(selector, "data-") {
        return Some(functional("data", VariantValue::Arbitrary(body.to_string())));
    }
    if let Some(body) = attribute(selector, "aria-") {
        return Some(functional("aria", aria_value(body)));
    }
    let pseudo = selector.strip_prefix("&:")?;
    let (name, argument) = pseudo.strip_suffix(')')?.split_once('(')?;
    let (_, root) = NTH_PSEUDO_CLASSES.iter().find(|(pseudo, _)| *pseudo == name)?;
    Some(functional(root, VariantValue::Arbitrary(argument.trim().to_string())))
}

/// `busy=true` names the `aria-busy` variant
fn aria_value(body: &str) -> VariantValue {
    match body.split_once('=') {
        Some((name, "true" | "\"true\"" | "'true'")) => VariantValue::Named(name.trim().to_string()),
        _ => VariantValue::Arbitrary(body.to_string()),
    }
}

fn promote_bare(variant: &Variant) -> Option<Variant> {
    let Variant::Functional {
        root,
        value: Some(VariantValue::Arbitrary(value)),
        modifier,
    } = variant
    else {
        return None;
    };
    let name = match aria_value(value) {
        VariantValue::Named(name) if root == "aria" => name,
        _ => value.clone(),
    };
    let is_bare = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    is_bare.then(|| Variant::Functional {
        root: root.clone(),
        value: Some(VariantValue::Named(name)),
        modifier: modifier.clone(),
    })
}

/// The first enumerable variant with `signature`, unless `current` already is one
fn named_variant(
    engine: &SignatureEngine,
    options: &SignatureOptions,
    signature: &Signature,
    current: &Variant,
) -> Option<Variant> {
    let design_system = engine.design_system();
    let names = engine.variants_with_signature(signature, options);
    let printed = design_system.print_variant(current);
    if names.contains(&printed) {
        return None;
    }
    names.iter().find_map(|name| design_system.parse_variant(name))
}

fn canonical_variant(engine: &SignatureEngine, options: &SignatureOptions, variant: Variant) -> Variant {
    let expected = signature(engine, options, &variant);
    if !expected.is_valid() {
        return variant;
    }
    let design_system = engine.design_system();
    let holds = |attempt: &Variant| signature(engine, options, attempt) == expected;
    let mut current = variant;

    if let Variant::Compound {
        root,
        variant: inner,
        modifier,
    } = &current
    {
        let attempt = Variant::Compound {
            root: root.clone(),
            variant: Box::new(canonical_variant(engine, options, (**inner).clone())),
            modifier: modifier.clone(),
        };
        if attempt != current && holds(&attempt) {
            current = attempt;
        }
    }

    let steps: [&dyn Fn(&Variant) -> Option<Variant>; 3] = [
        &|variant| modernize_theme(design_system, variant),
        &simplify_arbitrary,
        &promote_bare,
    ];
    for step in steps {
        if let Some(attempt) = step(&current)
            && holds(&attempt)
        {
            current = attempt;
        }
    }

    match named_variant(engine, options, &expected, &current) {
        Some(named) if holds(&named) => named,
        _ => current,
    }
}

/// Rewrite every variant of a candidate to its canonical spelling
pub fn canonicalize_variants(
    engine: &SignatureEngine,
    options: &SignatureOptions,
    mut candidate: Candidate,
) -> Candidate {
    if candidate.variants.is_empty() {
        return candidate;
    }
    candidate.variants = std::mem::take(&mut candidate.variants)
        .into_iter()
        .map(|variant| canonical_variant(engine, options, variant))
        .collect();
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{engine, run};

    #[test]
    fn test_arbitrary_selectors_to_named() {
        let engine = engine();
        assert_eq!(run(&engine, canonicalize_variants, "[&:hover]:flex"), "hover:flex");
        assert_eq!(run(&engine, canonicalize_variants, "[&>*]:flex"), "*:flex");
        assert_eq!(run(&engine, canonicalize_variants, "[&_*]:flex"), "**:flex");
    }

    #[test]
    fn test_ancestor_selector_becomes_in() {
        let engine = engine();
        assert_eq!(run(&engine, canonicalize_variants, "[p_&]:flex"), "in-[p]:flex");
    }

    #[test]
    fn test_attribute_selectors() {
        let engine = engine();
        assert_eq!(run(&engine, canonicalize_variants, "[&[data-open]]:flex"), "data-open:flex");
        assert_eq!(
            run(&engine, canonicalize_variants, "[&[data-state=open]]:flex"),
            "data-[state=open]:flex"
        );
        assert_eq!(
            run(&engine, canonicalize_variants, "[&[aria-checked=true]]:flex"),
            "aria-checked:flex"
        );
        assert_eq!(
            run(&engine, canonicalize_variants, "aria-[checked=true]:flex"),
            "aria-checked:flex"
        );
        assert_eq!(
            run(&engine, canonicalize_variants, "aria-[sort=ascending]:flex"),
            "aria-[sort=ascending]:flex"
        );
    }

    #[test]
    fn test_nth_child() {
        let engine = engine();
        assert_eq!(run(&engine, canonicalize_variants, "[&:nth-child(3)]:flex"), "nth-3:flex");
        assert_eq!(run(&engine, canonicalize_variants, "nth-[2]:flex"), "nth-2:flex");
        assert_eq!(
            run(&engine, canonicalize_variants, "nth-[2n+1]:flex"),
            "nth-[2n+1]:flex"
        );
    }

    #[test]
    fn test_at_rules() {
        let engine = engine();
        assert_eq!(
            run(&engine, canonicalize_variants, "[@media_not_print]:flex"),
            "not-print:flex"
        );
        assert_eq!(
            run(&engine, canonicalize_variants, "min-[theme(screens.md)]:flex"),
            "md:flex"
        );
    }

    #[test]
    fn test_every_variant_is_rewritten() {
        let engine = engine();
        assert_eq!(
            run(&engine, canonicalize_variants, "[&:hover]:[&[data-open]]:flex"),
            "hover:data-open:flex"
        );
        assert_eq!(run(&engine, canonicalize_variants, "focus:flex"), "focus:flex");
    }
}

use super::{Candidate, CandidateKind, Modifier, UtilityValue, Variant, VariantValue};
use crate::value_parser::normalize_whitespace;

/// Encode a value for use inside `[...]`
///
/// Whitespace is normalized first, then spaces become `_` and literal
/// underscores are escaped. `url()` contents are copied as is.
pub fn encode_arbitrary_value(value: &str) -> String {
    let normalized = normalize_whitespace(value);
    let mut out = String::with_capacity(normalized.len());
    let mut url_depth = 0usize;
    let chars: Vec<char> = normalized.chars().collect();

    for (idx, &ch) in chars.iter().enumerate() {
        if url_depth == 0 && ch == '(' && idx >= 3 {
            let head: String = chars[idx - 3..idx].iter().collect();
            if head.eq_ignore_ascii_case("url") {
                url_depth = 1;
                out.push(ch);
                continue;
            }
        }
        if url_depth > 0 {
            match ch {
                '(' => url_depth += 1,
                ')' => url_depth -= 1,
                _ => {}
            }
            out.push(ch);
            continue;
        }
        match ch {
            '_' => out.push_str("\\_"),
            ' ' => out.push('_'),
            _ => out.push(ch),
        }
    }
    out
}

/// `var(--x)` without fallback prints as the `(--x)` shorthand
fn var_shorthand(value: &str) -> Option<&str> {
    let inner = value.strip_prefix("var(")?.strip_suffix(')')?;
    let is_plain = inner.starts_with("--")
        && inner
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    is_plain.then_some(inner)
}

pub fn print_modifier(modifier: &Modifier) -> String {
    match modifier {
        Modifier::Named(value) => format!("/{value}"),
        Modifier::Arbitrary(value) => match var_shorthand(value) {
            Some(variable) => format!("/({variable})"),
            None => format!("/[{}]", encode_arbitrary_value(value)),
        },
    }
}

/// Print a candidate in canonical form
pub fn print_candidate(candidate: &Candidate, prefix: Option<&str>) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(candidate.variants.len() + 2);
    if let Some(prefix) = prefix {
        parts.push(prefix.to_string());
    }
    parts.extend(candidate.variants.iter().map(print_variant));

    let mut base = String::new();
    match &candidate.kind {
        CandidateKind::Static { root } => base.push_str(root),
        CandidateKind::Functional {
            root,
            value,
            modifier,
        } => {
            base.push_str(root);
            match value {
                Some(UtilityValue::Named { value, .. }) => {
                    base.push('-');
                    base.push_str(value);
                }
                Some(UtilityValue::Arbitrary { value, data_type }) => {
                    match (var_shorthand(value), data_type) {
                        (Some(variable), None) => base.push_str(&format!("-({variable})")),
                        (Some(variable), Some(data_type)) => {
                            base.push_str(&format!("-({data_type}:{variable})"))
                        }
                        (None, None) => {
                            base.push_str(&format!("-[{}]", encode_arbitrary_value(value)))
                        }
                        (None, Some(data_type)) => base.push_str(&format!(
                            "-[{data_type}:{}]",
                            encode_arbitrary_value(value)
                        )),
                    }
                }
                None => {}
            }
            if let Some(modifier) = modifier {
                base.push_str(&print_modifier(modifier));
            }
        }
        CandidateKind::Arbitrary {
            property,
            value,
            modifier,
        } => {
            base.push_str(&format!("[{property}:{}]", encode_arbitrary_value(value)));
            if let Some(modifier) = modifier {
                base.push_str(&print_modifier(modifier));
            }
        }
    }
    if candidate.important {
        base.push('!');
    }
    parts.push(base);
    parts.join(":")
}

/// Print a single variant segment
pub fn print_variant(variant: &Variant) -> String {
    match variant {
        Variant::Static { root } => root.clone(),
        Variant::Functional {
            root,
            value,
            modifier,
        } => {
            let mut out = root.clone();
            match value {
                Some(VariantValue::Named(value)) => {
                    out.push('-');
                    out.push_str(value);
                }
                Some(VariantValue::Arbitrary(value)) => match var_shorthand(value) {
                    Some(variable) => out.push_str(&format!("-({variable})")),
                    None => out.push_str(&format!("-[{}]", encode_selector(value))),
                },
                None => {}
            }
            if let Some(modifier) = modifier {
                out.push_str(&print_modifier(modifier));
            }
            out
        }
        Variant::Arbitrary { selector, .. } => format!("[{}]", encode_selector(selector)),
        Variant::Compound {
            root,
            variant,
            modifier,
        } => {
            let mut out = format!("{root}-{}", print_variant(variant));
            if let Some(modifier) = modifier {
                out.push_str(&print_modifier(modifier));
            }
            out
        }
    }
}

/// Selectors keep their own spacing; only spaces and underscores are encoded
fn encode_selector(selector: &str) -> String {
    selector.trim().replace('_', "\\_").replace(' ', "_")
}

use super::{Candidate, CandidateKind, Modifier, UtilityValue, Variant, VariantValue};
use crate::fold::parse_dimension;
use std::collections::HashSet;

/// The roots a design system knows about, used to split candidate text
#[derive(Debug, Clone, Default)]
pub struct CandidateGrammar {
    pub prefix: Option<String>,
    pub static_utilities: HashSet<String>,
    pub functional_utilities: HashSet<String>,
    pub static_variants: HashSet<String>,
    pub functional_variants: HashSet<String>,
    pub compound_variants: HashSet<String>,
}

/// Split `input` on `separator` outside brackets, parentheses and quotes
pub fn segment(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut escaped = false;

    for (idx, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth -= 1,
            c if c == separator && depth <= 0 => {
                parts.push(&input[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

const MATH_FUNCTIONS: &[&str] = &[
    "calc", "min", "max", "clamp", "round", "mod", "rem", "abs", "sign", "pow", "sqrt", "hypot",
    "log", "exp",
];

/// Decode the text inside `[...]`
///
/// Underscores become spaces unless escaped (`\_`), `url()` contents are kept
/// verbatim, and math operators inside math functions get surrounding spaces.
pub fn decode_arbitrary_value(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if starts_with_at(&chars, i, "url(") {
            let mut depth = 0usize;
            while i < chars.len() {
                out.push(chars[i]);
                match chars[i] {
                    '(' => depth += 1,
                    ')' => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                i += 1;
            }
            i += 1;
            continue;
        }
        match ch {
            '\\' if chars.get(i + 1) == Some(&'_') => {
                out.push('_');
                i += 1;
            }
            '\\' => {
                out.push(ch);
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                    i += 1;
                }
            }
            '_' => out.push(' '),
            _ => out.push(ch),
        }
        i += 1;
    }

    add_whitespace_around_math_operators(&out)
}

fn starts_with_at(chars: &[char], at: usize, needle: &str) -> bool {
    let mut idx = at;
    for expected in needle.chars() {
        match chars.get(idx) {
            Some(ch) if ch.eq_ignore_ascii_case(&expected) => idx += 1,
            _ => return false,
        }
    }
    // `url(` must start an identifier, not end one (`myurl(`)
    at == 0 || (!chars[at - 1].is_ascii_alphanumeric() && chars[at - 1] != '-')
}

fn add_whitespace_around_math_operators(input: &str) -> String {
    if !MATH_FUNCTIONS
        .iter()
        .any(|name| input.contains(&format!("{name}(")))
    {
        return input.to_string();
    }

    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 8);
    let mut math_stack: Vec<bool> = Vec::new();
    let mut word = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let in_math = math_stack.last().copied().unwrap_or(false);
        match ch {
            '(' => {
                let name: String = out
                    .chars()
                    .rev()
                    .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                let is_math = MATH_FUNCTIONS.contains(&name.as_str()) || (name.is_empty() && in_math);
                math_stack.push(is_math);
                out.push(ch);
                word.clear();
            }
            ')' => {
                math_stack.pop();
                trim_trailing_spaces(&mut out);
                out.push(ch);
                word.clear();
            }
            ',' if in_math => {
                trim_trailing_spaces(&mut out);
                out.push_str(", ");
                word.clear();
                i = skip_spaces(&chars, i + 1);
                continue;
            }
            '*' | '/' if in_math => {
                push_operator(&mut out, ch);
                word.clear();
                i = skip_spaces(&chars, i + 1);
                continue;
            }
            '+' | '-' if in_math && is_binary_position(&out, &word) => {
                push_operator(&mut out, ch);
                word.clear();
                i = skip_spaces(&chars, i + 1);
                continue;
            }
            ' ' => {
                out.push(ch);
                word.clear();
            }
            _ => {
                out.push(ch);
                word.push(ch);
            }
        }
        i += 1;
    }
    out
}

fn trim_trailing_spaces(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
}

fn push_operator(out: &mut String, op: char) {
    trim_trailing_spaces(out);
    out.push(' ');
    out.push(op);
    out.push(' ');
}

fn skip_spaces(chars: &[char], mut i: usize) -> usize {
    while chars.get(i) == Some(&' ') {
        i += 1;
    }
    i
}

fn is_binary_position(out: &str, word: &str) -> bool {
    if word.is_empty() {
        return out.trim_end().ends_with(')');
    }
    let first = word.chars().next().unwrap_or(' ');
    if !(first.is_ascii_digit() || first == '.') {
        return false;
    }
    // `1e-3` is a single number
    let exponent = word.ends_with(['e', 'E'])
        && word[..word.len() - 1]
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.');
    !exponent
}

fn is_valid_arbitrary(value: &str) -> bool {
    if value.trim().is_empty() {
        return false;
    }
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for ch in value.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ')' | ']' | '}' => {
                if stack.pop() != Some(ch) {
                    return false;
                }
            }
            ';' if stack.is_empty() => return false,
            _ => {}
        }
    }
    stack.is_empty() && quote.is_none()
}

const DATA_TYPES: &[&str] = &[
    "color",
    "length",
    "percentage",
    "number",
    "integer",
    "ratio",
    "url",
    "image",
    "position",
    "angle",
    "line-width",
    "bg-size",
    "family-name",
    "absolute-size",
    "relative-size",
    "shadow",
    "any",
];

pub fn is_known_data_type(name: &str) -> bool {
    DATA_TYPES.contains(&name)
}

const NAMED_COLORS: &[&str] = &[
    "transparent",
    "currentcolor",
    "black",
    "white",
    "red",
    "green",
    "blue",
    "yellow",
    "orange",
    "purple",
    "pink",
    "gray",
    "grey",
    "brown",
    "cyan",
    "magenta",
    "lime",
    "navy",
    "teal",
    "olive",
    "maroon",
    "silver",
    "gold",
    "indigo",
    "violet",
    "crimson",
    "coral",
    "salmon",
    "tomato",
    "rebeccapurple",
];

const COLOR_FUNCTIONS: &[&str] = &[
    "rgb(",
    "rgba(",
    "hsl(",
    "hsla(",
    "hwb(",
    "lab(",
    "lch(",
    "oklab(",
    "oklch(",
    "color(",
    "color-mix(",
    "light-dark(",
];

const LENGTH_UNITS: &[&str] = &[
    "px", "rem", "em", "ex", "ch", "vw", "vh", "vmin", "vmax", "dvh", "dvw", "svh", "svw", "lvh",
    "lvw", "cqw", "cqh", "in", "cm", "mm", "q", "pc", "pt", "lh", "rlh",
];

/// Best-effort data type of an arbitrary value, `None` when ambiguous
pub fn infer_data_type(value: &str) -> Option<&'static str> {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();

    if lower.starts_with('#')
        && matches!(lower.len(), 4 | 5 | 7 | 9)
        && lower[1..].chars().all(|c| c.is_ascii_hexdigit())
    {
        return Some("color");
    }
    if NAMED_COLORS.contains(&lower.as_str())
        || COLOR_FUNCTIONS.iter().any(|f| lower.starts_with(f))
        || lower.starts_with("var(--color-")
    {
        return Some("color");
    }
    if lower.starts_with("url(") || lower.contains("gradient(") || lower.starts_with("image-set(") {
        return Some("image");
    }
    if MATH_FUNCTIONS.iter().any(|f| lower.starts_with(&format!("{f}("))) {
        return Some("length");
    }
    if let Some(dimension) = parse_dimension(&lower) {
        return match dimension.unit.as_deref() {
            None if dimension.value == 0.0 => Some("length"),
            None => Some("number"),
            Some("%") => Some("percentage"),
            Some(unit) if LENGTH_UNITS.contains(&unit) => Some("length"),
            Some("deg" | "rad" | "grad" | "turn") => Some("angle"),
            Some(_) => None,
        };
    }
    None
}

fn parse_arbitrary_utility_value(inner: &str) -> Option<UtilityValue> {
    // `[color:var(--x)]` carries an explicit data type.
    let parts = segment(inner, ':');
    if parts.len() >= 2 && is_known_data_type(parts[0]) {
        let value = decode_arbitrary_value(&inner[parts[0].len() + 1..]);
        if !is_valid_arbitrary(&value) {
            return None;
        }
        return Some(UtilityValue::Arbitrary {
            value,
            data_type: Some(parts[0].to_string()),
        });
    }
    let value = decode_arbitrary_value(inner);
    if !is_valid_arbitrary(&value) {
        return None;
    }
    Some(UtilityValue::Arbitrary {
        value,
        data_type: None,
    })
}

fn parse_var_shorthand(inner: &str) -> Option<(String, Option<String>)> {
    let (data_type, variable) = match inner.split_once(':') {
        Some((data_type, variable)) if is_known_data_type(data_type) => {
            (Some(data_type.to_string()), variable)
        }
        _ => (None, inner),
    };
    if !variable.starts_with("--") || !is_valid_arbitrary(variable) {
        return None;
    }
    Some((format!("var({})", decode_arbitrary_value(variable)), data_type))
}

fn parse_modifier(input: &str) -> Option<Modifier> {
    if input.is_empty() {
        return None;
    }
    if let Some(inner) = input.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let value = decode_arbitrary_value(inner);
        return is_valid_arbitrary(&value).then_some(Modifier::Arbitrary(value));
    }
    if let Some(inner) = input.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        let (value, _) = parse_var_shorthand(inner)?;
        return Some(Modifier::Arbitrary(value));
    }
    if input.contains(['[', ']', '(', ')']) {
        return None;
    }
    Some(Modifier::Named(input.to_string()))
}

fn is_valid_property(property: &str) -> bool {
    let body = property
        .strip_prefix("--")
        .or_else(|| property.strip_prefix('-'))
        .unwrap_or(property);
    !body.is_empty()
        && body.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && body.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Every split of `base` into a known root and a value, longest root first
fn functional_splits<'a>(base: &'a str, roots: &HashSet<String>) -> Vec<(&'a str, Option<&'a str>)> {
    let mut splits = Vec::new();
    if roots.contains(base) {
        splits.push((base, None));
    }
    let limit = base.find(['[', '(']).unwrap_or(base.len());
    for (idx, _) in base[..limit].match_indices('-').collect::<Vec<_>>().into_iter().rev() {
        if idx == 0 {
            continue;
        }
        let root = &base[..idx];
        if roots.contains(root) {
            splits.push((root, Some(&base[idx + 1..])));
        }
    }
    splits
}

/// Parse a class token into every candidate it could denote
///
/// Unknown roots and malformed arbitrary values yield an empty list.
pub fn parse_candidate(input: &str, grammar: &CandidateGrammar) -> Vec<Candidate> {
    let mut segments = segment(input, ':');
    if let Some(prefix) = &grammar.prefix {
        if segments.len() < 2 || segments[0] != prefix {
            return Vec::new();
        }
        segments.remove(0);
    }
    let Some(mut base) = segments.pop() else {
        return Vec::new();
    };

    let mut variants = Vec::with_capacity(segments.len());
    for text in segments {
        match parse_variant(text, grammar) {
            Some(variant) => variants.push(variant),
            None => return Vec::new(),
        }
    }

    let mut important = false;
    if let Some(stripped) = base.strip_suffix('!') {
        base = stripped;
        important = true;
    } else if let Some(stripped) = base.strip_prefix('!') {
        base = stripped;
        important = true;
    }
    if base.is_empty() {
        return Vec::new();
    }

    let finish = |kind: CandidateKind| Candidate {
        kind,
        variants: variants.clone(),
        important,
    };

    let mut candidates = Vec::new();
    if grammar.static_utilities.contains(base) {
        candidates.push(finish(CandidateKind::Static {
            root: base.to_string(),
        }));
    }

    let parts = segment(base, '/');
    if parts.len() > 2 {
        return candidates;
    }
    let without_modifier = parts[0];
    let modifier = match parts.get(1) {
        Some(text) => match parse_modifier(text) {
            Some(modifier) => Some(modifier),
            None => return candidates,
        },
        None => None,
    };

    if let Some(inner) = without_modifier
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
    {
        let Some((property, value)) = inner.split_once(':') else {
            return candidates;
        };
        let value = decode_arbitrary_value(value);
        if !is_valid_property(property) || !is_valid_arbitrary(&value) {
            return candidates;
        }
        candidates.push(finish(CandidateKind::Arbitrary {
            property: property.to_string(),
            value,
            modifier,
        }));
        return candidates;
    }

    if let Some(start) = without_modifier.find("-[")
        && without_modifier.ends_with(']')
    {
        let root = &without_modifier[..start];
        if grammar.functional_utilities.contains(root)
            && let Some(value) =
                parse_arbitrary_utility_value(&without_modifier[start + 2..without_modifier.len() - 1])
        {
            candidates.push(finish(CandidateKind::Functional {
                root: root.to_string(),
                value: Some(value),
                modifier,
            }));
        }
        return candidates;
    }

    if let Some(start) = without_modifier.find("-(")
        && without_modifier.ends_with(')')
    {
        let root = &without_modifier[..start];
        if grammar.functional_utilities.contains(root)
            && let Some((value, data_type)) =
                parse_var_shorthand(&without_modifier[start + 2..without_modifier.len() - 1])
        {
            candidates.push(finish(CandidateKind::Functional {
                root: root.to_string(),
                value: Some(UtilityValue::Arbitrary { value, data_type }),
                modifier,
            }));
        }
        return candidates;
    }

    for (root, value) in functional_splits(without_modifier, &grammar.functional_utilities) {
        let value = match value {
            None => None,
            Some("") => continue,
            Some(value) => {
                let fraction = match &modifier {
                    Some(Modifier::Named(denominator)) => Some(format!("{value}/{denominator}")),
                    _ => None,
                };
                Some(UtilityValue::Named {
                    value: value.to_string(),
                    fraction,
                })
            }
        };
        candidates.push(finish(CandidateKind::Functional {
            root: root.to_string(),
            value,
            modifier: modifier.clone(),
        }));
    }

    candidates
}

/// Parse a single variant segment
pub fn parse_variant(input: &str, grammar: &CandidateGrammar) -> Option<Variant> {
    if input.is_empty() {
        return None;
    }

    if let Some(inner) = input.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let selector = decode_arbitrary_value(inner);
        if !is_valid_arbitrary(&selector) {
            return None;
        }
        let relative = selector.starts_with(['>', '+', '~']);
        return Some(Variant::Arbitrary { selector, relative });
    }

    if grammar.static_variants.contains(input) {
        return Some(Variant::Static {
            root: input.to_string(),
        });
    }

    let parts = segment(input, '/');
    if parts.len() > 2 {
        return None;
    }
    let base = parts[0];
    let modifier = match parts.get(1) {
        Some(text) => Some(parse_modifier(text)?),
        None => None,
    };

    let limit = base.find(['[', '(']).unwrap_or(base.len());
    for (idx, _) in base[..limit].match_indices('-').collect::<Vec<_>>().into_iter().rev() {
        let root = &base[..idx];
        let rest = &base[idx + 1..];
        if rest.is_empty() {
            continue;
        }

        if grammar.functional_variants.contains(root) {
            let value = if let Some(inner) = rest.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                let value = decode_arbitrary_value(inner);
                if !is_valid_arbitrary(&value) {
                    return None;
                }
                VariantValue::Arbitrary(value)
            } else if let Some(inner) = rest.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
                let (value, _) = parse_var_shorthand(inner)?;
                VariantValue::Arbitrary(value)
            } else {
                VariantValue::Named(rest.to_string())
            };
            return Some(Variant::Functional {
                root: root.to_string(),
                value: Some(value),
                modifier,
            });
        }

        if grammar.compound_variants.contains(root) {
            let inner = parse_variant(rest, grammar)?;
            return Some(Variant::Compound {
                root: root.to_string(),
                variant: Box::new(inner),
                modifier,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar() -> CandidateGrammar {
        let set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        CandidateGrammar {
            prefix: None,
            static_utilities: set(&["flex", "italic", "bg-linear-to-t"]),
            functional_utilities: set(&["bg", "w", "-m", "m", "inset", "inset-x", "text"]),
            static_variants: set(&["hover", "focus", "*"]),
            functional_variants: set(&["data", "nth", "min"]),
            compound_variants: set(&["group", "not"]),
        }
    }

    #[test]
    fn test_segment() {
        assert_eq!(segment("hover:focus:flex", ':'), vec!["hover", "focus", "flex"]);
        assert_eq!(
            segment("[&:hover]:[color:red]", ':'),
            vec!["[&:hover]", "[color:red]"]
        );
        assert_eq!(segment("w-[calc(1/2)]/50", '/'), vec!["w-[calc(1/2)]", "50"]);
    }

    #[test]
    fn test_decode_arbitrary_value() {
        assert_eq!(decode_arbitrary_value("_flex_"), " flex ");
        assert_eq!(decode_arbitrary_value(r"a\_b"), "a_b");
        assert_eq!(decode_arbitrary_value("url(a_b.png)"), "url(a_b.png)");
        assert_eq!(decode_arbitrary_value("calc(1rem*2)"), "calc(1rem * 2)");
        assert_eq!(
            decode_arbitrary_value("calc(100%-var(--a-b))"),
            "calc(100% - var(--a-b))"
        );
        assert_eq!(decode_arbitrary_value("calc(1rem*-1)"), "calc(1rem * -1)");
        assert_eq!(
            decode_arbitrary_value("clamp(1rem,2vw,3rem)"),
            "clamp(1rem, 2vw, 3rem)"
        );
        assert_eq!(decode_arbitrary_value("var(--x)"), "var(--x)");
    }

    #[test]
    fn test_infer_data_type() {
        assert_eq!(infer_data_type("#f00"), Some("color"));
        assert_eq!(infer_data_type("red"), Some("color"));
        assert_eq!(infer_data_type("oklch(60% 0.2 20)"), Some("color"));
        assert_eq!(infer_data_type("64rem"), Some("length"));
        assert_eq!(infer_data_type("50%"), Some("percentage"));
        assert_eq!(infer_data_type("2"), Some("number"));
        assert_eq!(infer_data_type("url(a.png)"), Some("image"));
        assert_eq!(infer_data_type("var(--x)"), None);
    }

    #[test]
    fn test_parse_static() {
        let candidates = parse_candidate("flex", &grammar());
        assert_eq!(candidates, vec![Candidate::static_utility("flex")]);
    }

    #[test]
    fn test_parse_important_and_variants() {
        let candidates = parse_candidate("hover:focus:flex!", &grammar());
        assert_eq!(candidates.len(), 1);
        let candidate = &candidates[0];
        assert!(candidate.important);
        assert_eq!(
            candidate.variants,
            vec![Variant::static_variant("hover"), Variant::static_variant("focus")]
        );

        let legacy = parse_candidate("!flex", &grammar());
        assert!(legacy[0].important);
    }

    #[test]
    fn test_parse_functional_named_with_modifier() {
        let candidates = parse_candidate("bg-red-500/50", &grammar());
        assert_eq!(
            candidates,
            vec![Candidate {
                kind: CandidateKind::Functional {
                    root: "bg".into(),
                    value: Some(UtilityValue::Named {
                        value: "red-500".into(),
                        fraction: Some("red-500/50".into()),
                    }),
                    modifier: Some(Modifier::Named("50".into())),
                },
                variants: vec![],
                important: false,
            }]
        );
    }

    #[test]
    fn test_parse_multiple_roots() {
        let candidates = parse_candidate("inset-x-1", &grammar());
        let roots: Vec<_> = candidates.iter().filter_map(Candidate::root).collect();
        assert_eq!(roots, vec!["inset-x", "inset"]);
    }

    #[test]
    fn test_parse_negative_root() {
        let candidates = parse_candidate("-m-2", &grammar());
        assert_eq!(candidates[0].root(), Some("-m"));
    }

    #[test]
    fn test_parse_arbitrary_value_and_data_type() {
        let candidates = parse_candidate("w-[64rem]", &grammar());
        assert_eq!(
            candidates[0].kind,
            CandidateKind::Functional {
                root: "w".into(),
                value: Some(UtilityValue::arbitrary("64rem")),
                modifier: None,
            }
        );

        let candidates = parse_candidate("text-[color:var(--x)]", &grammar());
        assert_eq!(
            candidates[0].kind,
            CandidateKind::Functional {
                root: "text".into(),
                value: Some(UtilityValue::Arbitrary {
                    value: "var(--x)".into(),
                    data_type: Some("color".into()),
                }),
                modifier: None,
            }
        );
    }

    #[test]
    fn test_parse_var_shorthand() {
        let candidates = parse_candidate("bg-(--brand)/(--alpha)", &grammar());
        assert_eq!(
            candidates[0].kind,
            CandidateKind::Functional {
                root: "bg".into(),
                value: Some(UtilityValue::arbitrary("var(--brand)")),
                modifier: Some(Modifier::Arbitrary("var(--alpha)".into())),
            }
        );
    }

    #[test]
    fn test_parse_arbitrary_property() {
        let candidates = parse_candidate("[display:_flex_]", &grammar());
        assert_eq!(
            candidates,
            vec![Candidate::arbitrary("display", " flex ")]
        );
        assert!(parse_candidate("[not a property:1]", &grammar()).is_empty());
        assert!(parse_candidate("[color:red;x:y]", &grammar()).is_empty());
    }

    #[test]
    fn test_parse_unknown() {
        assert!(parse_candidate("nope-1", &grammar()).is_empty());
        assert!(parse_candidate("wat:flex", &grammar()).is_empty());
        assert!(parse_candidate("", &grammar()).is_empty());
    }

    #[test]
    fn test_parse_prefix() {
        let mut grammar = grammar();
        grammar.prefix = Some("tw".into());
        assert_eq!(parse_candidate("tw:flex", &grammar).len(), 1);
        assert!(parse_candidate("flex", &grammar).is_empty());
    }

    #[test]
    fn test_parse_variants() {
        let grammar = grammar();
        assert_eq!(
            parse_variant("[&_p]", &grammar),
            Some(Variant::arbitrary("& p"))
        );
        assert_eq!(
            parse_variant("[>img]", &grammar),
            Some(Variant::Arbitrary {
                selector: ">img".into(),
                relative: true
            })
        );
        assert_eq!(
            parse_variant("data-[state=open]", &grammar),
            Some(Variant::functional(
                "data",
                VariantValue::Arbitrary("state=open".into())
            ))
        );
        assert_eq!(
            parse_variant("group-hover/item", &grammar),
            Some(Variant::Compound {
                root: "group".into(),
                variant: Box::new(Variant::static_variant("hover")),
                modifier: Some(Modifier::Named("item".into())),
            })
        );
        assert_eq!(
            parse_variant("not-data-open", &grammar),
            Some(Variant::compound(
                "not",
                Variant::functional("data", VariantValue::Named("open".into()))
            ))
        );
        assert_eq!(parse_variant("unknown", &grammar), None);
    }
}

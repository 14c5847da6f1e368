//! Canonical form of compiled CSS
//!
//! Two candidates are equivalent when their compiled CSS is identical after
//! this pass. Theme variables are inlined, arithmetic is folded, whitespace
//! is normalized and declarations are sorted by property.

use crate::signature::{SignatureFeatures, SignatureOptions};
use tailor_core::css::{CssNode, flatten};
use tailor_core::fold::fold;
use tailor_core::selector_parser::{self, SelectorNode};
use tailor_core::value_parser::{self, ValueNode, normalize_whitespace};
use tailor_core::walk::{ExitAction, WalkAction, walk, walk_exit};
use tailor_core::{DesignSystem, ResolveOptions};

/// Canonicalize compiled nodes
///
/// Nodes are flattened first, so the result is a list of
/// `at-rule* > rule > declaration*` blocks.
pub(crate) fn canonicalize(
    nodes: &[CssNode],
    design_system: &dyn DesignSystem,
    options: &SignatureOptions,
) -> Vec<CssNode> {
    let mut nodes = flatten(nodes);

    walk(&mut nodes, |node: &mut CssNode, _| match node {
        CssNode::Comment(_) => WalkAction::Replace(Vec::new()),
        CssNode::AtRule { name, .. } if name == "property" => WalkAction::Replace(Vec::new()),
        CssNode::Declaration { property, .. } if property == "--tw-sort" => {
            WalkAction::Replace(Vec::new())
        }
        CssNode::Declaration { value, .. } => {
            *value = canonical_value(value, design_system, options.rem_px);
            WalkAction::Continue
        }
        CssNode::Rule { selector, .. } => {
            *selector = normalize_selector(selector);
            WalkAction::Continue
        }
        CssNode::AtRule { params, .. } => {
            *params = normalize_params(params);
            WalkAction::Continue
        }
    });

    walk(&mut nodes, |node: &mut CssNode, _| {
        if let CssNode::Rule { nodes, .. } = node {
            normalize_declarations(nodes, options.features);
            return WalkAction::Skip;
        }
        WalkAction::Continue
    });

    nodes.retain(|node| match node {
        CssNode::Rule { nodes, .. } | CssNode::AtRule { nodes, .. } => !nodes.is_empty(),
        _ => true,
    });
    nodes
}

/// Inline theme variables, fold arithmetic and normalize whitespace
pub(crate) fn canonical_value(value: &str, design_system: &dyn DesignSystem, rem_px: Option<f64>) -> String {
    let mut seen = Vec::new();
    let resolved = resolve_variables(value, design_system, &mut seen);
    normalize_whitespace(&fold(&resolved, rem_px))
}

/// Replace `var(--token)` with the token's value
///
/// Only tokens the theme defines are inlined. A call with a fallback is
/// inlined only when the fallback resolves to the token's value; otherwise
/// it stays a `var()` with its (resolved) fallback.
pub(crate) fn resolve_variables(
    value: &str,
    design_system: &dyn DesignSystem,
    seen: &mut Vec<String>,
) -> String {
    if !value.contains("var(") {
        return value.to_string();
    }

    let mut ast = value_parser::parse(value);
    walk_exit(&mut ast, |node: &mut ValueNode, _| {
        let ValueNode::Function { name, nodes } = node else {
            return ExitAction::Continue;
        };
        if name != "var" {
            return ExitAction::Continue;
        }
        let arguments = value_parser::to_css(nodes);
        let (variable, fallback) = match arguments.split_once(',') {
            Some((variable, fallback)) => (variable.trim().to_string(), Some(fallback)),
            None => (arguments.trim().to_string(), None),
        };
        let defined = design_system
            .theme_reference(&variable, ResolveOptions { suppress_inline: true })
            .is_some();
        if !defined || seen.contains(&variable) {
            return ExitAction::Continue;
        }
        let Some(raw) = design_system.resolve_theme_value(&variable) else {
            return ExitAction::Continue;
        };
        seen.push(variable);
        let inlined = resolve_variables(&raw, design_system, seen);
        seen.pop();
        if let Some(fallback) = fallback
            && comparable(fallback) != comparable(&inlined)
        {
            return ExitAction::Continue;
        }
        ExitAction::Replace(vec![ValueNode::Word(inlined)])
    });
    value_parser::to_css(&ast)
}

fn comparable(value: &str) -> String {
    normalize_whitespace(&fold(value.trim(), None))
}

/// Normalize at-rule params: operator separators lose their padding
fn normalize_params(params: &str) -> String {
    let mut ast = value_parser::parse(params.trim());
    walk(&mut ast, |node: &mut ValueNode, _| {
        if let ValueNode::Separator(separator) = node {
            let trimmed = separator.trim();
            *separator = if trimmed.is_empty() {
                " ".to_string()
            } else {
                trimmed.to_string()
            };
        }
        WalkAction::Continue
    });
    value_parser::to_css(&ast)
}

/// Normalize a selector
///
/// - combinators lose their padding (descendant combinators become one space)
/// - attribute values are double-quoted
/// - `:is(x)` and `:where(x)` with a single compound argument are unwrapped
///   when that keeps the selector valid
pub(crate) fn normalize_selector(selector: &str) -> String {
    let mut ast = selector_parser::parse(selector.trim());
    walk(&mut ast, |node: &mut SelectorNode, _| {
        match node {
            SelectorNode::Combinator(combinator) => {
                let trimmed = combinator.trim();
                *combinator = if trimmed.is_empty() {
                    " ".to_string()
                } else {
                    trimmed.to_string()
                };
            }
            SelectorNode::Separator(separator) => *separator = ",".to_string(),
            SelectorNode::Selector(attribute) if attribute.starts_with('[') => {
                *attribute = normalize_attribute(attribute);
            }
            _ => {}
        }
        WalkAction::Continue
    });
    walk_exit(&mut ast, |node: &mut SelectorNode, _| {
        if let SelectorNode::Function { nodes, .. } = node {
            unwrap_single_arguments(nodes);
        }
        ExitAction::Continue
    });
    unwrap_single_arguments(&mut ast);
    selector_parser::to_css(&ast)
}

fn normalize_attribute(attribute: &str) -> String {
    let Some(inner) = attribute.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
        return attribute.to_string();
    };
    let Some(eq) = inner.find('=') else {
        return format!("[{}]", inner.trim());
    };
    let name = inner[..eq].trim();
    let rest = inner[eq + 1..].trim();

    let (value, flag) = match rest.chars().next() {
        Some(quote @ ('"' | '\'')) => match rest[1..].find(quote) {
            Some(end) => (&rest[1..end + 1], rest[end + 2..].trim()),
            None => return attribute.to_string(),
        },
        _ => match rest.rsplit_once(' ') {
            Some((value, flag)) if matches!(flag, "i" | "s" | "I" | "S") => (value.trim(), flag),
            _ => (rest, ""),
        },
    };
    if flag.is_empty() {
        format!("[{name}=\"{value}\"]")
    } else {
        format!("[{name}=\"{value}\" {flag}]")
    }
}

fn is_single_compound(nodes: &[SelectorNode]) -> bool {
    !nodes.is_empty()
        && nodes
            .iter()
            .all(|node| !matches!(node, SelectorNode::Combinator(_) | SelectorNode::Separator(_)))
}

fn attaches_to_compound(node: &SelectorNode) -> bool {
    match node {
        SelectorNode::Selector(selector) => selector.starts_with(['.', '#', ':', '[']),
        SelectorNode::Function { name, .. } => name.starts_with(':'),
        _ => false,
    }
}

/// Unwrap `:is()`/`:where()` calls in one list; nested lists are handled
/// by the caller, innermost first
fn unwrap_single_arguments(nodes: &mut Vec<SelectorNode>) {
    let mut idx = 0;
    while idx < nodes.len() {
        let starts_compound = idx == 0
            || matches!(
                nodes[idx - 1],
                SelectorNode::Combinator(_) | SelectorNode::Separator(_)
            );
        let next_attaches = nodes.get(idx + 1).is_none_or(|next| {
            !matches!(next, SelectorNode::Selector(selector) if !selector.starts_with(['.', '#', ':', '[']))
        });

        let ends_selector = nodes
            .get(idx + 1)
            .is_none_or(|next| matches!(next, SelectorNode::Separator(_)));

        let unwrap = match &nodes[idx] {
            SelectorNode::Function { name, nodes: children } => {
                let simple = (name == ":is" || name == ":where")
                    && is_single_compound(children)
                    && (starts_compound || attaches_to_compound(&children[0]))
                    && next_attaches;
                // `:is(.a > .b)` standing alone is just `.a > .b`
                let whole = name == ":is"
                    && starts_compound
                    && ends_selector
                    && !children.is_empty()
                    && !children.iter().any(|child| matches!(child, SelectorNode::Separator(_)));
                simple || whole
            }
            _ => false,
        };

        if unwrap && let SelectorNode::Function { nodes: children, .. } = &mut nodes[idx] {
            let children = std::mem::take(children);
            let count = children.len();
            nodes.splice(idx..idx + 1, children);
            idx += count;
        } else {
            idx += 1;
        }
    }
}

/// Sides of a box shorthand, in `top right bottom left` order
fn box_sides(values: &[String]) -> Option<[String; 4]> {
    let [top, right, bottom, left] = match values {
        [all] => [all, all, all, all],
        [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
        [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
        [top, right, bottom, left] => [top, right, bottom, left],
        _ => return None,
    };
    Some([top.clone(), right.clone(), bottom.clone(), left.clone()])
}

fn pair(values: &[String]) -> Option<[String; 2]> {
    match values {
        [both] => Some([both.clone(), both.clone()]),
        [start, end] => Some([start.clone(), end.clone()]),
        _ => None,
    }
}

/// Split a value on top-level whitespace
fn components(value: &str) -> Vec<String> {
    let ast = value_parser::parse(value);
    let mut parts = vec![String::new()];
    for node in &ast {
        match node {
            ValueNode::Separator(separator) if separator.trim().is_empty() => {
                parts.push(String::new())
            }
            other => {
                if let Some(last) = parts.last_mut() {
                    last.push_str(&value_parser::to_css(std::slice::from_ref(other)));
                }
            }
        }
    }
    parts.retain(|part| !part.is_empty());
    parts
}

/// Longhands of a shorthand declaration, `None` when not a known shorthand
fn expand(property: &str, value: &str) -> Option<Vec<(String, String)>> {
    let values = components(value);
    let longhands: Vec<(String, String)> = match property {
        "margin" | "padding" => {
            let sides = box_sides(&values)?;
            ["top", "right", "bottom", "left"]
                .iter()
                .zip(sides)
                .map(|(side, value)| (format!("{property}-{side}"), value))
                .collect()
        }
        "inset" => {
            let sides = box_sides(&values)?;
            ["top", "right", "bottom", "left"]
                .iter()
                .zip(sides)
                .map(|(side, value)| (side.to_string(), value))
                .collect()
        }
        "margin-inline" | "margin-block" | "padding-inline" | "padding-block" | "inset-inline"
        | "inset-block" => {
            let [start, end] = pair(&values)?;
            vec![
                (format!("{property}-start"), start),
                (format!("{property}-end"), end),
            ]
        }
        "gap" => {
            let [row, column] = pair(&values)?;
            vec![("row-gap".to_string(), row), ("column-gap".to_string(), column)]
        }
        _ => return None,
    };
    Some(longhands)
}

fn physical(property: &str) -> Option<String> {
    let (prefix, logical) = match property.strip_prefix("inset-") {
        Some(logical) => ("", logical),
        None => {
            let (box_property, logical) = property.split_once('-')?;
            if box_property != "margin" && box_property != "padding" {
                return None;
            }
            (box_property, logical)
        }
    };
    let side = match logical {
        "inline-start" => "left",
        "inline-end" => "right",
        "block-start" => "top",
        "block-end" => "bottom",
        _ => return None,
    };
    Some(if prefix.is_empty() {
        side.to_string()
    } else {
        format!("{prefix}-{side}")
    })
}

/// Rewrite the declarations of one rule into their canonical order and shape
fn normalize_declarations(nodes: &mut Vec<CssNode>, features: SignatureFeatures) {
    let mut declarations: Vec<(String, String, bool)> = Vec::with_capacity(nodes.len());
    let mut others = Vec::new();
    for node in nodes.drain(..) {
        match node {
            CssNode::Declaration {
                property,
                value,
                important,
            } => declarations.push((property, value, important)),
            other => others.push(other),
        }
    }

    // `--tw-font-weight: 700` next to `font-weight: 700` adds nothing
    let shadowed: Vec<String> = declarations
        .iter()
        .filter(|(helper, value, _)| {
            helper.strip_prefix("--tw-").is_some_and(|property| {
                declarations
                    .iter()
                    .any(|(other, other_value, _)| other == property && other_value == value)
            })
        })
        .map(|(helper, _, _)| helper.clone())
        .collect();
    declarations.retain(|(property, _, _)| !shadowed.contains(property));

    if features.expand_properties {
        declarations = declarations
            .into_iter()
            .flat_map(|(property, value, important)| match expand(&property, &value) {
                Some(longhands) => longhands
                    .into_iter()
                    .map(|(property, value)| (property, value, important))
                    .collect(),
                None => vec![(property, value, important)],
            })
            .collect();
    }

    if features.logical_to_physical {
        for (property, _, _) in &mut declarations {
            if let Some(mapped) = physical(property) {
                *property = mapped;
            }
        }
    }

    // Later declarations win
    let mut deduped: Vec<(String, String, bool)> = Vec::with_capacity(declarations.len());
    for declaration in declarations {
        deduped.retain(|(property, _, _)| *property != declaration.0);
        deduped.push(declaration);
    }
    deduped.sort_by(|a, b| a.0.cmp(&b.0));

    nodes.extend(
        deduped
            .into_iter()
            .map(|(property, value, important)| CssNode::Declaration {
                property,
                value,
                important,
            }),
    );
    nodes.extend(others);
}

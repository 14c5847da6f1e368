//! CSS functions available inside arbitrary values
//!
//! - `theme(colors.red.500 / 50%, fallback)` inlines the raw token value
//! - `--theme(--color-red-500 / 50%)` references the token as `var()`
//! - `--spacing(4)` multiplies the spacing scale
//! - `--alpha(red / 50%)` applies opacity to a colour

use crate::fold::{format_number, parse_dimension};
use crate::theme::{ResolveOptions, Theme};
use crate::value_parser::{self, ValueNode};
use crate::walk::{ExitAction, walk_exit};
use tracing::trace;

/// Where a value is being substituted
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FunctionContext {
    pub resolve: ResolveOptions,
    /// At-rule params cannot reference custom properties
    pub in_at_rule: bool,
}

const FUNCTIONS: &[&str] = &["theme(", "--theme(", "--spacing(", "--alpha("];

/// Apply `alpha` to a colour
///
/// Unitless alphas are fractions (`0.5` → `50%`). A `100%` alpha returns the
/// colour unchanged.
pub fn with_alpha(color: &str, alpha: &str) -> String {
    let alpha = alpha.trim();
    let alpha = match parse_dimension(alpha) {
        Some(dimension) if dimension.unit.is_none() => {
            format!("{}%", format_number(dimension.value * 100.0))
        }
        _ => alpha.to_string(),
    };
    if alpha == "100%" {
        return color.to_string();
    }
    format!("color-mix(in oklab, {color} {alpha}, transparent)")
}

/// Split `path / alpha, fallback` into its parts
fn split_arguments(nodes: &[ValueNode]) -> (String, Option<String>, Option<String>) {
    let text = value_parser::to_css(nodes);
    let (head, fallback) = match split_top_level(&text, ',') {
        Some((head, rest)) => (head.to_string(), Some(rest.trim().to_string())),
        None => (text.clone(), None),
    };
    let (path, alpha) = match split_top_level(&head, '/') {
        Some((path, alpha)) => (path.trim().to_string(), Some(alpha.trim().to_string())),
        None => (head.trim().to_string(), None),
    };
    (path, alpha, fallback.filter(|value| !value.is_empty()))
}

fn split_top_level(input: &str, separator: char) -> Option<(&str, &str)> {
    let mut depth = 0i32;
    for (idx, ch) in input.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            c if c == separator && depth == 0 => {
                return Some((&input[..idx], &input[idx + ch.len_utf8()..]));
            }
            _ => {}
        }
    }
    None
}

fn legacy_theme(theme: &Theme, nodes: &[ValueNode]) -> Option<String> {
    let (path, alpha, fallback) = split_arguments(nodes);
    let value = match theme.resolve_path(&path) {
        Some(value) => value,
        None => fallback?,
    };
    Some(match alpha {
        Some(alpha) => with_alpha(&value, &alpha),
        None => value,
    })
}

fn modern_theme(theme: &Theme, nodes: &[ValueNode], ctx: FunctionContext) -> Option<String> {
    let (path, alpha, fallback) = split_arguments(nodes);
    let (name, force_inline) = match path.strip_suffix(" inline") {
        Some(name) => (name.trim().to_string(), true),
        None => (path, false),
    };
    if !name.starts_with("--") {
        return None;
    }
    let value = match theme.get(&name) {
        Some(entry) if force_inline || ctx.in_at_rule => entry.value.clone(),
        Some(_) => theme.reference(&name, ctx.resolve)?,
        None => fallback?,
    };
    Some(match alpha {
        Some(alpha) => with_alpha(&value, &alpha),
        None => value,
    })
}

fn spacing(theme: &Theme, nodes: &[ValueNode], ctx: FunctionContext) -> Option<String> {
    let multiplier = value_parser::to_css(nodes);
    let multiplier = multiplier.trim();
    if multiplier.is_empty() {
        return None;
    }
    let base = if ctx.in_at_rule {
        theme.value("--spacing")?.to_string()
    } else {
        theme.reference("--spacing", ctx.resolve)?
    };
    Some(format!("calc({base} * {multiplier})"))
}

fn alpha(nodes: &[ValueNode]) -> Option<String> {
    let text = value_parser::to_css(nodes);
    let (color, alpha) = split_top_level(&text, '/')?;
    let color = color.trim();
    if color.is_empty() {
        return None;
    }
    Some(with_alpha(color, alpha))
}

/// Replace value functions in `value`
///
/// Returns `None` when a function cannot be resolved, which makes the
/// surrounding candidate invalid.
pub(crate) fn substitute_functions(value: &str, theme: &Theme, ctx: FunctionContext) -> Option<String> {
    if !FUNCTIONS.iter().any(|function| value.contains(function)) {
        return Some(value.to_string());
    }

    let mut ast = value_parser::parse(value);
    let mut failed = false;
    walk_exit(&mut ast, |node: &mut ValueNode, _| {
        let ValueNode::Function { name, nodes } = node else {
            return ExitAction::Continue;
        };
        let resolved = match name.as_str() {
            "theme" => legacy_theme(theme, nodes),
            "--theme" => modern_theme(theme, nodes, ctx),
            "--spacing" => spacing(theme, nodes, ctx),
            "--alpha" => alpha(nodes),
            _ => return ExitAction::Continue,
        };
        match resolved {
            Some(resolved) => ExitAction::Replace(vec![ValueNode::Word(resolved)]),
            None => {
                trace!("unresolved {}({})", name, value_parser::to_css(nodes));
                failed = true;
                ExitAction::Stop
            }
        }
    });

    if failed {
        None
    } else {
        Some(value_parser::to_css(&ast))
    }
}

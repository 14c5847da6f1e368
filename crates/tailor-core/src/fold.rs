//! Constant folding for CSS values
//!
//! Canonicalizes dimensions (`0px` → `0`, `1in` → `96px`, `500ms` → `0.5s`)
//! and folds two-operand `calc()` expressions such as `calc(0.25rem * 4)`.
//! Only a `calc()` whose body is exactly `lhs op rhs` folds, so
//! `calc(1 + 2 + 3)` stays symbolic.

use crate::value_parser::{self, ValueNode};
use crate::walk::{ExitAction, walk_exit};
use once_cell::sync::Lazy;
use regex::Regex;

static DIMENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([-+]?(?:\d+\.?\d*|\.\d+)(?:e[-+]?\d+)?)([a-z]+|%)?$")
        .unwrap_or_else(|err| panic!("invalid dimension pattern: {err}"))
});

/// A parsed number with an optional unit (lowercased, `%` included)
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub value: f64,
    pub unit: Option<String>,
}

impl Dimension {
    pub fn new(value: f64, unit: Option<&str>) -> Self {
        Self {
            value,
            unit: unit.map(str::to_string),
        }
    }

    pub fn is_unitless_zero(&self) -> bool {
        self.value == 0.0 && self.unit.is_none()
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            format_number(self.value),
            self.unit.as_deref().unwrap_or("")
        )
    }
}

/// Parse `12`, `-0.5rem`, `50%`, `1e3px`
pub fn parse_dimension(input: &str) -> Option<Dimension> {
    let captures = DIMENSION.captures(input)?;
    let value: f64 = captures.get(1)?.as_str().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let unit = captures.get(2).map(|unit| unit.as_str().to_ascii_lowercase());
    Some(Dimension { value, unit })
}

/// Shortest decimal representation, with `-0` printed as `0`
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let rounded = (value * 1e10).round() / 1e10;
    if (rounded - value).abs() < 1e-12 {
        format!("{rounded}")
    } else {
        format!("{value}")
    }
}

/// Convert a dimension to its canonical unit
///
/// Absolute lengths become `px`, angles `deg`, times `s` and frequencies
/// `hz`. `rem` becomes `px` only when a root font size is known.
pub fn canonicalize_dimension(dimension: &Dimension, root_font_px: Option<f64>) -> Dimension {
    let Some(unit) = dimension.unit.as_deref() else {
        return dimension.clone();
    };
    let (factor, target) = match unit {
        "in" => (96.0, "px"),
        "cm" => (96.0 / 2.54, "px"),
        "mm" => (96.0 / 25.4, "px"),
        "q" => (96.0 / 101.6, "px"),
        "pc" => (16.0, "px"),
        "pt" => (4.0 / 3.0, "px"),
        "grad" => (0.9, "deg"),
        "rad" => (180.0 / std::f64::consts::PI, "deg"),
        "turn" => (360.0, "deg"),
        "ms" => (0.001, "s"),
        "khz" => (1000.0, "hz"),
        "rem" => match root_font_px {
            Some(px) => (px, "px"),
            None => return dimension.clone(),
        },
        _ => return dimension.clone(),
    };
    Dimension::new(dimension.value * factor, Some(target))
}

fn canonical_word(word: &str, root_font_px: Option<f64>) -> Option<String> {
    let dimension = parse_dimension(word)?;
    let canonical = canonicalize_dimension(&dimension, root_font_px);
    if canonical.value == 0.0 && canonical.unit.as_deref() != Some("%") {
        return Some("0".to_string());
    }
    Some(canonical.to_string())
}

enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

fn fold_operation(lhs: &Dimension, op: Operator, rhs: &Dimension) -> Option<Dimension> {
    match op {
        Operator::Mul => {
            if lhs.is_unitless_zero() || rhs.is_unitless_zero() {
                return Some(Dimension::new(0.0, None));
            }
            let unit = match (&lhs.unit, &rhs.unit) {
                (None, None) => None,
                (Some(unit), None) | (None, Some(unit)) => Some(unit.as_str()),
                (Some(_), Some(_)) => return None,
            };
            Some(Dimension::new(lhs.value * rhs.value, unit))
        }
        Operator::Div => {
            if rhs.value == 0.0 {
                return None;
            }
            match (&lhs.unit, &rhs.unit) {
                (unit, None) => Some(Dimension::new(lhs.value / rhs.value, unit.as_deref())),
                _ => None,
            }
        }
        Operator::Add | Operator::Sub => {
            if lhs.unit != rhs.unit {
                return None;
            }
            let value = match op {
                Operator::Add => lhs.value + rhs.value,
                _ => lhs.value - rhs.value,
            };
            Some(Dimension::new(value, lhs.unit.as_deref()))
        }
    }
}

fn fold_group(nodes: &[ValueNode], root_font_px: Option<f64>) -> Option<String> {
    let operand = |node: &ValueNode| match node {
        ValueNode::Word(word) => {
            parse_dimension(word).map(|dimension| canonicalize_dimension(&dimension, root_font_px))
        }
        _ => None,
    };

    let (lhs, op, rhs) = match nodes {
        [lhs, ValueNode::Separator(_), ValueNode::Word(op), ValueNode::Separator(_), rhs] => {
            let op = match op.as_str() {
                "+" => Operator::Add,
                "-" => Operator::Sub,
                "*" => Operator::Mul,
                "/" => Operator::Div,
                _ => return None,
            };
            (lhs, op, rhs)
        }
        // `/` is a separator character, so `a / b` arrives as three nodes.
        [lhs, ValueNode::Separator(sep), rhs] if sep.trim() == "/" => (lhs, Operator::Div, rhs),
        _ => return None,
    };

    if matches!(op, Operator::Mul) {
        let zero = |node: &ValueNode| operand(node).is_some_and(|dim| dim.is_unitless_zero());
        if zero(lhs) || zero(rhs) {
            return Some("0".to_string());
        }
    }

    let folded = fold_operation(&operand(lhs)?, op, &operand(rhs)?)?;
    if folded.value == 0.0 && folded.unit.as_deref() != Some("%") {
        return Some("0".to_string());
    }
    Some(folded.to_string())
}

/// Constant-fold a declaration value
///
/// Returns the input unchanged when nothing folds.
pub fn fold(input: &str, root_font_px: Option<f64>) -> String {
    let mut ast = value_parser::parse(input);
    let mut folded = false;

    walk_exit(&mut ast, |node: &mut ValueNode, _| match node {
        ValueNode::Word(word) if word != "0" => match canonical_word(word, root_font_px) {
            Some(canonical) if canonical != *word => {
                folded = true;
                ExitAction::Replace(vec![ValueNode::Word(canonical)])
            }
            _ => ExitAction::Continue,
        },
        ValueNode::Function { name, nodes } if name == "calc" || name.is_empty() => {
            match fold_group(nodes, root_font_px) {
                Some(result) => {
                    folded = true;
                    ExitAction::Replace(vec![ValueNode::Word(result)])
                }
                None => ExitAction::Continue,
            }
        }
        _ => ExitAction::Continue,
    });

    if folded {
        value_parser::to_css(&ast)
    } else {
        input.to_string()
    }
}

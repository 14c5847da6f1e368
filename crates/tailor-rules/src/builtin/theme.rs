//! `theme()` calls in arbitrary values
//!
//! `theme(colors.red.500)` becomes `var(--color-red-500)`. A single call
//! carrying an opacity (`theme(colors.red.500/50%)`) moves the opacity onto
//! the candidate's own modifier when the value is nothing but that call;
//! every other shape with an opacity is rewritten to `--theme()`.

use super::{first_equivalent, on_base, with_arbitrary_value};
use crate::signature::{SignatureEngine, SignatureOptions};
use tailor_core::fold::{format_number, parse_dimension};
use tailor_core::theme::key_path_to_variable;
use tailor_core::value_parser::{self, ValueNode};
use tailor_core::walk::{ExitAction, WalkAction, walk, walk_exit};
use tailor_core::{Candidate, DesignSystem, Modifier, ResolveOptions};

/// Pass ID for `theme()` conversion
pub const THEME_TO_VAR: &str = "theme-to-var";

/// Argument text of every `theme()` call in `value`
fn theme_calls(value: &str) -> Vec<String> {
    let mut ast = value_parser::parse(value);
    let mut calls = Vec::new();
    walk(&mut ast, |node: &mut ValueNode, _| match node {
        ValueNode::Function { name, nodes } if name == "theme" => {
            calls.push(value_parser::to_css(nodes));
            WalkAction::Skip
        }
        _ => WalkAction::Continue,
    });
    calls
}

fn split_modifier(arguments: &str) -> (&str, Option<&str>) {
    match arguments.split_once('/') {
        Some((path, modifier)) => (path.trim(), Some(modifier.trim())),
        None => (arguments.trim(), None),
    }
}

fn is_defined(design_system: &dyn DesignSystem, variable: &str) -> bool {
    design_system
        .theme_reference(variable, ResolveOptions { suppress_inline: true })
        .is_some()
}

fn rewrite_call(design_system: &dyn DesignSystem, arguments: &str, modern: bool) -> Option<String> {
    // Fallbacks have no `var()` equivalent that keeps the raw value
    if arguments.contains(',') {
        return None;
    }
    let (path, modifier) = split_modifier(arguments);
    let variable = key_path_to_variable(path)?;

    if is_defined(design_system, &variable) {
        return Some(match modifier {
            Some(modifier) => format!("--theme({variable}/{modifier})"),
            None if modern => format!("--theme({variable})"),
            None => format!("var({variable})"),
        });
    }

    if modifier.is_some() || modern {
        return None;
    }
    let step = variable.strip_prefix("--spacing-")?.replace('_', ".");
    let multiplier = parse_dimension(&step)?;
    if multiplier.unit.is_some() || !is_defined(design_system, "--spacing") {
        return None;
    }
    Some(format!("--spacing({})", format_number(multiplier.value)))
}

/// Rewrite every `theme()` call in `value`
///
/// With `modern` set the calls become `--theme()`, which also resolves
/// inside at-rule params. `None` when a call names no known token.
pub(crate) fn rewrite_theme_calls(design_system: &dyn DesignSystem, value: &str, modern: bool) -> Option<String> {
    let mut ast = value_parser::parse(value);
    let mut failed = false;
    walk_exit(&mut ast, |node: &mut ValueNode, _| {
        let ValueNode::Function { name, nodes } = node else {
            return ExitAction::Continue;
        };
        if name != "theme" {
            return ExitAction::Continue;
        }
        match rewrite_call(design_system, &value_parser::to_css(nodes), modern) {
            Some(replacement) => ExitAction::Replace(vec![ValueNode::Word(replacement)]),
            None => {
                failed = true;
                ExitAction::Stop
            }
        }
    });
    (!failed).then(|| value_parser::to_css(&ast))
}

/// `50%` → `/50`, `.12` → `/12`, anything else stays arbitrary
fn lifted_modifier(modifier: &str) -> Modifier {
    if let Some(dimension) = parse_dimension(modifier) {
        match dimension.unit.as_deref() {
            Some("%") => return Modifier::Named(format_number(dimension.value)),
            None if (0.0..=1.0).contains(&dimension.value) => {
                return Modifier::Named(format_number(dimension.value * 100.0));
            }
            _ => {}
        }
    }
    Modifier::Arbitrary(modifier.to_string())
}

/// Whether the value is a lone function call, surrounding whitespace aside
fn is_single_node(value: &str) -> bool {
    let ast = value_parser::parse(value.trim());
    ast.len() == 1 && ast[0].is_function("theme")
}

fn lift(design_system: &dyn DesignSystem, base: &Candidate, arguments: &str) -> Option<Candidate> {
    let (path, modifier) = split_modifier(arguments);
    let variable = key_path_to_variable(path)?;
    if !is_defined(design_system, &variable) {
        return None;
    }
    let mut lifted = with_arbitrary_value(base, format!("var({variable})"));
    lifted.set_modifier(Some(lifted_modifier(modifier?)));
    Some(lifted)
}

pub fn theme_to_var(engine: &SignatureEngine, options: &SignatureOptions, candidate: Candidate) -> Candidate {
    let Some(value) = candidate.arbitrary_value().map(str::to_string) else {
        return candidate;
    };
    let calls = theme_calls(&value);
    if calls.is_empty() {
        return candidate;
    }
    let design_system = engine.design_system();
    let with_modifier = calls.iter().filter(|call| call.contains('/')).count();

    on_base(candidate, |base| {
        let mut attempts = Vec::new();
        if with_modifier == 0 {
            if let Some(rewritten) = rewrite_theme_calls(design_system, &value, false) {
                attempts.push(with_arbitrary_value(base, rewritten));
            }
        } else {
            if with_modifier == 1
                && calls.len() == 1
                && base.modifier().is_none()
                && is_single_node(&value)
                && let Some(lifted) = lift(design_system, base, &calls[0])
            {
                attempts.push(lifted);
            }
            if let Some(rewritten) = rewrite_theme_calls(design_system, &value, true) {
                attempts.push(with_arbitrary_value(base, rewritten));
            }
        }
        first_equivalent(engine, options, base, attempts)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{engine, run};
    use std::sync::Arc;
    use tailor_core::{DefaultDesignSystem, Theme};

    #[test]
    fn test_no_theme_call_is_untouched() {
        let engine = engine();
        assert_eq!(run(&engine, theme_to_var, "[color:red]"), "[color:red]");
        assert_eq!(run(&engine, theme_to_var, "flex"), "flex");
    }

    #[test]
    fn test_calls_without_modifier_become_var() {
        let engine = engine();
        assert_eq!(
            run(&engine, theme_to_var, "[color:theme(colors.red.500)]"),
            "[color:var(--color-red-500)]"
        );
        assert_eq!(
            run(&engine, theme_to_var, "hover:bg-[theme(colors.red.500)]"),
            "hover:bg-(--color-red-500)"
        );
    }

    #[test]
    fn test_spacing_steps_without_token_use_spacing_function() {
        let mut theme = Theme::new();
        theme.add("--spacing", "0.25rem");
        let engine = SignatureEngine::new(Arc::new(DefaultDesignSystem::with_theme(theme)));
        assert_eq!(
            run(&engine, theme_to_var, "w-[theme(spacing.4)]"),
            "w-[--spacing(4)]"
        );
        assert_eq!(
            run(&engine, theme_to_var, "w-[calc(theme(spacing.4)*2)]"),
            "w-[calc(--spacing(4)*2)]"
        );
    }

    #[test]
    fn test_single_modifier_is_lifted() {
        let engine = engine();
        assert_eq!(
            run(&engine, theme_to_var, "[color:theme(colors.red.500/50%)]"),
            "[color:var(--color-red-500)]/50"
        );
        assert_eq!(
            run(&engine, theme_to_var, "bg-[theme(colors.red.500/.12)]"),
            "bg-(--color-red-500)/12"
        );
    }

    #[test]
    fn test_compound_value_uses_modern_function() {
        let engine = engine();
        assert_eq!(
            run(
                &engine,
                theme_to_var,
                "[box-shadow:0_0_2px_theme(colors.red.500/50%)]"
            ),
            "[box-shadow:0_0_2px_--theme(--color-red-500/50%)]"
        );
    }

    #[test]
    fn test_unknown_token_is_untouched() {
        let engine = engine();
        assert_eq!(
            run(&engine, theme_to_var, "[color:theme(colors.nope.500)]"),
            "[color:theme(colors.nope.500)]"
        );
    }

    #[test]
    fn test_lifted_modifier() {
        assert_eq!(lifted_modifier("50%"), Modifier::Named("50".into()));
        assert_eq!(lifted_modifier(".12"), Modifier::Named("12".into()));
        assert_eq!(lifted_modifier("0.5"), Modifier::Named("50".into()));
        assert_eq!(lifted_modifier("var(--a)"), Modifier::Arbitrary("var(--a)".into()));
    }
}

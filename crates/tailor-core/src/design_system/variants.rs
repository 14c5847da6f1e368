//! Built-in variants
//!
//! Every variant resolves to a [`VariantShape`]: either a selector containing
//! `&` or an at-rule. Applying a variant wraps the compiled nodes in that
//! shape.

use super::functions::{FunctionContext, substitute_functions};
use crate::candidate::{Modifier, Variant, VariantValue};
use crate::css::{CssNode, escape_class_name};
use crate::theme::Theme;
use indexmap::IndexMap;

/// What a variant wraps its nodes in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantShape {
    Selector(String),
    AtRule { name: String, params: String },
}

impl VariantShape {
    fn selector(selector: impl Into<String>) -> Self {
        VariantShape::Selector(selector.into())
    }

    fn media(params: impl Into<String>) -> Self {
        VariantShape::AtRule {
            name: "media".to_string(),
            params: params.into(),
        }
    }

    /// Wrap `nodes`
    pub fn wrap(self, nodes: Vec<CssNode>) -> Vec<CssNode> {
        match self {
            VariantShape::Selector(selector) => vec![CssNode::rule(selector, nodes)],
            VariantShape::AtRule { name, params } => vec![CssNode::at_rule(name, params, nodes)],
        }
    }
}

pub(crate) const FUNCTIONAL_VARIANTS: &[&str] = &[
    "data",
    "aria",
    "nth",
    "nth-last",
    "nth-of-type",
    "nth-last-of-type",
    "supports",
    "min",
    "max",
    "in",
];

pub(crate) const COMPOUND_VARIANTS: &[&str] = &["group", "peer", "not", "has"];

/// Pseudo-class variants usable inside `group-*`, `peer-*`, `not-*` and `has-*`
const PSEUDO_CLASSES: &[(&str, &str)] = &[
    ("hover", "&:hover"),
    ("focus", "&:focus"),
    ("focus-visible", "&:focus-visible"),
    ("focus-within", "&:focus-within"),
    ("active", "&:active"),
    ("visited", "&:visited"),
    ("disabled", "&:disabled"),
    ("checked", "&:checked"),
    ("required", "&:required"),
    ("invalid", "&:invalid"),
    ("first", "&:first-child"),
    ("last", "&:last-child"),
    ("only", "&:only-child"),
    ("odd", "&:nth-child(odd)"),
    ("even", "&:nth-child(even)"),
    ("empty", "&:empty"),
];

pub(crate) struct VariantRegistry {
    statics: IndexMap<String, VariantShape>,
    breakpoints: Vec<String>,
}

impl VariantRegistry {
    pub(crate) fn builtin(theme: &Theme) -> Self {
        let mut statics = IndexMap::new();
        for (name, selector) in PSEUDO_CLASSES {
            statics.insert(name.to_string(), VariantShape::selector(*selector));
        }
        for (name, selector) in [
            ("before", "&::before"),
            ("after", "&::after"),
            ("placeholder", "&::placeholder"),
            ("*", ":is(& > *)"),
            ("**", ":is(& *)"),
        ] {
            statics.insert(name.to_string(), VariantShape::selector(selector));
        }
        statics.insert(
            "dark".to_string(),
            VariantShape::media("(prefers-color-scheme: dark)"),
        );
        statics.insert("print".to_string(), VariantShape::media("print"));

        let breakpoints = theme.keys("--breakpoint");
        for breakpoint in &breakpoints {
            if let Some(value) = theme.value(&format!("--breakpoint-{breakpoint}")) {
                statics.insert(
                    breakpoint.clone(),
                    VariantShape::media(format!("(width >= {value})")),
                );
            }
        }

        Self {
            statics,
            breakpoints,
        }
    }

    pub(crate) fn static_names(&self) -> impl Iterator<Item = &String> {
        self.statics.keys()
    }

    /// Enumerable variants, statics first
    pub(crate) fn list(&self) -> Vec<String> {
        let mut list: Vec<String> = self.statics.keys().cloned().collect();
        for breakpoint in &self.breakpoints {
            list.push(format!("min-{breakpoint}"));
            list.push(format!("max-{breakpoint}"));
        }
        for (name, _) in PSEUDO_CLASSES {
            for root in COMPOUND_VARIANTS {
                list.push(format!("{root}-{name}"));
            }
        }
        for name in ["dark", "print"]
            .into_iter()
            .map(str::to_string)
            .chain(self.breakpoints.iter().cloned())
        {
            list.push(format!("not-{name}"));
        }
        list
    }

    /// Resolve a variant to its shape
    pub(crate) fn shape(&self, variant: &Variant, theme: &Theme, ctx: FunctionContext) -> Option<VariantShape> {
        match variant {
            Variant::Static { root } => self.statics.get(root).cloned(),
            Variant::Functional {
                root,
                value,
                modifier,
            } => {
                if modifier.is_some() {
                    return None;
                }
                functional_shape(root, value.as_ref()?, theme, ctx)
            }
            Variant::Arbitrary { selector, relative } => arbitrary_shape(selector, *relative, theme, ctx),
            Variant::Compound {
                root,
                variant,
                modifier,
            } => self.compound_shape(root, variant, modifier.as_ref(), theme, ctx),
        }
    }

    fn compound_shape(
        &self,
        root: &str,
        inner: &Variant,
        modifier: Option<&Modifier>,
        theme: &Theme,
        ctx: FunctionContext,
    ) -> Option<VariantShape> {
        match root {
            "group" | "peer" => {
                let VariantShape::Selector(selector) = self.shape(inner, theme, ctx)? else {
                    return None;
                };
                if !selector.contains('&') {
                    return None;
                }
                let marker = match modifier {
                    Some(Modifier::Named(name)) => {
                        format!(".{}", escape_class_name(&format!("{root}/{name}")))
                    }
                    Some(Modifier::Arbitrary(_)) => return None,
                    None => format!(".{root}"),
                };
                let relation = if root == "group" { " " } else { " ~ " };
                let scoped = selector.replace('&', &format!(":where({marker})"));
                Some(VariantShape::selector(format!("&:is({scoped}{relation}*)")))
            }
            "not" => {
                if modifier.is_some() {
                    return None;
                }
                match self.shape(inner, theme, ctx)? {
                    VariantShape::Selector(selector) => {
                        let rest = selector.strip_prefix('&')?;
                        if rest.is_empty() || rest.contains('&') {
                            return None;
                        }
                        Some(VariantShape::selector(format!("&:not({rest})")))
                    }
                    VariantShape::AtRule { name, params } => {
                        if name != "media" && name != "supports" {
                            return None;
                        }
                        let params = match params.strip_prefix("not ") {
                            Some(negated) => negated.to_string(),
                            None => format!("not {params}"),
                        };
                        Some(VariantShape::AtRule { name, params })
                    }
                }
            }
            "has" => {
                if modifier.is_some() {
                    return None;
                }
                if let Variant::Arbitrary { selector, relative } = inner
                    && !selector.contains('&')
                {
                    let selector = if *relative {
                        selector.trim().to_string()
                    } else {
                        selector.clone()
                    };
                    return Some(VariantShape::selector(format!("&:has({selector})")));
                }
                let VariantShape::Selector(selector) = self.shape(inner, theme, ctx)? else {
                    return None;
                };
                let rest = selector.strip_prefix('&')?;
                if rest.contains('&') {
                    return None;
                }
                Some(VariantShape::selector(format!("&:has(*{rest})")))
            }
            _ => None,
        }
    }

    /// Wrap `nodes` in `variant`
    pub(crate) fn apply(
        &self,
        variant: &Variant,
        mut nodes: Vec<CssNode>,
        theme: &Theme,
        ctx: FunctionContext,
    ) -> Option<Vec<CssNode>> {
        let shape = self.shape(variant, theme, ctx)?;
        if let Variant::Static { root } = variant
            && (root == "before" || root == "after")
        {
            nodes.insert(0, CssNode::decl("content", "var(--tw-content)"));
        }
        Some(shape.wrap(nodes))
    }
}

fn functional_shape(root: &str, value: &VariantValue, theme: &Theme, ctx: FunctionContext) -> Option<VariantShape> {
    let raw = value.value();
    match root {
        "data" => Some(VariantShape::selector(format!("&[data-{raw}]"))),
        "aria" => Some(VariantShape::selector(match value {
            VariantValue::Named(name) => format!("&[aria-{name}=\"true\"]"),
            VariantValue::Arbitrary(attribute) => format!("&[aria-{attribute}]"),
        })),
        "nth" | "nth-last" | "nth-of-type" | "nth-last-of-type" => {
            if let VariantValue::Named(name) = value
                && name.parse::<u32>().is_err()
            {
                return None;
            }
            let pseudo = match root {
                "nth" => "nth-child",
                "nth-last" => "nth-last-child",
                other => other,
            };
            Some(VariantShape::selector(format!("&:{pseudo}({raw})")))
        }
        "supports" => {
            let query = raw.trim();
            let params = if query.starts_with('(') || query.starts_with("not ") {
                query.to_string()
            } else if query.contains(':') {
                format!("({query})")
            } else {
                format!("({query}: var(--tw))")
            };
            Some(VariantShape::AtRule {
                name: "supports".to_string(),
                params,
            })
        }
        "min" | "max" => {
            let width = match value {
                VariantValue::Named(name) => theme.value(&format!("--breakpoint-{name}"))?.to_string(),
                VariantValue::Arbitrary(width) => substitute_functions(
                    width,
                    theme,
                    FunctionContext {
                        in_at_rule: true,
                        ..ctx
                    },
                )?,
            };
            let operator = if root == "min" { ">=" } else { "<" };
            Some(VariantShape::media(format!("(width {operator} {width})")))
        }
        "in" => match value {
            VariantValue::Arbitrary(selector) if selector.contains('&') => {
                Some(VariantShape::selector(selector.clone()))
            }
            VariantValue::Arbitrary(selector) => {
                Some(VariantShape::selector(format!(":where({}) &", selector.trim())))
            }
            VariantValue::Named(_) => None,
        },
        _ => None,
    }
}

fn arbitrary_shape(selector: &str, relative: bool, theme: &Theme, ctx: FunctionContext) -> Option<VariantShape> {
    let selector = selector.trim();
    if let Some(at_rule) = selector.strip_prefix('@') {
        let end = at_rule
            .find(|c: char| c == ' ' || c == '(')
            .unwrap_or(at_rule.len());
        let name = &at_rule[..end];
        if name.is_empty() {
            return None;
        }
        let params = substitute_functions(
            at_rule[end..].trim(),
            theme,
            FunctionContext {
                in_at_rule: true,
                ..ctx
            },
        )?;
        return Some(VariantShape::AtRule {
            name: name.to_string(),
            params,
        });
    }
    if relative {
        return Some(VariantShape::selector(format!("& {selector}")));
    }
    if selector.contains('&') {
        return Some(VariantShape::selector(selector));
    }
    Some(VariantShape::selector(format!("&:is({selector})")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (VariantRegistry, Theme) {
        let theme = Theme::with_defaults();
        (VariantRegistry::builtin(&theme), theme)
    }

    fn shape(variant: Variant) -> Option<VariantShape> {
        let (registry, theme) = registry();
        registry.shape(&variant, &theme, FunctionContext::default())
    }

    #[test]
    fn test_static_shapes() {
        assert_eq!(
            shape(Variant::static_variant("hover")),
            Some(VariantShape::selector("&:hover"))
        );
        assert_eq!(
            shape(Variant::static_variant("md")),
            Some(VariantShape::media("(width >= 48rem)"))
        );
        assert_eq!(shape(Variant::static_variant("nope")), None);
    }

    #[test]
    fn test_functional_shapes() {
        assert_eq!(
            shape(Variant::functional("data", VariantValue::Named("open".into()))),
            Some(VariantShape::selector("&[data-open]"))
        );
        assert_eq!(
            shape(Variant::functional("aria", VariantValue::Named("checked".into()))),
            Some(VariantShape::selector("&[aria-checked=\"true\"]"))
        );
        assert_eq!(
            shape(Variant::functional("nth", VariantValue::Named("2".into()))),
            Some(VariantShape::selector("&:nth-child(2)"))
        );
        assert_eq!(
            shape(Variant::functional("nth", VariantValue::Named("odd".into()))),
            None
        );
        assert_eq!(
            shape(Variant::functional("max", VariantValue::Named("md".into()))),
            Some(VariantShape::media("(width < 48rem)"))
        );
        assert_eq!(
            shape(Variant::functional("in", VariantValue::Arbitrary("p".into()))),
            Some(VariantShape::selector(":where(p) &"))
        );
        assert_eq!(
            shape(Variant::functional(
                "supports",
                VariantValue::Arbitrary("display:grid".into())
            )),
            Some(VariantShape::AtRule {
                name: "supports".into(),
                params: "(display:grid)".into()
            })
        );
    }

    #[test]
    fn test_compound_shapes() {
        assert_eq!(
            shape(Variant::compound("group", Variant::static_variant("hover"))),
            Some(VariantShape::selector("&:is(:where(.group):hover *)"))
        );
        assert_eq!(
            shape(Variant::Compound {
                root: "peer".into(),
                variant: Box::new(Variant::static_variant("focus")),
                modifier: Some(Modifier::Named("name".into())),
            }),
            Some(VariantShape::selector(r"&:is(:where(.peer\/name):focus ~ *)"))
        );
        assert_eq!(
            shape(Variant::compound("not", Variant::static_variant("hover"))),
            Some(VariantShape::selector("&:not(:hover)"))
        );
        assert_eq!(
            shape(Variant::compound("not", Variant::static_variant("md"))),
            Some(VariantShape::media("not (width >= 48rem)"))
        );
        assert_eq!(
            shape(Variant::compound("has", Variant::static_variant("checked"))),
            Some(VariantShape::selector("&:has(*:checked)"))
        );
        assert_eq!(
            shape(Variant::compound("has", Variant::arbitrary("p"))),
            Some(VariantShape::selector("&:has(p)"))
        );
        assert_eq!(shape(Variant::compound("not", Variant::static_variant("*"))), None);
    }

    #[test]
    fn test_arbitrary_shapes() {
        assert_eq!(
            shape(Variant::arbitrary("&:hover")),
            Some(VariantShape::selector("&:hover"))
        );
        assert_eq!(
            shape(Variant::arbitrary(".dark &")),
            Some(VariantShape::selector(".dark &"))
        );
        assert_eq!(
            shape(Variant::arbitrary(":focus")),
            Some(VariantShape::selector("&:is(:focus)"))
        );
        assert_eq!(
            shape(Variant::arbitrary("@media print")),
            Some(VariantShape::media("print"))
        );
        assert_eq!(
            shape(Variant::arbitrary("@media(width>=theme(screens.md))")),
            Some(VariantShape::media("(width>=48rem)"))
        );
        assert_eq!(
            shape(Variant::Arbitrary {
                selector: "> img".into(),
                relative: true
            }),
            Some(VariantShape::selector("& > img"))
        );
    }

    #[test]
    fn test_apply_before_adds_content() {
        let (registry, theme) = registry();
        let nodes = registry
            .apply(
                &Variant::static_variant("before"),
                vec![CssNode::decl("color", "red")],
                &theme,
                FunctionContext::default(),
            )
            .unwrap();
        assert_eq!(
            nodes,
            vec![CssNode::rule(
                "&::before",
                vec![
                    CssNode::decl("content", "var(--tw-content)"),
                    CssNode::decl("color", "red"),
                ]
            )]
        );
    }

    #[test]
    fn test_list_contains_compounds() {
        let (registry, _) = registry();
        let list = registry.list();
        assert!(list.contains(&"hover".to_string()));
        assert!(list.contains(&"group-hover".to_string()));
        assert!(list.contains(&"min-md".to_string()));
        assert!(list.contains(&"not-md".to_string()));
    }
}

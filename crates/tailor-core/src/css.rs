//! Minimal CSS AST
//!
//! Utilities compile to declarations, variants wrap them in nested rules and
//! at-rules. [`flatten`] resolves the nesting into plain rules so the output
//! can be serialized and compared.

use crate::walk::WalkNode;

/// A CSS node produced by compiling a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssNode {
    Rule {
        selector: String,
        nodes: Vec<CssNode>,
    },
    AtRule {
        name: String,
        params: String,
        nodes: Vec<CssNode>,
    },
    Declaration {
        property: String,
        value: String,
        important: bool,
    },
    Comment(String),
}

impl CssNode {
    pub fn rule(selector: impl Into<String>, nodes: Vec<CssNode>) -> Self {
        CssNode::Rule {
            selector: selector.into(),
            nodes,
        }
    }

    pub fn at_rule(name: impl Into<String>, params: impl Into<String>, nodes: Vec<CssNode>) -> Self {
        CssNode::AtRule {
            name: name.into(),
            params: params.into(),
            nodes,
        }
    }

    pub fn decl(property: impl Into<String>, value: impl Into<String>) -> Self {
        CssNode::Declaration {
            property: property.into(),
            value: value.into(),
            important: false,
        }
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self, CssNode::Declaration { .. })
    }
}

impl WalkNode for CssNode {
    fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            CssNode::Rule { nodes, .. } | CssNode::AtRule { nodes, .. } => Some(nodes),
            _ => None,
        }
    }
}

/// Serialize nodes with two-space indentation
pub fn to_css(nodes: &[CssNode]) -> String {
    let mut out = String::new();
    write_nodes(nodes, 0, &mut out);
    out
}

fn write_nodes(nodes: &[CssNode], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            CssNode::Rule { selector, nodes } => {
                out.push_str(&format!("{indent}{selector} {{\n"));
                write_nodes(nodes, depth + 1, out);
                out.push_str(&format!("{indent}}}\n"));
            }
            CssNode::AtRule {
                name,
                params,
                nodes,
            } => {
                let head = if params.is_empty() {
                    format!("@{name}")
                } else {
                    format!("@{name} {params}")
                };
                if nodes.is_empty() {
                    out.push_str(&format!("{indent}{head};\n"));
                } else {
                    out.push_str(&format!("{indent}{head} {{\n"));
                    write_nodes(nodes, depth + 1, out);
                    out.push_str(&format!("{indent}}}\n"));
                }
            }
            CssNode::Declaration {
                property,
                value,
                important,
            } => {
                let important = if *important { " !important" } else { "" };
                out.push_str(&format!("{indent}{property}: {value}{important};\n"));
            }
            CssNode::Comment(text) => out.push_str(&format!("{indent}/*{text}*/\n")),
        }
    }
}

/// Resolve a nested selector against its parent
///
/// `&` is replaced by the parent selector; a selector without `&` is treated
/// as a descendant of the parent.
pub fn resolve_selector(parent: Option<&str>, selector: &str) -> String {
    let Some(parent) = parent else {
        return selector.to_string();
    };
    if selector.contains('&') {
        selector.replace('&', parent)
    } else {
        format!("{parent} {selector}")
    }
}

/// Flatten nested rules into `at-rule* > rule > declaration*` blocks
///
/// At-rules nested inside rules are hoisted above the rule. Declarations keep
/// their source order inside each block, and blocks keep the order in which
/// their first declaration was reached.
pub fn flatten(nodes: &[CssNode]) -> Vec<CssNode> {
    let mut out = Vec::new();
    flatten_into(nodes, None, &[], &mut out);
    out
}

fn flatten_into(
    nodes: &[CssNode],
    selector: Option<&str>,
    at_rules: &[(String, String)],
    out: &mut Vec<CssNode>,
) {
    let mut declarations = Vec::new();
    for node in nodes {
        match node {
            CssNode::Declaration { .. } => declarations.push(node.clone()),
            CssNode::Comment(_) => {}
            _ => {
                emit_block(selector, at_rules, std::mem::take(&mut declarations), out);
                match node {
                    CssNode::Rule {
                        selector: child,
                        nodes,
                    } => {
                        let resolved = resolve_selector(selector, child);
                        flatten_into(nodes, Some(&resolved), at_rules, out);
                    }
                    CssNode::AtRule {
                        name,
                        params,
                        nodes,
                    } if !nodes.is_empty() => {
                        let mut chain = at_rules.to_vec();
                        chain.push((name.clone(), params.clone()));
                        flatten_into(nodes, selector, &chain, out);
                    }
                    other => out.push(other.clone()),
                }
            }
        }
    }
    emit_block(selector, at_rules, declarations, out);
}

fn emit_block(
    selector: Option<&str>,
    at_rules: &[(String, String)],
    declarations: Vec<CssNode>,
    out: &mut Vec<CssNode>,
) {
    if declarations.is_empty() {
        return;
    }
    let mut block = match selector {
        Some(selector) => vec![CssNode::rule(selector, declarations)],
        None => declarations,
    };
    for (name, params) in at_rules.iter().rev() {
        block = vec![CssNode::at_rule(name.clone(), params.clone(), block)];
    }
    out.extend(block);
}

/// Escape a class name for use in a selector
pub fn escape_class_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    for (idx, ch) in name.chars().enumerate() {
        match ch {
            'a'..='z' | 'A'..='Z' | '_' => out.push(ch),
            '-' => out.push(ch),
            '0'..='9' if idx == 0 => out.push_str(&format!("\\3{ch} ")),
            '0'..='9' => out.push(ch),
            c if !c.is_ascii() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_css() {
        let nodes = vec![CssNode::rule(
            ".x",
            vec![CssNode::decl("color", "red"), CssNode::decl("margin", "0")],
        )];
        assert_eq!(to_css(&nodes), ".x {\n  color: red;\n  margin: 0;\n}\n");
    }

    #[test]
    fn test_important_declaration() {
        let nodes = vec![CssNode::Declaration {
            property: "color".into(),
            value: "red".into(),
            important: true,
        }];
        assert_eq!(to_css(&nodes), "color: red !important;\n");
    }

    #[test]
    fn test_resolve_selector() {
        assert_eq!(resolve_selector(None, ".x"), ".x");
        assert_eq!(resolve_selector(Some(".x"), "&:hover"), ".x:hover");
        assert_eq!(resolve_selector(Some(".x"), "p &"), "p .x");
        assert_eq!(resolve_selector(Some(".x"), "> *"), ".x > *");
    }

    #[test]
    fn test_flatten_nested_rules_and_at_rules() {
        let nodes = vec![CssNode::rule(
            ".x",
            vec![CssNode::rule(
                "&:hover",
                vec![CssNode::at_rule(
                    "media",
                    "(width >= 40rem)",
                    vec![CssNode::decl("color", "red")],
                )],
            )],
        )];
        insta::assert_snapshot!(to_css(&flatten(&nodes)), @r"
        @media (width >= 40rem) {
          .x:hover {
            color: red;
          }
        }
        ");
    }

    #[test]
    fn test_flatten_keeps_sibling_order() {
        let nodes = vec![CssNode::rule(
            ".x",
            vec![
                CssNode::decl("color", "red"),
                CssNode::rule("&::before", vec![CssNode::decl("content", "''")]),
                CssNode::decl("margin", "0"),
            ],
        )];
        let flat = flatten(&nodes);
        assert_eq!(flat.len(), 3);
        assert_eq!(
            to_css(&flat),
            ".x {\n  color: red;\n}\n.x::before {\n  content: '';\n}\n.x {\n  margin: 0;\n}\n"
        );
    }

    #[test]
    fn test_escape_class_name() {
        assert_eq!(escape_class_name("bg-red-500"), "bg-red-500");
        assert_eq!(escape_class_name("hover:flex"), r"hover\:flex");
        assert_eq!(escape_class_name("w-1/2"), r"w-1\/2");
        assert_eq!(escape_class_name("[color:red]"), r"\[color\:red\]");
        assert_eq!(escape_class_name("2xl"), r"\32 xl");
    }
}

//! Tokenizer for CSS value fragments
//!
//! Produces a lossless word/function/separator tree for the inside of an
//! arbitrary value, a utility argument or a `calc()`/`theme()` call.
//! Parsing is total: malformed input degrades to literal words.

use crate::walk::{WalkAction, WalkNode, walk};

/// A node in a parsed value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueNode {
    Word(String),
    Function { name: String, nodes: Vec<ValueNode> },
    Separator(String),
}

impl ValueNode {
    pub fn word(value: impl Into<String>) -> Self {
        ValueNode::Word(value.into())
    }

    pub fn separator(value: impl Into<String>) -> Self {
        ValueNode::Separator(value.into())
    }

    pub fn function(name: impl Into<String>, nodes: Vec<ValueNode>) -> Self {
        ValueNode::Function {
            name: name.into(),
            nodes,
        }
    }

    /// Word or separator text, or the function name
    pub fn value(&self) -> &str {
        match self {
            ValueNode::Word(value) | ValueNode::Separator(value) => value,
            ValueNode::Function { name, .. } => name,
        }
    }

    pub fn is_word(&self, value: &str) -> bool {
        matches!(self, ValueNode::Word(word) if word == value)
    }

    pub fn is_function(&self, function: &str) -> bool {
        matches!(self, ValueNode::Function { name, .. } if name == function)
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, ValueNode::Separator(_))
    }
}

impl WalkNode for ValueNode {
    fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            ValueNode::Function { nodes, .. } => Some(nodes),
            _ => None,
        }
    }
}

// Nested functions are torn down from a flat list.
impl Drop for ValueNode {
    fn drop(&mut self) {
        let Some(children) = self.children_mut() else {
            return;
        };
        let mut stack = std::mem::take(children);
        while let Some(mut node) = stack.pop() {
            if let Some(children) = node.children_mut() {
                stack.append(children);
            }
        }
    }
}

fn is_separator_char(ch: char) -> bool {
    matches!(ch, ':' | ',' | '=' | '>' | '<' | '/' | ' ' | '\t' | '\n')
}

/// Parse a value fragment
pub fn parse(input: &str) -> Vec<ValueNode> {
    let input = input.replace("\r\n", "\n");
    let chars: Vec<char> = input.chars().collect();

    // Open functions: (name, children). The root list lives in `ast`.
    let mut ast: Vec<ValueNode> = Vec::new();
    let mut stack: Vec<(String, Vec<ValueNode>)> = Vec::new();
    let mut buffer = String::new();

    fn push(ast: &mut Vec<ValueNode>, stack: &mut [(String, Vec<ValueNode>)], node: ValueNode) {
        match stack.last_mut() {
            Some((_, nodes)) => nodes.push(node),
            None => ast.push(node),
        }
    }

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\\' => {
                buffer.push(ch);
                if let Some(&next) = chars.get(i + 1) {
                    buffer.push(next);
                    i += 1;
                }
            }
            c if is_separator_char(c) => {
                if !buffer.is_empty() {
                    push(&mut ast, &mut stack, ValueNode::Word(std::mem::take(&mut buffer)));
                }
                let start = i;
                let mut end = i + 1;
                while end < chars.len() && is_separator_char(chars[end]) {
                    end += 1;
                }
                let text: String = chars[start..end].iter().collect();
                push(&mut ast, &mut stack, ValueNode::Separator(text));
                i = end - 1;
            }
            '"' | '\'' => {
                let start = i;
                let mut j = i + 1;
                while j < chars.len() {
                    if chars[j] == '\\' {
                        j += 1;
                    } else if chars[j] == ch {
                        i = j;
                        break;
                    }
                    j += 1;
                }
                buffer.extend(&chars[start..=i]);
            }
            '(' => {
                stack.push((std::mem::take(&mut buffer), Vec::new()));
            }
            ')' => match stack.pop() {
                Some((name, mut nodes)) => {
                    if !buffer.is_empty() {
                        nodes.push(ValueNode::Word(std::mem::take(&mut buffer)));
                    }
                    push(&mut ast, &mut stack, ValueNode::Function { name, nodes });
                }
                // Unbalanced: keep the character as part of a word.
                None => buffer.push(ch),
            },
            _ => buffer.push(ch),
        }
        i += 1;
    }

    // Unterminated functions are closed implicitly.
    while let Some((name, mut nodes)) = stack.pop() {
        if !buffer.is_empty() {
            nodes.push(ValueNode::Word(std::mem::take(&mut buffer)));
        }
        push(&mut ast, &mut stack, ValueNode::Function { name, nodes });
    }

    if !buffer.is_empty() {
        ast.push(ValueNode::Word(buffer));
    }

    ast
}

/// Serialize nodes back to text
pub fn to_css(nodes: &[ValueNode]) -> String {
    enum Piece<'a> {
        Node(&'a ValueNode),
        Close,
    }

    let mut out = String::new();
    let mut stack: Vec<Piece> = nodes.iter().rev().map(Piece::Node).collect();
    while let Some(piece) = stack.pop() {
        match piece {
            Piece::Close => out.push(')'),
            Piece::Node(ValueNode::Word(value) | ValueNode::Separator(value)) => out.push_str(value),
            Piece::Node(ValueNode::Function { name, nodes }) => {
                out.push_str(name);
                out.push('(');
                stack.push(Piece::Close);
                stack.extend(nodes.iter().rev().map(Piece::Node));
            }
        }
    }
    out
}

/// Normalize whitespace the way arbitrary values are printed
///
/// Spaces around math operators, `,` and `/` separators and at the edges of
/// every node list are dropped; other whitespace runs collapse to one space.
pub fn normalize_whitespace(input: &str) -> String {
    let mut ast = parse(input);
    normalize_list(&mut ast);
    walk(&mut ast, |node: &mut ValueNode, _| {
        if let ValueNode::Function { nodes, .. } = node {
            normalize_list(nodes);
        }
        WalkAction::Continue
    });
    to_css(&ast)
}

/// Normalize one node list, leaving nested functions alone
fn normalize_list(nodes: &mut Vec<ValueNode>) {
    let mut drop = vec![false; nodes.len()];
    for idx in 0..nodes.len() {
        let is_operator = matches!(&nodes[idx], ValueNode::Word(word) if matches!(word.as_str(), "+" | "-" | "*" | "/"));
        if is_operator {
            let spaced = |node: Option<&ValueNode>| matches!(node, Some(ValueNode::Separator(sep)) if sep == " ");
            if idx > 0 && spaced(nodes.get(idx - 1)) && spaced(nodes.get(idx + 1)) {
                drop[idx - 1] = true;
                drop[idx + 1] = true;
            }
            continue;
        }
        if let ValueNode::Separator(sep) = &mut nodes[idx] {
            let trimmed = sep.trim();
            if trimmed == "/" || trimmed == "," {
                *sep = trimmed.to_string();
            } else if trimmed.is_empty() {
                if idx == 0 || idx + 1 == drop.len() {
                    drop[idx] = true;
                } else {
                    *sep = " ".to_string();
                }
            }
        }
    }
    let mut idx = 0;
    nodes.retain(|_| {
        let keep = !drop[idx];
        idx += 1;
        keep
    });
}

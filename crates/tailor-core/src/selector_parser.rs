//! Tokenizer for CSS selector fragments
//!
//! Used for arbitrary variants (`[&:hover]`, `[&[data-open]]`, `[p_&]`).
//! Every simple selector becomes its own node so later passes can match on
//! selector shapes. Attribute selectors and strings are opaque.

use crate::walk::WalkNode;

/// A node in a parsed selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorNode {
    Selector(String),
    Combinator(String),
    Function {
        name: String,
        nodes: Vec<SelectorNode>,
    },
    Separator(String),
    /// Opaque argument of a pseudo-function whose grammar is not a selector list
    Value(String),
}

impl SelectorNode {
    pub fn selector(value: impl Into<String>) -> Self {
        SelectorNode::Selector(value.into())
    }

    pub fn combinator(value: impl Into<String>) -> Self {
        SelectorNode::Combinator(value.into())
    }

    pub fn function(name: impl Into<String>, nodes: Vec<SelectorNode>) -> Self {
        SelectorNode::Function {
            name: name.into(),
            nodes,
        }
    }

    pub fn is_selector(&self, value: &str) -> bool {
        matches!(self, SelectorNode::Selector(selector) if selector == value)
    }

    pub fn is_combinator(&self, value: &str) -> bool {
        matches!(self, SelectorNode::Combinator(combinator) if combinator.trim() == value.trim())
    }
}

impl WalkNode for SelectorNode {
    fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            SelectorNode::Function { nodes, .. } => Some(nodes),
            _ => None,
        }
    }
}

impl Drop for SelectorNode {
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

fn is_combinator_char(ch: char) -> bool {
    matches!(ch, ',' | '>' | '\n' | ' ' | '+' | '\t' | '~')
}

/// Pseudo-functions whose arguments are selector lists
fn takes_selector_list(name: &str) -> bool {
    matches!(name, ":not" | ":where" | ":has" | ":is")
}

/// Parse a selector fragment
pub fn parse(input: &str) -> Vec<SelectorNode> {
    let input = input.replace("\r\n", "\n");
    let chars: Vec<char> = input.chars().collect();

    let mut ast: Vec<SelectorNode> = Vec::new();
    let mut stack: Vec<(String, Vec<SelectorNode>)> = Vec::new();
    let mut buffer = String::new();

    fn push(
        ast: &mut Vec<SelectorNode>,
        stack: &mut [(String, Vec<SelectorNode>)],
        node: SelectorNode,
    ) {
        match stack.last_mut() {
            Some((_, nodes)) => nodes.push(node),
            None => ast.push(node),
        }
    }

    fn flush(
        ast: &mut Vec<SelectorNode>,
        stack: &mut [(String, Vec<SelectorNode>)],
        buffer: &mut String,
    ) {
        if !buffer.is_empty() {
            push(ast, stack, SelectorNode::Selector(std::mem::take(buffer)));
        }
    }

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        match ch {
            c if is_combinator_char(c) => {
                flush(&mut ast, &mut stack, &mut buffer);
                let start = i;
                let mut end = i + 1;
                while end < chars.len() && is_combinator_char(chars[end]) {
                    end += 1;
                }
                let text: String = chars[start..end].iter().collect();
                let node = if text.trim() == "," {
                    SelectorNode::Separator(text)
                } else {
                    SelectorNode::Combinator(text)
                };
                push(&mut ast, &mut stack, node);
                i = end - 1;
            }
            '(' => {
                let name = std::mem::take(&mut buffer);
                if takes_selector_list(&name) {
                    stack.push((name, Vec::new()));
                } else {
                    // Capture the argument verbatim, tracking nested parens.
                    let start = i + 1;
                    let mut depth = 0usize;
                    let mut end = chars.len();
                    let mut j = start;
                    while j < chars.len() {
                        match chars[j] {
                            '(' => depth += 1,
                            ')' if depth == 0 => {
                                end = j;
                                break;
                            }
                            ')' => depth -= 1,
                            _ => {}
                        }
                        j += 1;
                    }
                    let value: String = chars[start..end].iter().collect();
                    push(
                        &mut ast,
                        &mut stack,
                        SelectorNode::Function {
                            name,
                            nodes: vec![SelectorNode::Value(value)],
                        },
                    );
                    i = end;
                }
            }
            ')' => match stack.pop() {
                Some((name, mut nodes)) => {
                    if !buffer.is_empty() {
                        nodes.push(SelectorNode::Selector(std::mem::take(&mut buffer)));
                    }
                    push(&mut ast, &mut stack, SelectorNode::Function { name, nodes });
                }
                None => buffer.push(ch),
            },
            '.' | '#' => {
                flush(&mut ast, &mut stack, &mut buffer);
                buffer.push(ch);
            }
            ':' => {
                // `::before` stays a single pseudo-element token.
                if buffer != ":" {
                    flush(&mut ast, &mut stack, &mut buffer);
                }
                buffer.push(ch);
            }
            '[' => {
                flush(&mut ast, &mut stack, &mut buffer);
                let start = i;
                let mut depth = 0usize;
                let mut quote: Option<char> = None;
                let mut j = i + 1;
                while j < chars.len() {
                    if let Some(q) = quote {
                        if chars[j] == '\\' {
                            j += 1;
                        } else if chars[j] == q {
                            quote = None;
                        }
                        j += 1;
                        continue;
                    }
                    match chars[j] {
                        '"' | '\'' => quote = Some(chars[j]),
                        '[' => depth += 1,
                        ']' if depth == 0 => {
                            i = j;
                            break;
                        }
                        ']' => depth -= 1,
                        _ => {}
                    }
                    j += 1;
                }
                if j >= chars.len() {
                    i = chars.len() - 1;
                }
                buffer.extend(&chars[start..=i]);
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
            '&' | '*' => {
                flush(&mut ast, &mut stack, &mut buffer);
                push(&mut ast, &mut stack, SelectorNode::Selector(ch.to_string()));
            }
            '\\' => {
                buffer.push(ch);
                if let Some(&next) = chars.get(i + 1) {
                    buffer.push(next);
                    i += 1;
                }
            }
            _ => buffer.push(ch),
        }
        i += 1;
    }

    while let Some((name, mut nodes)) = stack.pop() {
        if !buffer.is_empty() {
            nodes.push(SelectorNode::Selector(std::mem::take(&mut buffer)));
        }
        push(&mut ast, &mut stack, SelectorNode::Function { name, nodes });
    }
    if !buffer.is_empty() {
        ast.push(SelectorNode::Selector(buffer));
    }

    ast
}

/// Serialize nodes back to text
pub fn to_css(nodes: &[SelectorNode]) -> String {
    enum Piece<'a> {
        Node(&'a SelectorNode),
        Close,
    }

    let mut out = String::new();
    let mut stack: Vec<Piece> = nodes.iter().rev().map(Piece::Node).collect();
    while let Some(piece) = stack.pop() {
        match piece {
            Piece::Close => out.push(')'),
            Piece::Node(
                SelectorNode::Selector(value)
                | SelectorNode::Combinator(value)
                | SelectorNode::Separator(value)
                | SelectorNode::Value(value),
            ) => out.push_str(value),
            Piece::Node(SelectorNode::Function { name, nodes }) => {
                out.push_str(name);
                out.push('(');
                stack.push(Piece::Close);
                stack.extend(nodes.iter().rev().map(Piece::Node));
            }
        }
    }
    out
}

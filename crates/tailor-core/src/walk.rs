//! Generic tree walker
//!
//! Walks any tree whose nodes expose a mutable child list. Traversal is
//! iterative: the walker keeps a stack of `(list, cursor)` frames, one per
//! depth. Descending detaches the child list from its parent node; it is put
//! back before the parent's exit hook runs and when the walk stops, so
//! arbitrarily deep trees never grow the call stack.
//!
//! Visitors decide what happens next through [`WalkAction`] (enter hook) and
//! [`ExitAction`] (exit hook):
//!
//! - `Continue` descends into children (enter) or moves on (exit)
//! - `Skip` does not descend into the current node's children
//! - `Stop` aborts the whole walk
//! - `Replace(nodes)` splices `nodes` in place of the current node; on enter
//!   the walk resumes at the first substituted node, on exit the substituted
//!   nodes are not visited
//! - `ReplaceSkip(nodes)` splices without visiting the substitution
//! - `ReplaceStop(nodes)` splices and aborts
//!
//! Replacing with an empty list removes the node.

/// A node that can be walked by [`walk`], [`walk_exit`] and [`walk_with`]
pub trait WalkNode: Sized {
    /// Mutable access to the child list, `None` for leaf node kinds
    fn children_mut(&mut self) -> Option<&mut Vec<Self>>;
}

/// Action returned from an enter hook
#[derive(Debug, Clone, PartialEq)]
pub enum WalkAction<T> {
    Continue,
    Skip,
    Stop,
    Replace(Vec<T>),
    ReplaceSkip(Vec<T>),
    ReplaceStop(Vec<T>),
}

/// Action returned from an exit hook
#[derive(Debug, Clone, PartialEq)]
pub enum ExitAction<T> {
    Continue,
    Stop,
    Replace(Vec<T>),
    ReplaceStop(Vec<T>),
}

/// Position of the visited node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkContext {
    /// Number of ancestors of the visited node
    pub depth: usize,
    /// Index of the visited node in its parent's child list
    pub index: usize,
}

/// Enter and exit hooks
pub trait Visitor<T> {
    fn enter(&mut self, _node: &mut T, _ctx: &WalkContext) -> WalkAction<T> {
        WalkAction::Continue
    }

    fn exit(&mut self, _node: &mut T, _ctx: &WalkContext) -> ExitAction<T> {
        ExitAction::Continue
    }
}

struct EnterOnly<F>(F);

impl<T, F> Visitor<T> for EnterOnly<F>
where
    F: FnMut(&mut T, &WalkContext) -> WalkAction<T>,
{
    fn enter(&mut self, node: &mut T, ctx: &WalkContext) -> WalkAction<T> {
        (self.0)(node, ctx)
    }
}

struct ExitOnly<F>(F);

impl<T, F> Visitor<T> for ExitOnly<F>
where
    F: FnMut(&mut T, &WalkContext) -> ExitAction<T>,
{
    fn exit(&mut self, node: &mut T, ctx: &WalkContext) -> ExitAction<T> {
        (self.0)(node, ctx)
    }
}

/// Pre-order walk with an enter hook only
pub fn walk<T, F>(nodes: &mut Vec<T>, enter: F)
where
    T: WalkNode,
    F: FnMut(&mut T, &WalkContext) -> WalkAction<T>,
{
    walk_with(nodes, &mut EnterOnly(enter));
}

/// Post-order walk with an exit hook only
pub fn walk_exit<T, F>(nodes: &mut Vec<T>, exit: F)
where
    T: WalkNode,
    F: FnMut(&mut T, &WalkContext) -> ExitAction<T>,
{
    walk_with(nodes, &mut ExitOnly(exit));
}

enum Flow {
    Advance(usize),
    Stop,
}

/// A list being walked and the position inside it
///
/// Every frame but the last also names, through its cursor, the node whose
/// children the next frame holds.
struct Frame<T> {
    list: Vec<T>,
    cursor: usize,
}

/// Walk with both enter and exit hooks
pub fn walk_with<T, V>(nodes: &mut Vec<T>, visitor: &mut V)
where
    T: WalkNode,
    V: Visitor<T> + ?Sized,
{
    let mut frames = vec![Frame {
        list: std::mem::take(nodes),
        cursor: 0,
    }];

    loop {
        let depth = frames.len() - 1;
        let Some(frame) = frames.last_mut() else {
            break;
        };

        if frame.cursor >= frame.list.len() {
            if depth == 0 {
                break;
            }
            reattach(&mut frames);
            let Some(parent) = frames.last_mut() else {
                break;
            };
            match run_exit(visitor, &mut parent.list, parent.cursor, depth - 1) {
                Flow::Advance(count) => parent.cursor += count,
                Flow::Stop => break,
            }
            continue;
        }

        let cursor = frame.cursor;
        let ctx = WalkContext {
            depth,
            index: cursor,
        };
        match visitor.enter(&mut frame.list[cursor], &ctx) {
            WalkAction::Continue => match frame.list[cursor].children_mut() {
                Some(children) => {
                    let list = std::mem::take(children);
                    frames.push(Frame { list, cursor: 0 });
                }
                None => match run_exit(visitor, &mut frame.list, cursor, depth) {
                    Flow::Advance(count) => frame.cursor += count,
                    Flow::Stop => break,
                },
            },
            WalkAction::Skip => match run_exit(visitor, &mut frame.list, cursor, depth) {
                Flow::Advance(count) => frame.cursor += count,
                Flow::Stop => break,
            },
            WalkAction::Stop => break,
            WalkAction::Replace(replacement) => {
                // Resume at the first substituted node.
                frame.list.splice(cursor..=cursor, replacement);
            }
            WalkAction::ReplaceSkip(replacement) => {
                let count = replacement.len();
                frame.list.splice(cursor..=cursor, replacement);
                frame.cursor += count;
            }
            WalkAction::ReplaceStop(replacement) => {
                frame.list.splice(cursor..=cursor, replacement);
                break;
            }
        }
    }

    while frames.len() > 1 {
        reattach(&mut frames);
    }
    if let Some(root) = frames.pop() {
        *nodes = root.list;
    }
}

/// Pop the innermost frame and give its list back to the parent node
fn reattach<T: WalkNode>(frames: &mut Vec<Frame<T>>) {
    let Some(done) = frames.pop() else {
        return;
    };
    if let Some(parent) = frames.last_mut()
        && let Some(children) = parent
            .list
            .get_mut(parent.cursor)
            .and_then(T::children_mut)
    {
        *children = done.list;
    }
}

fn run_exit<T, V>(visitor: &mut V, list: &mut Vec<T>, index: usize, depth: usize) -> Flow
where
    V: Visitor<T> + ?Sized,
{
    let ctx = WalkContext { depth, index };
    match visitor.exit(&mut list[index], &ctx) {
        ExitAction::Continue => Flow::Advance(1),
        ExitAction::Stop => Flow::Stop,
        ExitAction::Replace(replacement) => {
            // The substitution is not visited, so its exit hooks never run.
            let count = replacement.len();
            list.splice(index..=index, replacement);
            Flow::Advance(count)
        }
        ExitAction::ReplaceStop(replacement) => {
            list.splice(index..=index, replacement);
            Flow::Stop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Node {
        name: String,
        nodes: Option<Vec<Node>>,
    }

    impl WalkNode for Node {
        fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
            self.nodes.as_mut()
        }
    }

    fn leaf(name: &str) -> Node {
        Node {
            name: name.to_string(),
            nodes: None,
        }
    }

    fn parent(name: &str, nodes: Vec<Node>) -> Node {
        Node {
            name: name.to_string(),
            nodes: Some(nodes),
        }
    }

    fn names(nodes: &[Node]) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack: Vec<&Node> = nodes.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node.name.clone());
            if let Some(children) = &node.nodes {
                stack.extend(children.iter().rev());
            }
        }
        out
    }

    fn sample() -> Vec<Node> {
        vec![
            parent("a", vec![leaf("a1"), leaf("a2")]),
            leaf("b"),
            parent("c", vec![parent("c1", vec![leaf("c1x")])]),
        ]
    }

    #[test]
    fn test_pre_order() {
        let mut nodes = sample();
        let mut seen = Vec::new();
        walk(&mut nodes, |node: &mut Node, _| {
            seen.push(node.name.clone());
            WalkAction::Continue
        });
        assert_eq!(seen, vec!["a", "a1", "a2", "b", "c", "c1", "c1x"]);
    }

    #[test]
    fn test_post_order() {
        let mut nodes = sample();
        let mut seen = Vec::new();
        walk_exit(&mut nodes, |node: &mut Node, _| {
            seen.push(node.name.clone());
            ExitAction::Continue
        });
        assert_eq!(seen, vec!["a1", "a2", "a", "b", "c1x", "c1", "c"]);
    }

    #[test]
    fn test_context_depth() {
        let mut nodes = sample();
        let mut depths = Vec::new();
        walk(&mut nodes, |node: &mut Node, ctx| {
            depths.push((node.name.clone(), ctx.depth, ctx.index));
            WalkAction::Continue
        });
        assert!(depths.contains(&("c1x".to_string(), 2, 0)));
        assert!(depths.contains(&("a2".to_string(), 1, 1)));
    }

    #[test]
    fn test_skip_children() {
        let mut nodes = sample();
        let mut seen = Vec::new();
        walk(&mut nodes, |node: &mut Node, _| {
            seen.push(node.name.clone());
            if node.name == "a" {
                WalkAction::Skip
            } else {
                WalkAction::Continue
            }
        });
        assert_eq!(seen, vec!["a", "b", "c", "c1", "c1x"]);
    }

    #[test]
    fn test_stop() {
        let mut nodes = sample();
        let mut seen = Vec::new();
        walk(&mut nodes, |node: &mut Node, _| {
            seen.push(node.name.clone());
            if node.name == "a2" {
                WalkAction::Stop
            } else {
                WalkAction::Continue
            }
        });
        assert_eq!(seen, vec!["a", "a1", "a2"]);
        assert_eq!(names(&nodes), names(&sample()));
    }

    #[test]
    fn test_exit_sees_children() {
        let mut nodes = sample();
        let mut counts = Vec::new();
        walk_exit(&mut nodes, |node: &mut Node, _| {
            counts.push((node.name.clone(), node.nodes.as_ref().map_or(0, Vec::len)));
            ExitAction::Continue
        });
        assert!(counts.contains(&("a".to_string(), 2)));
        assert!(counts.contains(&("c".to_string(), 1)));
        assert_eq!(names(&nodes), names(&sample()));
    }

    #[test]
    fn test_replace_revisits_substitution() {
        let mut nodes = sample();
        let mut seen = Vec::new();
        walk(&mut nodes, |node: &mut Node, _| {
            seen.push(node.name.clone());
            if node.name == "b" {
                WalkAction::Replace(vec![leaf("b1"), parent("b2", vec![leaf("b2x")])])
            } else {
                WalkAction::Continue
            }
        });
        assert_eq!(
            seen,
            vec!["a", "a1", "a2", "b", "b1", "b2", "b2x", "c", "c1", "c1x"]
        );
        assert_eq!(
            names(&nodes),
            vec!["a", "a1", "a2", "b1", "b2", "b2x", "c", "c1", "c1x"]
        );
    }

    #[test]
    fn test_replace_with_empty_removes() {
        let mut nodes = sample();
        walk(&mut nodes, |node: &mut Node, _| {
            if node.name.starts_with('a') {
                WalkAction::Replace(vec![])
            } else {
                WalkAction::Continue
            }
        });
        assert_eq!(names(&nodes), vec!["b", "c", "c1", "c1x"]);
    }

    #[test]
    fn test_replace_skip_does_not_visit() {
        let mut nodes = sample();
        let mut seen = Vec::new();
        walk(&mut nodes, |node: &mut Node, _| {
            seen.push(node.name.clone());
            if node.name == "a1" {
                WalkAction::ReplaceSkip(vec![leaf("x"), leaf("y")])
            } else {
                WalkAction::Continue
            }
        });
        assert_eq!(seen, vec!["a", "a1", "a2", "b", "c", "c1", "c1x"]);
        assert_eq!(
            names(&nodes),
            vec!["a", "x", "y", "a2", "b", "c", "c1", "c1x"]
        );
    }

    #[test]
    fn test_replace_stop() {
        let mut nodes = sample();
        let mut seen = Vec::new();
        walk(&mut nodes, |node: &mut Node, _| {
            seen.push(node.name.clone());
            if node.name == "b" {
                WalkAction::ReplaceStop(vec![leaf("z")])
            } else {
                WalkAction::Continue
            }
        });
        assert_eq!(seen, vec!["a", "a1", "a2", "b"]);
        assert_eq!(names(&nodes), vec!["a", "a1", "a2", "z", "c", "c1", "c1x"]);
    }

    struct Recorder {
        events: Vec<String>,
    }

    impl Visitor<Node> for Recorder {
        fn enter(&mut self, node: &mut Node, _ctx: &WalkContext) -> WalkAction<Node> {
            self.events.push(format!("enter {}", node.name));
            WalkAction::Continue
        }

        fn exit(&mut self, node: &mut Node, _ctx: &WalkContext) -> ExitAction<Node> {
            self.events.push(format!("exit {}", node.name));
            if node.name == "c1" {
                // Replacing during exit must not re-run exit for the new node.
                return ExitAction::Replace(vec![parent("c1", vec![leaf("fresh")])]);
            }
            ExitAction::Continue
        }
    }

    #[test]
    fn test_exit_replace_not_retriggered() {
        let mut nodes = sample();
        let mut recorder = Recorder { events: Vec::new() };
        walk_with(&mut nodes, &mut recorder);
        let c1_exits = recorder
            .events
            .iter()
            .filter(|event| event.as_str() == "exit c1")
            .count();
        assert_eq!(c1_exits, 1);
        assert!(!recorder.events.iter().any(|event| event.contains("fresh")));
        assert_eq!(recorder.events.last().map(String::as_str), Some("exit c"));
        assert_eq!(names(&nodes), vec!["a", "a1", "a2", "b", "c", "c1", "fresh"]);
    }

    #[test]
    fn test_exit_stop() {
        let mut nodes = sample();
        let mut seen = Vec::new();
        walk_exit(&mut nodes, |node: &mut Node, _| {
            seen.push(node.name.clone());
            if node.name == "a" {
                ExitAction::Stop
            } else {
                ExitAction::Continue
            }
        });
        assert_eq!(seen, vec!["a1", "a2", "a"]);
        assert_eq!(names(&nodes), names(&sample()));
    }

    #[test]
    fn test_deep_tree_does_not_recurse() {
        let depth = 50_000;
        let mut tree = leaf("bottom");
        for i in 0..depth {
            tree = parent(&format!("n{i}"), vec![tree]);
        }
        let mut nodes = vec![tree];
        let mut count = 0;
        let mut max_depth = 0;
        walk(&mut nodes, |_: &mut Node, ctx| {
            count += 1;
            max_depth = max_depth.max(ctx.depth);
            WalkAction::Continue
        });
        assert_eq!(count, depth + 1);
        assert_eq!(max_depth, depth);

        // Tear the tree down iteratively so the drop glue does not recurse.
        let mut stack = nodes;
        while let Some(mut node) = stack.pop() {
            if let Some(children) = node.nodes.take() {
                stack.extend(children);
            }
        }
    }
}

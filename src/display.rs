use std::fmt::Write;

use crate::iter::InOrder;
use crate::node::Linked;
use crate::utils::arena::{Arena, NodeId};

/// Sideways rendering of a tree: right subtree above, left subtree below, one node per line.
/// Each line is indented by depth, with `+` on the node's own branch and `|` wherever the path
/// from the root changes direction. Nodes with children get a trailing `---|` connector.
pub(crate) fn render<N>(nodes: &Arena<N>, root: NodeId) -> String
where
    N: Linked,
    N::Key: std::fmt::Display,
{
    let width = InOrder::new(nodes, root, 0)
        .map(|key| key.to_string().chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    // Reverse in-order walk with an explicit stack; an unbalanced tree can be arbitrarily deep.
    let mut stack: Vec<(NodeId, String)> = Vec::new();
    let mut current = (root, String::new());
    loop {
        while !current.0.is_nil() {
            let right = nodes[current.0].right();
            let path = format!("{}R", current.1);
            stack.push(current);
            current = (right, path);
        }
        let Some((id, path)) = stack.pop() else {
            break;
        };
        render_line(&mut out, &nodes[id], &path, width);
        current = (nodes[id].left(), format!("{}L", path));
    }
    out
}

fn render_line<N>(out: &mut String, node: &N, path: &str, width: usize)
where
    N: Linked,
    N::Key: std::fmt::Display,
{
    let Some(key) = node.key() else {
        return;
    };
    let path = path.as_bytes();
    for i in 0..path.len() {
        out.extend(std::iter::repeat(' ').take(width + 6));
        let c = if i == path.len() - 1 {
            '+'
        } else if path[i] != path[i + 1] {
            '|'
        } else {
            ' '
        };
        out.push(c);
    }

    let key = key.to_string();
    match node.color_tag() {
        Some(tag) => {
            let _ = write!(out, "--- {}:{}", key, tag);
        }
        None => {
            let _ = write!(out, "-- {}", key);
        }
    }

    if !node.left().is_nil() || !node.right().is_nil() {
        out.push_str(if node.color_tag().is_some() { " ---" } else { " --" });
        out.extend(std::iter::repeat('-').take(width - key.chars().count()));
        out.push('|');
    }
    out.push('\n');
}

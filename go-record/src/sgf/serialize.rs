use super::types::*;

enum Step {
    Enter(RecordId, usize),
    Close,
}

/// Serialize a [`RecordTree`] to record text.
///
/// The root node is written inline after the document properties; every
/// deeper subtree, main continuation included, gets its own parentheses.
pub fn serialize(tree: &RecordTree) -> String {
    let mut buf = String::new();
    buf.push('(');
    if !tree.properties.is_empty() || tree.root().is_none() {
        write_node(&tree.properties, &mut buf);
    }

    let mut stack: Vec<Step> = tree.root().map(|r| Step::Enter(r, 0)).into_iter().collect();
    while let Some(step) = stack.pop() {
        match step {
            Step::Close => buf.push(')'),
            Step::Enter(id, depth) => {
                let node = tree.node(id);
                if depth > 0 {
                    buf.push('(');
                    stack.push(Step::Close);
                }
                write_node(&node.properties, &mut buf);
                for &child in node.children.iter().rev() {
                    stack.push(Step::Enter(child, depth + 1));
                }
            }
        }
    }

    buf.push(')');
    buf
}

fn write_node(properties: &Properties, buf: &mut String) {
    buf.push(';');
    for prop in properties.iter() {
        buf.push_str(&prop.key);
        buf.push('[');
        push_escaped(buf, &prop.value);
        buf.push(']');
    }
}

fn push_escaped(buf: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            ']' | '\\' => {
                buf.push('\\');
                buf.push(ch);
            }
            _ => buf.push(ch),
        }
    }
}

/// Format a real value the short way: 6.0 → "6", 6.5 → "6.5".
pub fn format_real(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

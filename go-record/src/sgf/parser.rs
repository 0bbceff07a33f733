use super::error::SgfError;
use super::types::*;

/// Keys that stay on a first node that carries a move; everything else on
/// the first node is document-level.
const NODE_KEYS: [&str; 4] = ["B", "W", "C", "MN"];

/// Parse record text into a [`RecordTree`].
///
/// Only the first game tree of a collection is kept. The first node's
/// properties become the document properties and its first child the root;
/// when the first node itself carries a move it stays as the root.
pub fn parse(input: &str) -> Result<RecordTree, SgfError> {
    let mut p = Parser::new(input);
    let raw = p.game_tree()?;

    p.skip_whitespace();
    if p.peek().is_some() {
        tracing::debug!(pos = p.pos, "ignoring content after the first game tree");
    }

    Ok(hoist_header(raw))
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

/// One open `(` level.
struct Frame {
    /// Node the level's first node attaches to.
    parent: Option<RecordId>,
    /// Last node of the level's sequence.
    tail: Option<RecordId>,
    /// A nested game tree has started; only `(` or `)` may follow.
    branched: bool,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn unexpected(&self, expected: &'static str, found: u8) -> SgfError {
        SgfError::UnexpectedChar {
            expected,
            found: found as char,
            pos: self.pos,
        }
    }

    // GameTree = '(' Node+ GameTree* ')', walked with an explicit stack so
    // deeply nested records do not recurse.
    fn game_tree(&mut self) -> Result<RecordTree, SgfError> {
        let mut tree = RecordTree::new();

        self.skip_whitespace();
        match self.peek() {
            None => return Err(SgfError::NoGameTree),
            Some(b'(') => self.pos += 1,
            Some(b) => return Err(self.unexpected("'('", b)),
        }
        let mut stack = vec![Frame {
            parent: None,
            tail: None,
            branched: false,
        }];

        while let Some(top) = stack.last_mut() {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(SgfError::Truncated { pos: self.pos }),
                Some(b';') if !top.branched => {
                    self.pos += 1;
                    let parent = top.tail.or(top.parent);
                    let (properties, move_number) = self.node()?;
                    let id = tree.push_node(parent, properties);
                    tree.node_mut(id).move_number = move_number;
                    top.tail = Some(id);
                }
                Some(b'(') if top.tail.is_some() => {
                    self.pos += 1;
                    top.branched = true;
                    let parent = top.tail;
                    stack.push(Frame {
                        parent,
                        tail: None,
                        branched: false,
                    });
                }
                Some(b')') if top.tail.is_some() => {
                    self.pos += 1;
                    stack.pop();
                }
                Some(b) if top.tail.is_none() => return Err(self.unexpected("';'", b)),
                Some(b) if top.branched => return Err(self.unexpected("'(' or ')'", b)),
                Some(b) => return Err(self.unexpected("';', '(' or ')'", b)),
            }
        }

        Ok(tree)
    }

    // Node = ';' Property*
    fn node(&mut self) -> Result<(Properties, u32), SgfError> {
        let mut properties = Properties::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b) if b.is_ascii_alphabetic() => {
                    let (ident, values) = self.raw_property()?;
                    if ident.is_empty() {
                        continue;
                    }
                    properties.set(ident, values.join(","));
                }
                _ => break,
            }
        }
        // MN is informational; a bad value only loses the number.
        let move_number = match properties.get("MN").map(|v| v.trim().parse::<u32>()) {
            Some(Ok(n)) => n,
            Some(Err(_)) => {
                tracing::debug!(pos = self.pos, "ignoring malformed MN value");
                0
            }
            None => 0,
        };
        Ok((properties, move_number))
    }

    // Property = Ident Value+
    fn raw_property(&mut self) -> Result<(String, Vec<String>), SgfError> {
        let ident = self.prop_ident();
        let mut values = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'[') => values.push(self.prop_value()?),
                Some(b) if values.is_empty() => return Err(self.unexpected("'['", b)),
                None if values.is_empty() => return Err(SgfError::Truncated { pos: self.pos }),
                _ => break,
            }
        }
        Ok((ident, values))
    }

    /// Old-style identifiers may mix in lowercase letters (`AddBlack`);
    /// only the uppercase ones count.
    fn prop_ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(b) = self.peek() {
            if !b.is_ascii_alphabetic() {
                break;
            }
            if b.is_ascii_uppercase() {
                ident.push(b as char);
            }
            self.pos += 1;
        }
        ident
    }

    fn prop_value(&mut self) -> Result<String, SgfError> {
        self.pos += 1; // '['
        let mut value = Vec::new();
        loop {
            match self.advance() {
                None => return Err(SgfError::Truncated { pos: self.pos }),
                Some(b'\\') => match self.advance() {
                    None => return Err(SgfError::Truncated { pos: self.pos }),
                    // Soft line break: removed along with its CR/LF partner.
                    Some(b'\n') => {
                        if self.peek() == Some(b'\r') {
                            self.pos += 1;
                        }
                    }
                    Some(b'\r') => {
                        if self.peek() == Some(b'\n') {
                            self.pos += 1;
                        }
                    }
                    Some(ch) => value.push(ch),
                },
                Some(b']') => break,
                Some(ch) => value.push(ch),
            }
        }
        Ok(String::from_utf8_lossy(&value).into_owned())
    }
}

/// Lift the first node's properties to the document level.
fn hoist_header(raw: RecordTree) -> RecordTree {
    let header = raw.node(0);
    let carries_move = header.properties.contains("B") || header.properties.contains("W");

    if carries_move {
        let mut document = Properties::new();
        let mut kept = Properties::new();
        for prop in header.properties.iter() {
            if NODE_KEYS.contains(&prop.key.as_str()) {
                kept.set(prop.key.clone(), prop.value.clone());
            } else {
                document.set(prop.key.clone(), prop.value.clone());
            }
        }
        let mut tree = raw.extract(0, document);
        if let Some(root) = tree.root() {
            tree.node_mut(root).properties = kept;
        }
        return tree;
    }

    let document = header.properties.clone();
    match header.children.split_first() {
        Some((&first, rest)) => {
            if !rest.is_empty() {
                tracing::debug!(
                    dropped = rest.len(),
                    "only the first top-level variation is kept"
                );
            }
            raw.extract(first, document)
        }
        None => RecordTree::with_properties(document),
    }
}

pub type RecordId = usize;

/// A single `KEY[value]` pair. Multi-valued input is joined with commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: String,
}

/// Ordered property mapping: keys are unique, insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(Vec<Property>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or overwrite in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|p| p.key == key) {
            Some(existing) => existing.value = value,
            None => self.0.push(Property { key, value }),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.0.iter().position(|p| p.key == key)?;
        Some(self.0.remove(idx).value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (key, value) in iter {
            props.set(key, value);
        }
        props
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordNode {
    pub properties: Properties,
    pub parent: Option<RecordId>,
    /// First child continues the line; the rest are variations.
    pub children: Vec<RecordId>,
    /// Not serialized; 0 when unknown.
    pub move_number: u32,
}

impl RecordNode {
    pub fn main_child(&self) -> Option<RecordId> {
        self.children.first().copied()
    }

    pub fn variations(&self) -> &[RecordId] {
        self.children.get(1..).unwrap_or(&[])
    }
}

/// One game record: document properties plus an arena of nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTree {
    /// Written before the first node (`FF`, `SZ`, `AB`, ...).
    pub properties: Properties,
    nodes: Vec<RecordNode>,
    root: Option<RecordId>,
}

impl RecordTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty tree carrying only document properties.
    pub fn with_properties(properties: Properties) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    pub fn root(&self) -> Option<RecordId> {
        self.root
    }

    pub fn set_root(&mut self, id: RecordId) {
        self.root = Some(id);
    }

    pub fn node(&self, id: RecordId) -> &RecordNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: RecordId) -> &mut RecordNode {
        &mut self.nodes[id]
    }

    pub fn nodes(&self) -> &[RecordNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node, appended as the last child of `parent` when given.
    pub fn push_node(&mut self, parent: Option<RecordId>, properties: Properties) -> RecordId {
        let id = self.nodes.len();
        self.nodes.push(RecordNode {
            properties,
            parent,
            children: Vec::new(),
            move_number: 0,
        });
        if let Some(pid) = parent {
            self.nodes[pid].children.push(id);
        }
        id
    }

    /// The root followed by successive main children.
    pub fn main_line(&self) -> Vec<RecordId> {
        let mut line = Vec::new();
        let mut next = self.root;
        while let Some(id) = next {
            line.push(id);
            next = self.nodes[id].main_child();
        }
        line
    }

    /// Copy the subtree under `start` into a fresh tree rooted there,
    /// dropping everything else.
    pub fn extract(&self, start: RecordId, properties: Properties) -> RecordTree {
        let mut out = RecordTree::with_properties(properties);
        let mut stack = vec![(start, None)];
        while let Some((id, parent)) = stack.pop() {
            let src = &self.nodes[id];
            let new_id = out.push_node(parent, src.properties.clone());
            out.nodes[new_id].move_number = src.move_number;
            if parent.is_none() {
                out.root = Some(new_id);
            }
            // Reversed so children come off the stack in order.
            for &child in src.children.iter().rev() {
                stack.push((child, Some(new_id)));
            }
        }
        out
    }
}

//! Route usage ledger backed by a self-balancing search tree.

use std::cmp::Ordering;

use crate::graph::VertexId;

/// Canonical ledger key for a path: vertex ids joined with " → ".
pub fn route_key(steps: &[VertexId]) -> String {
    steps.join(" → ")
}

/// Frequency ledger over route keys, stored in an AVL tree.
///
/// Recording an unseen key inserts it with a count of one; recording it again
/// only increments the counter, so the tree stays as large as the number of
/// distinct routes ever delivered. Keys are never removed.
#[derive(Debug, Default)]
pub struct RouteLedger {
    root: Option<Box<Node>>,
    len: usize,
}

impl RouteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one use of a route.
    pub fn record(&mut self, key: impl Into<String>) {
        let (root, created) = insert(self.root.take(), key.into());
        self.root = Some(root);
        if created {
            self.len += 1;
        }
    }

    /// How often a route has been recorded. Zero for unknown keys.
    pub fn count(&self, key: &str) -> u64 {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Equal => return node.count,
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
            }
        }
        0
    }

    /// Routes ranked by usage, most frequent first. The sort is stable over
    /// the key-ordered traversal, so equal counts tie-break alphabetically.
    pub fn frequent_routes(&self) -> Vec<(String, u64)> {
        let mut entries = self.routes_by_key();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// All recorded routes in key order, via an iterative in-order walk.
    pub fn routes_by_key(&self) -> Vec<(String, u64)> {
        let mut entries = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node> = Vec::new();
        let mut current = self.root.as_deref();

        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                entries.push((node.key.clone(), node.count));
                current = node.right.as_deref();
            }
        }

        entries
    }

    /// Number of distinct routes recorded.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the underlying tree.
    pub fn height(&self) -> usize {
        height(&self.root) as usize
    }
}

#[derive(Debug)]
struct Node {
    key: String,
    count: u64,
    height: i32,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn new(key: String) -> Self {
        Self {
            key,
            count: 1,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn balance_factor(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

fn height(node: &Option<Box<Node>>) -> i32 {
    node.as_ref().map(|node| node.height).unwrap_or(0)
}

/// Insert or increment a key. Returns the new subtree root and whether a
/// node was created; increments leave every height untouched, so rebalancing
/// only runs on the created path.
fn insert(node: Option<Box<Node>>, key: String) -> (Box<Node>, bool) {
    let mut node = match node {
        None => return (Box::new(Node::new(key)), true),
        Some(node) => node,
    };

    let created = match key.cmp(&node.key) {
        Ordering::Equal => {
            node.count += 1;
            return (node, false);
        }
        Ordering::Less => {
            let (child, created) = insert(node.left.take(), key);
            node.left = Some(child);
            created
        }
        Ordering::Greater => {
            let (child, created) = insert(node.right.take(), key);
            node.right = Some(child);
            created
        }
    };

    if !created {
        return (node, false);
    }
    node.update_height();
    (rebalance(node), true)
}

fn rebalance(mut node: Box<Node>) -> Box<Node> {
    let balance = node.balance_factor();

    if balance > 1 {
        let left_leans_right = node
            .left
            .as_ref()
            .map(|left| left.balance_factor() < 0)
            .unwrap_or(false);
        if left_leans_right {
            if let Some(left) = node.left.take() {
                node.left = Some(rotate_left(left));
            }
        }
        return rotate_right(node);
    }

    if balance < -1 {
        let right_leans_left = node
            .right
            .as_ref()
            .map(|right| right.balance_factor() > 0)
            .unwrap_or(false);
        if right_leans_left {
            if let Some(right) = node.right.take() {
                node.right = Some(rotate_right(right));
            }
        }
        return rotate_left(node);
    }

    node
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    // A left-heavy node always has a left child.
    let Some(mut new_root) = node.left.take() else {
        return node;
    };
    node.left = new_root.right.take();
    node.update_height();
    new_root.right = Some(node);
    new_root.update_height();
    new_root
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut new_root) = node.right.take() else {
        return node;
    };
    node.right = new_root.left.take();
    node.update_height();
    new_root.left = Some(node);
    new_root.update_height();
    new_root
}

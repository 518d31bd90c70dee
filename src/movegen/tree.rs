//! Arena-backed move tree.
//!
//! Node 0 is a synthetic root carrying no move. Every other node holds one
//! `Move` and links to its parent, first/last child, and next sibling by
//! index, so the whole tree is released by truncating a single `Vec`.
//! Each root-to-leaf path is one complete action for the turn.

use crate::board::Move;

/// Index of a node inside an `ActionTree`.
pub type NodeId = usize;

/// Longest possible action: four moves on a double.
pub const MAX_ACTION_LEN: usize = 4;

#[derive(Debug, Clone)]
struct Node {
    mv: Move,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Node {
    const fn new(mv: Move, parent: Option<NodeId>) -> Self {
        Node { mv, parent, first_child: None, last_child: None, next_sibling: None }
    }
}

/// Tree of legal move sequences for one roll.
#[derive(Debug, Clone)]
pub struct ActionTree {
    nodes: Vec<Node>,
}

impl Default for ActionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionTree {
    /// The root node id.
    pub const ROOT: NodeId = 0;

    /// Creates a tree containing only the root.
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Creates a tree whose arena can hold `capacity` nodes before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::new(Move::SENTINEL, None));
        ActionTree { nodes }
    }

    /// Releases every node but the root, keeping the allocation.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[Self::ROOT] = Node::new(Move::SENTINEL, None);
    }

    /// Appends `mv` as the last child of `parent` and returns its id.
    pub fn push(&mut self, parent: NodeId, mv: Move) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(mv, Some(parent)));
        match self.nodes[parent].last_child {
            Some(last) => self.nodes[last].next_sibling = Some(id),
            None => self.nodes[parent].first_child = Some(id),
        }
        self.nodes[parent].last_child = Some(id);
        id
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns true if at least one legal action exists.
    pub fn has_actions(&self) -> bool {
        !self.is_empty()
    }

    /// The move stored on `id`; the root stores `Move::SENTINEL`.
    pub fn get(&self, id: NodeId) -> Move {
        self.nodes[id].mv
    }

    /// Parent of `id`, or `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Iterates the children of `id` in insertion order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children { tree: self, next: self.nodes[id].first_child }
    }

    /// Returns true if `id` has no children. The root of an empty tree is
    /// not considered a leaf by `leaves`.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id].first_child.is_none()
    }

    /// Iterates every non-root leaf id.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        (1..self.nodes.len()).filter(move |&id| self.is_leaf(id))
    }

    /// Number of complete actions in the tree.
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Number of moves between the root and `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = id;
        while let Some(parent) = self.nodes[cur].parent {
            depth += 1;
            cur = parent;
        }
        depth
    }

    /// Moves along the path from the root (excluded) to `id`, in play order.
    pub fn path(&self, id: NodeId) -> Vec<Move> {
        let mut moves = Vec::with_capacity(MAX_ACTION_LEN);
        let mut cur = id;
        while let Some(parent) = self.nodes[cur].parent {
            moves.push(self.nodes[cur].mv);
            cur = parent;
        }
        moves.reverse();
        moves
    }

    /// Calls `visitor` once per leaf, depth-first in pre-order, with the
    /// moves from the root (excluded) down to that leaf.
    ///
    /// Nothing is visited when the tree holds no actions.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&[Move]),
    {
        let Some(first) = self.nodes[Self::ROOT].first_child else {
            return;
        };
        let mut stack: Vec<NodeId> = Vec::with_capacity(MAX_ACTION_LEN);
        let mut path: Vec<Move> = Vec::with_capacity(MAX_ACTION_LEN);
        stack.push(first);
        path.push(self.nodes[first].mv);

        while let Some(&top) = stack.last() {
            if let Some(child) = self.nodes[top].first_child {
                stack.push(child);
                path.push(self.nodes[child].mv);
                continue;
            }
            visitor(&path);

            // Climb until a node with an unvisited sibling appears.
            loop {
                let Some(node) = stack.pop() else {
                    return;
                };
                path.pop();
                if let Some(sibling) = self.nodes[node].next_sibling {
                    stack.push(sibling);
                    path.push(self.nodes[sibling].mv);
                    break;
                }
            }
        }
    }

    /// Collects every action into owned move lists, in `visit` order.
    pub fn actions(&self) -> Vec<Vec<Move>> {
        let mut out = Vec::new();
        self.visit(|path| out.push(path.to_vec()));
        out
    }
}

/// Iterator over the children of one node.
pub struct Children<'a> {
    tree: &'a ActionTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.tree.nodes[cur].next_sibling;
        Some(cur)
    }
}

//! Authoritative table of every state discovered by the search.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. The frontier only
//! ever holds ids, so the fields read here are always the current ones.

use std::collections::HashMap;

use crate::cube::Cube;
use crate::moves::Move;
use crate::score::{score, MAX_SCORE};

/// Handle to a node in a [`NodeIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A discovered cube state together with its search bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode {
    pub cube: Cube,
    pub encoding: String,
    pub score: u32,
    /// Set once all twelve children have been generated. Visited nodes are
    /// never relaxed again.
    pub visited: bool,
    /// Move that produced this state from its recorded parent, `None` for the root.
    pub last_move: Option<Move>,
    /// Fewest turns from the root found so far.
    pub distance: u32,
}

impl SearchNode {
    pub fn root(cube: Cube) -> Self {
        Self::new(cube, None, 0)
    }

    pub fn new(cube: Cube, last_move: Option<Move>, distance: u32) -> Self {
        Self {
            encoding: cube.encode(),
            score: score(&cube),
            cube,
            visited: false,
            last_move,
            distance,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.score == MAX_SCORE
    }
}

/// Maps canonical encodings to the single node owning that state.
#[derive(Debug, Default)]
pub struct NodeIndex {
    nodes: Vec<SearchNode>,
    by_encoding: HashMap<String, NodeId>,
}

impl NodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` unless its state is already known. Returns the id of the
    /// authoritative node and whether it existed before the call; an existing
    /// node is left untouched.
    pub fn lookup_or_insert(&mut self, node: SearchNode) -> (NodeId, bool) {
        if let Some(&id) = self.by_encoding.get(&node.encoding) {
            return (id, true);
        }
        let id = NodeId(self.nodes.len());
        self.by_encoding.insert(node.encoding.clone(), id);
        self.nodes.push(node);
        (id, false)
    }

    /// Lower the distance of an unvisited node and record the move that
    /// achieved it. Returns true when the node changed, in which case the
    /// caller has to offer it to the frontier again.
    pub fn relax(&mut self, encoding: &str, distance: u32, last_move: Move) -> bool {
        let Some(&id) = self.by_encoding.get(encoding) else {
            return false;
        };
        let node = &mut self.nodes[id.0];
        if node.visited || distance >= node.distance {
            return false;
        }
        node.distance = distance;
        node.last_move = Some(last_move);
        true
    }

    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn find(&self, encoding: &str) -> Option<&SearchNode> {
        self.by_encoding.get(encoding).map(|&id| self.get(id))
    }

    pub fn mark_visited(&mut self, id: NodeId) {
        self.nodes[id.0].visited = true;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::apply;

    fn front() -> Move {
        Move::new(0).unwrap()
    }

    #[test]
    fn test_duplicate_discovery_is_deduplicated() {
        let mut index = NodeIndex::new();
        let cube = apply(&Cube::solved(), front());

        let (first, existed) = index.lookup_or_insert(SearchNode::new(cube, Some(front()), 3));
        assert!(!existed);
        let (second, existed) = index.lookup_or_insert(SearchNode::new(cube, Some(front()), 1));
        assert!(existed);
        assert_eq!(first, second);
        assert_eq!(index.len(), 1);
        // the second discovery does not overwrite the stored node
        assert_eq!(index.get(first).distance, 3);
    }

    #[test]
    fn test_relax_only_improves_unvisited() {
        let mut index = NodeIndex::new();
        let cube = apply(&Cube::solved(), front());
        let encoding = cube.encode();
        let (id, _) = index.lookup_or_insert(SearchNode::new(cube, Some(front()), 5));

        let back = Move::new(5).unwrap();
        assert!(!index.relax(&encoding, 5, back));
        assert!(!index.relax(&encoding, 7, back));
        assert!(index.relax(&encoding, 2, back));
        assert_eq!(index.get(id).distance, 2);
        assert_eq!(index.get(id).last_move, Some(back));

        index.mark_visited(id);
        assert!(!index.relax(&encoding, 1, front()));
        assert_eq!(index.get(id).distance, 2);
        assert!(!index.relax("not a state", 0, front()));
    }

    #[test]
    fn test_root_node() {
        let node = SearchNode::root(Cube::solved());
        assert!(node.is_solved());
        assert_eq!(node.distance, 0);
        assert_eq!(node.last_move, None);
        let mut index = NodeIndex::new();
        index.lookup_or_insert(node);
        assert!(index.find(&Cube::solved().encode()).is_some());
    }
}

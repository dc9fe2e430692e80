//! Min-cost priority queue over node ids.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::index::{NodeId, SearchNode};

/// Blended priority: distance travelled minus weighted score.
pub fn cost(node: &SearchNode, weight: f64) -> f64 {
    node.distance as f64 - node.score as f64 * weight
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    cost: f64,
    distance: u32,
    sequence: u64,
    id: NodeId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    // BinaryHeap is a max-heap, so "greater" means cheaper here
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.distance.cmp(&self.distance))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Frontier of discovered states. Entries are snapshots taken at push time
/// and can go stale; resolve popped ids against the index before use.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
    pushed: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: NodeId, node: &SearchNode, weight: f64) {
        self.heap.push(Entry {
            cost: cost(node, weight),
            distance: node.distance,
            sequence: self.pushed,
            id,
        });
        self.pushed += 1;
    }

    /// Remove the cheapest entry. Ties go to the shorter distance, then to
    /// the earlier push.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|entry| entry.id)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Cube;
    use crate::index::NodeIndex;
    use crate::moves::{apply_sequence, parse_sequence};

    fn node(moves: &str, distance: u32) -> SearchNode {
        let moves = parse_sequence(moves).unwrap();
        let cube = apply_sequence(&Cube::solved(), &moves);
        SearchNode::new(cube, moves.last().copied(), distance)
    }

    #[test]
    fn test_pops_lowest_cost_first() {
        let mut index = NodeIndex::new();
        let mut frontier = Frontier::new();

        let (far, _) = index.lookup_or_insert(node("F R U", 3));
        let (near, _) = index.lookup_or_insert(node("F", 1));
        let (mid, _) = index.lookup_or_insert(node("F R", 2));
        for id in [far, near, mid] {
            frontier.push(id, index.get(id), 0.0);
        }

        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.pop(), Some(near));
        assert_eq!(frontier.pop(), Some(mid));
        assert_eq!(frontier.pop(), Some(far));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_score_weight_can_outrank_distance() {
        let mut index = NodeIndex::new();
        let mut frontier = Frontier::new();

        let (messy, _) = index.lookup_or_insert(node("F R U L", 1));
        let (tidy, _) = index.lookup_or_insert(node("F", 4));
        frontier.push(messy, index.get(messy), 0.0);
        frontier.push(tidy, index.get(tidy), 0.0);
        assert_eq!(frontier.pop(), Some(messy));

        frontier.push(messy, index.get(messy), 1.0);
        frontier.push(tidy, index.get(tidy), 1.0);
        assert_eq!(frontier.pop(), Some(tidy));
    }

    #[test]
    fn test_equal_cost_is_first_in_first_out() {
        let mut index = NodeIndex::new();
        let mut frontier = Frontier::new();
        let (a, _) = index.lookup_or_insert(node("F", 1));
        let (b, _) = index.lookup_or_insert(node("R", 1));
        frontier.push(a, index.get(a), 0.5);
        frontier.push(b, index.get(b), 0.5);
        assert_eq!(frontier.pop(), Some(a));
        assert_eq!(frontier.pop(), Some(b));
        assert!(frontier.is_empty());
    }
}

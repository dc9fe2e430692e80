//! Best-first search from a scrambled cube to the solved state.
//!
//! Frontier entries are ordered by `distance - score * weight`. The weight
//! starts small so that distance dominates, then grows as the best score seen
//! approaches the solved score and the search turns greedy. Because the score
//! is a similarity measure rather than a bound on the turns left, returned
//! solutions are short in practice but not guaranteed to be minimal.

use std::time::{Duration, Instant};

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cube::Cube;
use crate::error::SolveError;
use crate::frontier::Frontier;
use crate::index::{NodeId, NodeIndex, SearchNode};
use crate::moves::{apply, apply_sequence, Move, MOVE_COUNT};
use crate::score::MAX_SCORE;

/// Schedule mapping the best score seen so far to a frontier weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Weighting {
    /// Weight while nothing promising has been seen.
    pub base: f64,
    /// Best score from which the search switches to `near_solved_weight`.
    pub near_solved_score: u32,
    pub near_solved_weight: f64,
}

impl Default for Weighting {
    fn default() -> Self {
        Self {
            base: 0.4,
            near_solved_score: 270,
            near_solved_weight: 5.0,
        }
    }
}

impl Weighting {
    /// `base` scaled by how close `best_score` is to solved, or the
    /// near-solved constant once past the threshold.
    pub fn weight(&self, best_score: u32) -> f64 {
        if best_score >= self.near_solved_score {
            return self.near_solved_weight;
        }
        let remaining = MAX_SCORE.saturating_sub(best_score).max(1);
        self.base * MAX_SCORE as f64 / remaining as f64
    }
}

/// Configuration for the solver
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverConfig {
    pub weighting: Weighting,
    /// Stop after this many expanded states
    pub max_expansions: Option<usize>,
    /// Stop after this many milliseconds
    pub timeout_ms: Option<u64>,
}

impl SolverConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Counters describing one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub nodes_discovered: usize,
    pub stale_entries_skipped: usize,
    pub best_score: u32,
    pub time_elapsed_ms: u64,
}

/// One move of a solution with the state it leads to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step: usize,
    #[serde(rename = "move")]
    pub turn: Move,
    pub cube: Cube,
}

/// A move sequence that solves `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub start: Cube,
    pub moves: Vec<Move>,
    pub stats: SearchStats,
}

impl Solution {
    /// Intermediate states after each move, numbered from 1.
    pub fn steps(&self) -> Vec<Step> {
        let mut cube = self.start;
        self.moves
            .iter()
            .enumerate()
            .map(|(i, &turn)| {
                cube = apply(&cube, turn);
                Step {
                    step: i + 1,
                    turn,
                    cube,
                }
            })
            .collect()
    }

    /// The state reached by replaying the moves from `start`.
    pub fn final_state(&self) -> Cube {
        apply_sequence(&self.start, &self.moves)
    }
}

/// Weight bookkeeping carried through the search loop.
#[derive(Debug, Clone, Copy)]
struct Schedule {
    best_score: u32,
    weight: f64,
}

impl Schedule {
    fn new(weighting: &Weighting) -> Self {
        Self {
            best_score: 0,
            weight: weighting.weight(0),
        }
    }

    fn observe(self, score: u32, weighting: &Weighting) -> Self {
        if score <= self.best_score {
            return self;
        }
        Self {
            best_score: score,
            weight: weighting.weight(score),
        }
    }
}

/// The twelve successors of `cube` in move order.
fn expand(cube: &Cube) -> SmallVec<[(Move, Cube); MOVE_COUNT]> {
    Move::ALL.iter().map(|&m| (m, apply(cube, m))).collect()
}

/// Decode, validate and solve a cube given in its canonical encoding.
pub fn solve_encoding(encoding: &str, config: &SolverConfig) -> Result<Solution, SolveError> {
    let cube = Cube::parse_valid(encoding)?;
    solve(&cube, config)
}

/// Search for a move sequence that solves `cube`.
///
/// Fails with `SearchExhausted` when every reachable state was expanded
/// without meeting the solved score, and with `BudgetExceeded` when one of
/// the configured limits is hit first.
pub fn solve(cube: &Cube, config: &SolverConfig) -> Result<Solution, SolveError> {
    cube.check_valid()?;

    let start_time = Instant::now();
    let deadline = config
        .timeout()
        .and_then(|timeout| start_time.checked_add(timeout));
    let weighting = &config.weighting;

    let mut index = NodeIndex::new();
    let mut frontier = Frontier::new();
    let mut schedule = Schedule::new(weighting);
    let mut stats = SearchStats::default();

    let root = SearchNode::root(*cube);
    let root_encoding = root.encoding.clone();
    info!("Searching from {} (score {})", root_encoding, root.score);

    let (root_id, _) = index.lookup_or_insert(root);
    frontier.push(root_id, index.get(root_id), schedule.weight);

    while let Some(id) = frontier.pop() {
        let node = index.get(id);
        if node.visited {
            stats.stale_entries_skipped += 1;
            continue;
        }

        if node.is_solved() {
            let moves = reconstruct_path(&index, id, &root_encoding)?;
            stats.nodes_discovered = index.len();
            stats.best_score = MAX_SCORE;
            stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
            info!(
                "Solved in {} moves after expanding {} states ({} discovered) in {}ms",
                moves.len(),
                stats.nodes_expanded,
                stats.nodes_discovered,
                stats.time_elapsed_ms
            );
            return Ok(Solution {
                start: *cube,
                moves,
                stats,
            });
        }

        if config
            .max_expansions
            .is_some_and(|max| stats.nodes_expanded >= max)
        {
            return Err(SolveError::BudgetExceeded {
                nodes_expanded: stats.nodes_expanded,
                reason: "expansion limit reached",
            });
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(SolveError::BudgetExceeded {
                nodes_expanded: stats.nodes_expanded,
                reason: "timeout",
            });
        }

        let parent = node.cube;
        let parent_score = node.score;
        let child_distance = node.distance + 1;
        trace!(
            "Expanding {} (score {}, distance {})",
            node.encoding,
            parent_score,
            node.distance
        );

        for (turn, child) in expand(&parent) {
            let (child_id, existed) =
                index.lookup_or_insert(SearchNode::new(child, Some(turn), child_distance));
            if !existed {
                frontier.push(child_id, index.get(child_id), schedule.weight);
                continue;
            }
            let encoding = index.get(child_id).encoding.clone();
            if index.relax(&encoding, child_distance, turn) {
                frontier.push(child_id, index.get(child_id), schedule.weight);
            }
        }

        index.mark_visited(id);
        stats.nodes_expanded += 1;

        let next = schedule.observe(parent_score, weighting);
        if next.best_score > schedule.best_score {
            debug!(
                "Best score {} -> {}, weight now {:.3}",
                schedule.best_score, next.best_score, next.weight
            );
        }
        schedule = next;
        stats.best_score = schedule.best_score;
    }

    info!(
        "Frontier exhausted after expanding {} states",
        stats.nodes_expanded
    );
    Err(SolveError::SearchExhausted {
        nodes_expanded: stats.nodes_expanded,
    })
}

/// Walk back from `terminal` to the root by undoing each recorded move.
fn reconstruct_path(
    index: &NodeIndex,
    terminal: NodeId,
    root_encoding: &str,
) -> Result<Vec<Move>, SolveError> {
    let mut moves = Vec::new();
    let mut node = index.get(terminal);

    while node.encoding != root_encoding {
        // every step lowers the distance, so a longer walk means a corrupt index
        if moves.len() > index.len() {
            return Err(SolveError::BrokenPath(node.encoding.clone()));
        }
        let turn = node
            .last_move
            .ok_or_else(|| SolveError::BrokenPath(node.encoding.clone()))?;
        moves.push(turn);

        let parent = apply(&node.cube, turn.inverse()).encode();
        node = index
            .find(&parent)
            .ok_or(SolveError::BrokenPath(parent))?;
    }

    moves.reverse();
    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::parse_sequence;
    use crate::score::score;

    fn scramble(moves: &str) -> Cube {
        apply_sequence(&Cube::solved(), &parse_sequence(moves).unwrap())
    }

    #[test]
    fn test_weighting_schedule() {
        let weighting = Weighting::default();
        assert!((weighting.weight(0) - 0.4).abs() < 1e-9);
        assert!(weighting.weight(200) > weighting.weight(100));
        assert_eq!(weighting.weight(270), 5.0);
        assert_eq!(weighting.weight(MAX_SCORE), 5.0);
    }

    #[test]
    fn test_schedule_only_moves_up() {
        let weighting = Weighting::default();
        let schedule = Schedule::new(&weighting).observe(150, &weighting);
        assert_eq!(schedule.best_score, 150);
        let unchanged = schedule.observe(120, &weighting);
        assert_eq!(unchanged.best_score, 150);
        assert_eq!(unchanged.weight, schedule.weight);
    }

    #[test_log::test]
    fn test_solved_cube_needs_no_moves() {
        let solution = solve(&Cube::solved(), &SolverConfig::default()).unwrap();
        assert!(solution.moves.is_empty());
        assert_eq!(solution.stats.nodes_expanded, 0);
        assert!(solution.steps().is_empty());
    }

    #[test_log::test]
    fn test_single_move_is_undone() {
        for m in Move::ALL {
            let cube = apply(&Cube::solved(), m);
            let solution = solve(&cube, &SolverConfig::default()).unwrap();
            assert_eq!(solution.moves, vec![m.inverse()]);
        }
    }

    #[test_log::test]
    fn test_short_scramble_replays_to_solved() {
        let cube = scramble("F U R'");
        let solution = solve(&cube, &SolverConfig::default()).unwrap();
        assert_eq!(score(&solution.final_state()), MAX_SCORE);
        assert!(solution.final_state().is_solved());

        let steps = solution.steps();
        assert_eq!(steps.len(), solution.moves.len());
        assert_eq!(steps.last().map(|s| s.cube), Some(Cube::solved()));
    }

    #[test_log::test]
    fn test_expansion_budget() {
        let config = SolverConfig {
            max_expansions: Some(0),
            ..Default::default()
        };
        let result = solve(&scramble("F R"), &config);
        assert!(matches!(
            result,
            Err(SolveError::BudgetExceeded {
                nodes_expanded: 0,
                ..
            })
        ));
    }

    #[test_log::test]
    fn test_timeout_budget() {
        let config = SolverConfig {
            timeout_ms: Some(0),
            ..Default::default()
        };
        let result = solve(&scramble("F R"), &config);
        assert!(matches!(
            result,
            Err(SolveError::BudgetExceeded {
                nodes_expanded: 0,
                reason: "timeout",
            })
        ));
    }

    #[test_log::test]
    fn test_unrepresentable_timeout_never_fires() {
        let config = SolverConfig {
            timeout_ms: Some(u64::MAX),
            ..Default::default()
        };
        let solution = solve(&scramble("F U R'"), &config).unwrap();
        assert!(solution.final_state().is_solved());
    }

    #[test]
    fn test_invalid_cube_is_rejected_before_search() {
        let lopsided = "000000000111111111222222222333333333444444444555555550";
        assert!(matches!(
            solve_encoding(lopsided, &SolverConfig::default()),
            Err(SolveError::Cube(_))
        ));
        assert!(matches!(
            solve_encoding("123", &SolverConfig::default()),
            Err(SolveError::Cube(_))
        ));
    }

    #[test]
    fn test_reconstruct_path_follows_recorded_moves() {
        let mut index = NodeIndex::new();
        let start = scramble("R");
        let (root_id, _) = index.lookup_or_insert(SearchNode::root(start));
        let turn = Move::new(7).unwrap();
        let (child, _) = index.lookup_or_insert(SearchNode::new(apply(&start, turn), Some(turn), 1));

        let root_encoding = index.get(root_id).encoding.clone();
        assert_eq!(reconstruct_path(&index, child, &root_encoding).unwrap(), vec![turn]);
        assert!(reconstruct_path(&index, root_id, &root_encoding)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_reconstruct_path_uses_last_relaxation() {
        let mut index = NodeIndex::new();
        let root = Cube::solved();
        let (root_id, _) = index.lookup_or_insert(SearchNode::root(root));
        index.mark_visited(root_id);

        let up = Move::new(3).unwrap();
        let front = Move::new(0).unwrap();
        let right = Move::new(1).unwrap();

        // parent reached from the root by U, already expanded
        let parent = apply(&root, up);
        let (parent_id, _) = index.lookup_or_insert(SearchNode::new(parent, Some(up), 1));
        index.mark_visited(parent_id);

        // first discovered by R from a state that is not in the index
        let target = apply(&parent, front);
        let (target_id, _) = index.lookup_or_insert(SearchNode::new(target, Some(right), 9));
        let encoding = index.get(target_id).encoding.clone();
        assert!(index.relax(&encoding, 2, front));

        let root_encoding = index.get(root_id).encoding.clone();
        let path = reconstruct_path(&index, target_id, &root_encoding).unwrap();
        assert_eq!(path, vec![up, front]);
        assert_eq!(apply_sequence(&root, &path), target);
    }

    #[test]
    fn test_reconstruct_path_without_relaxation_is_broken() {
        let mut index = NodeIndex::new();
        let root = Cube::solved();
        let (root_id, _) = index.lookup_or_insert(SearchNode::root(root));
        let right = Move::new(1).unwrap();
        // the recorded move points back to a parent that was never indexed
        let target = apply_sequence(&root, &[Move::new(3).unwrap(), Move::new(0).unwrap()]);
        let (target_id, _) = index.lookup_or_insert(SearchNode::new(target, Some(right), 9));

        let root_encoding = index.get(root_id).encoding.clone();
        assert!(matches!(
            reconstruct_path(&index, target_id, &root_encoding),
            Err(SolveError::BrokenPath(_))
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config: SolverConfig =
            serde_json::from_str(r#"{"maxExpansions": 10, "weighting": {"base": 1.5}}"#).unwrap();
        assert_eq!(config.max_expansions, Some(10));
        assert_eq!(config.weighting.base, 1.5);
        assert_eq!(config.weighting.near_solved_score, 270);
        assert_eq!(config.timeout(), None);
    }
}

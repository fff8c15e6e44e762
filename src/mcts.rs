//! Monte Carlo Tree Search.
//!
//! The tree lives in an arena: nodes are stored in a `Vec` and refer to each
//! other by [`NodeId`]. Children are owned by their parent's child list; the
//! parent link is only followed upwards during backpropagation.
//!
//! One iteration of [`tree_search`]:
//! 1. descend from the root, following UCT through fully expanded nodes and
//!    expanding the first node that still has untried moves,
//! 2. play random moves from the reached node to a terminal state,
//! 3. score 1 if the player to move at the root won, else 0,
//! 4. add the result to every node from the reached one up to the root.

use tracing::{debug, trace};

use crate::config::UnvisitedPolicy;
use crate::policy::MovePolicy;
use crate::position::Position;

/// Index of a node in a [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the search tree.
#[derive(Clone, Debug)]
pub struct Node {
    /// The game position at this node
    pub pos: Position,
    /// Column played to reach this node (`None` at the root)
    pub mv: Option<usize>,
    pub parent: Option<NodeId>,
    /// Child nodes, in creation order
    pub children: Vec<NodeId>,
    /// Number of visits
    pub visits: u32,
    /// Number of wins (winrate = wins/visits)
    pub wins: u32,
}

impl Node {
    fn new(pos: Position, mv: Option<usize>, parent: Option<NodeId>) -> Self {
        Self {
            pos,
            mv,
            parent,
            children: Vec::new(),
            visits: 0,
            wins: 0,
        }
    }

    /// Win ratio, or `None` before the first visit.
    pub fn winrate(&self) -> Option<f64> {
        (self.visits > 0).then(|| self.wins as f64 / self.visits as f64)
    }
}

/// Arena-allocated search tree for one move decision.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(root: Position) -> Self {
        Self {
            nodes: vec![Node::new(root, None, None)],
        }
    }

    pub fn root(&self) -> &Node {
        self.node(NodeId::ROOT)
    }

    /// # Panics
    /// Panics if the id does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// All node ids, root first.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every legal move of the node's position already has a child.
    pub fn is_fully_expanded(&self, id: NodeId) -> bool {
        let node = self.node(id);
        node.children.len() == node.pos.legal_moves().len()
    }

    /// Child with the highest UCT score.
    ///
    /// Ties keep the earliest child. With [`UnvisitedPolicy::Worst`] a child
    /// that has never been visited can't be selected, so `None` comes back
    /// when no child has been visited yet.
    pub fn select_child(
        &self,
        id: NodeId,
        exploration: f64,
        unvisited: UnvisitedPolicy,
    ) -> Option<NodeId> {
        let parent_visits = self.node(id).visits;
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;

        for &child_id in &self.node(id).children {
            let score = uct_score(parent_visits, self.node(child_id), exploration, unvisited);
            if score > best_score {
                best_score = score;
                best = Some(child_id);
            }
        }
        best
    }

    /// Add a child for every legal move that doesn't have one yet, then
    /// return one of the node's children picked by `policy`.
    ///
    /// Returns `None` if the position has no legal moves.
    pub fn expand(&mut self, id: NodeId, policy: &mut dyn MovePolicy) -> Option<NodeId> {
        let pos = self.node(id).pos.clone();
        let tried: Vec<usize> = self
            .node(id)
            .children
            .iter()
            .filter_map(|&c| self.node(c).mv)
            .collect();

        for column in pos.legal_moves() {
            if tried.contains(&column) {
                continue;
            }
            let Ok(child_pos) = pos.apply_move(column) else {
                continue;
            };
            let child_id = NodeId(self.nodes.len());
            self.nodes.push(Node::new(child_pos, Some(column), Some(id)));
            self.node_mut(id).children.push(child_id);
        }

        let slots: Vec<usize> = (0..self.node(id).children.len()).collect();
        policy
            .pick(&slots)
            .map(|slot| self.node(id).children[slot])
    }

    /// Add one visit and `result` wins to `id` and each of its ancestors.
    pub fn backpropagate(&mut self, id: NodeId, result: u32) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node_mut(node_id);
            node.visits += 1;
            node.wins += result;
            current = node.parent;
        }
    }
}

/// UCT score of `child` under a parent with `parent_visits` visits.
fn uct_score(
    parent_visits: u32,
    child: &Node,
    exploration: f64,
    unvisited: UnvisitedPolicy,
) -> f64 {
    if child.visits == 0 {
        return match unvisited {
            UnvisitedPolicy::Worst => f64::NEG_INFINITY,
            UnvisitedPolicy::Best => f64::INFINITY,
        };
    }
    let visits = child.visits as f64;
    let exploitation = child.wins as f64 / visits;
    if exploration == 0.0 || parent_visits == 0 {
        return exploitation;
    }
    exploitation + exploration * (2.0 * (parent_visits as f64).ln() / visits).sqrt()
}

/// Walk down from the root to the node the next playout starts from.
fn tree_descend(
    tree: &mut Tree,
    exploration: f64,
    unvisited: UnvisitedPolicy,
    policy: &mut dyn MovePolicy,
) -> NodeId {
    let mut node = NodeId::ROOT;

    loop {
        if tree.node(node).pos.is_terminal() {
            break;
        }

        if !tree.is_fully_expanded(node) {
            if let Some(child) = tree.expand(node, policy) {
                node = child;
            }
            break;
        }

        match tree.select_child(node, exploration, unvisited) {
            Some(child) => node = child,
            None => break,
        }
    }

    node
}

/// Play random moves until someone wins or the board fills up.
pub fn rollout(pos: &mut Position, policy: &mut dyn MovePolicy) {
    while !pos.is_terminal() {
        let Some(column) = policy.pick(&pos.legal_moves()) else {
            break;
        };
        match pos.apply_move(column) {
            Ok(next) => *pos = next,
            Err(_) => break,
        }
    }
}

/// Run `sims` iterations over `tree` and return the chosen root child.
///
/// Results are scored for the player to move at the root. The final choice
/// uses no exploration bonus. Returns `None` when the root has no visited
/// children, which includes terminal roots and `sims == 0`.
pub fn tree_search(
    tree: &mut Tree,
    sims: usize,
    exploration: f64,
    unvisited: UnvisitedPolicy,
    policy: &mut dyn MovePolicy,
) -> Option<NodeId> {
    let reference = tree.root().pos.to_move;

    for _ in 0..sims {
        let leaf = tree_descend(tree, exploration, unvisited, policy);

        let mut pos = tree.node(leaf).pos.clone();
        rollout(&mut pos, policy);

        let result = u32::from(pos.winner() == Some(reference));
        tree.backpropagate(leaf, result);
    }

    dump_children(tree);
    let best = best_child(tree);
    debug!(
        sims,
        nodes = tree.len(),
        root_visits = tree.root().visits,
        column = ?best.and_then(|id| tree.node(id).mv),
        "tree search finished"
    );
    best
}

/// Root child with the best win ratio, without exploration. Unvisited
/// children are never a final answer, whatever the descent policy.
fn best_child(tree: &Tree) -> Option<NodeId> {
    tree.select_child(NodeId::ROOT, 0.0, UnvisitedPolicy::Worst)
}

/// Trace statistics for the root's children.
pub fn dump_children(tree: &Tree) {
    for &id in &tree.root().children {
        let child = tree.node(id);
        trace!(
            column = ?child.mv,
            visits = child.visits,
            wins = child.wins,
            winrate = ?child.winrate(),
            "root child"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Player};
    use crate::config::BoardConfig;
    use crate::policy::{Scripted, UniformRandom};

    fn empty_tree() -> Tree {
        Tree::new(Position::new(BoardConfig::default()))
    }

    #[test]
    fn test_expand_adds_every_legal_move_once() {
        let mut tree = empty_tree();
        let mut policy = Scripted::new(vec![3]);

        let child = tree.expand(NodeId::ROOT, &mut policy).unwrap();
        assert_eq!(tree.root().children.len(), 7);
        assert_eq!(tree.node(child).mv, Some(3));
        assert_eq!(tree.node(child).parent, Some(NodeId::ROOT));
        assert!(tree.is_fully_expanded(NodeId::ROOT));

        // A second expansion adds nothing new
        tree.expand(NodeId::ROOT, &mut policy);
        assert_eq!(tree.root().children.len(), 7);
        let moves: Vec<_> = tree
            .root()
            .children
            .iter()
            .map(|&c| tree.node(c).mv.unwrap())
            .collect();
        assert_eq!(moves, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_expand_terminal_full_board() {
        let config = BoardConfig::new(2, 2, 2);
        let board = Board::from_rows(config, &["XO", "OX"]).unwrap();
        let mut tree = Tree::new(Position::from_board(board, Player::O));
        let mut policy = Scripted::first();
        assert_eq!(tree.expand(NodeId::ROOT, &mut policy), None);
        assert!(tree.is_fully_expanded(NodeId::ROOT));
    }

    #[test]
    fn test_backpropagate_touches_only_ancestors() {
        let mut tree = empty_tree();
        let mut policy = Scripted::first();
        let child = tree.expand(NodeId::ROOT, &mut policy).unwrap();
        let grandchild = tree.expand(child, &mut policy).unwrap();
        tree.backpropagate(grandchild, 0);

        let before: Vec<(u32, u32)> = (0..tree.len())
            .map(|i| (tree.nodes[i].visits, tree.nodes[i].wins))
            .collect();

        tree.backpropagate(grandchild, 1);

        let path = [NodeId::ROOT, child, grandchild];
        for i in 0..tree.len() {
            let node = &tree.nodes[i];
            if path.contains(&NodeId(i)) {
                assert_eq!(node.visits, before[i].0 + 1);
                assert_eq!(node.wins, before[i].1 + 1);
            } else {
                assert_eq!((node.visits, node.wins), before[i]);
            }
        }
    }

    #[test]
    fn test_select_child_exploitation_picks_best_ratio() {
        let mut tree = empty_tree();
        tree.expand(NodeId::ROOT, &mut Scripted::first());
        let children = tree.root().children.clone();

        let stats = [(4, 1), (4, 3), (0, 0), (8, 6), (2, 0), (0, 0), (1, 0)];
        for (&id, &(visits, wins)) in children.iter().zip(stats.iter()) {
            tree.node_mut(id).visits = visits;
            tree.node_mut(id).wins = wins;
        }
        tree.node_mut(NodeId::ROOT).visits = 19;

        // 3/4 and 6/8 tie; the earlier child wins the tie
        let best = tree
            .select_child(NodeId::ROOT, 0.0, UnvisitedPolicy::Worst)
            .unwrap();
        assert_eq!(best, children[1]);
    }

    #[test]
    fn test_select_child_unvisited_policies() {
        let mut tree = empty_tree();
        tree.expand(NodeId::ROOT, &mut Scripted::first());
        let children = tree.root().children.clone();

        assert_eq!(tree.select_child(NodeId::ROOT, 1.414, UnvisitedPolicy::Worst), None);

        tree.node_mut(children[2]).visits = 1;
        tree.node_mut(NodeId::ROOT).visits = 1;
        assert_eq!(
            tree.select_child(NodeId::ROOT, 1.414, UnvisitedPolicy::Worst),
            Some(children[2])
        );
        assert_eq!(
            tree.select_child(NodeId::ROOT, 1.414, UnvisitedPolicy::Best),
            Some(children[0])
        );
    }

    #[test]
    fn test_exploration_bonus_favours_rarely_visited() {
        let mut tree = empty_tree();
        tree.expand(NodeId::ROOT, &mut Scripted::first());
        let children = tree.root().children.clone();
        for &id in &children {
            tree.node_mut(id).visits = 10;
            tree.node_mut(id).wins = 5;
        }
        tree.node_mut(children[0]).wins = 6;
        tree.node_mut(children[4]).visits = 2;
        tree.node_mut(children[4]).wins = 1;
        tree.node_mut(NodeId::ROOT).visits = 62;

        assert_eq!(
            tree.select_child(NodeId::ROOT, 0.0, UnvisitedPolicy::Worst),
            Some(children[0])
        );
        assert_eq!(
            tree.select_child(NodeId::ROOT, 1.414, UnvisitedPolicy::Worst),
            Some(children[4])
        );
    }

    #[test]
    fn test_rollout_reaches_terminal_state() {
        let mut pos = Position::new(BoardConfig::default());
        rollout(&mut pos, &mut UniformRandom::with_seed(3));
        assert!(pos.is_terminal());
    }

    #[test]
    fn test_zero_sims_returns_none() {
        let mut tree = empty_tree();
        let mut policy = UniformRandom::with_seed(1);
        let best = tree_search(&mut tree, 0, 1.414, UnvisitedPolicy::Worst, &mut policy);
        assert_eq!(best, None);
        assert_eq!(tree.root().visits, 0);
    }

    #[test]
    fn test_tree_search_counts_every_iteration_at_root() {
        let mut tree = empty_tree();
        let mut policy = UniformRandom::with_seed(11);
        let best = tree_search(&mut tree, 50, 1.414, UnvisitedPolicy::Best, &mut policy).unwrap();
        assert_eq!(tree.root().visits, 50);
        assert!(tree.node(best).mv.unwrap() < 7);
        // Unvisited children are tried first, so every root child got a visit
        assert!(tree.root().children.iter().all(|&c| tree.node(c).visits > 0));
    }

    #[test]
    fn test_tree_search_finds_immediate_win() {
        // X to move; column 3 completes the bottom row
        let config = BoardConfig::default();
        let board = Board::from_rows(
            config,
            &[
                ".......", ".......", ".......", ".......", "OOO....", "XXX....",
            ],
        )
        .unwrap();
        let mut tree = Tree::new(Position::from_board(board, Player::X));
        let mut policy = UniformRandom::with_seed(5);
        let best = tree_search(&mut tree, 2000, 1.414, UnvisitedPolicy::Best, &mut policy).unwrap();
        assert_eq!(tree.node(best).mv, Some(3));
    }
}

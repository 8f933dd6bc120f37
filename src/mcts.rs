//! Monte Carlo Tree Search (MCTS) with UCB1 selection.
//!
//! Each iteration runs the usual four phases:
//! - Selection: descend from the root through fully expanded nodes, picking
//!   the child with the highest UCB1 score
//! - Expansion: add one child for the next untried candidate move
//! - Simulation: play a win-first random rollout from the new node
//! - Backpropagation: add the result to every node on the path to the root
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. A node does
//! not store its board; the board for a node is rebuilt by replaying the
//! moves along the selection path from the root position.
//!
//! Rewards are kept in one frame for the whole tree. A simulation result is
//! first expressed for [`REWARD_PLAYER`] (1.0 win, 0.0 loss, 0.5 draw) and
//! flipped once if the root player is the other side, so stored rewards are
//! from the root player's point of view.
//!
//! Selection departs from plain UCB1 on the stored mean: the exploitation
//! term is read from the point of view of the side choosing at the parent,
//! so at the opponent's nodes it is `1 - mean`.
//!
//! The final choice is the most visited root child, except that a child
//! whose move completes five for the root player is always preferred. Win-first
//! rollouts make most replies look won once a five is on offer, so visit
//! counts alone cannot separate the immediate win from the rest.

use fastrand::Rng;
use tracing::{debug, trace};

use crate::board::{Board, GameOutcome, Move, Player, vertex};
use crate::config::MctsConfig;
use crate::constants::DRAW_REWARD;
use crate::movegen::generate;
use crate::playout::rollout;

/// The side simulation results are first scored for.
pub const REWARD_PLAYER: Player = Player::White;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node (`None` for the root)
    pub parent: Option<NodeId>,
    /// Move that led here from the parent
    pub mv: Option<Move>,
    /// Side to move at this node
    pub to_move: Player,
    /// Expanded children, in expansion order
    pub children: Vec<NodeId>,
    /// Candidate moves not yet expanded, stored so that `pop` yields them
    /// in row-major order
    untried: Vec<Move>,
    /// Number of backpropagation passes through this node
    pub visits: u32,
    /// Sum of rewards (root player's point of view)
    pub reward: f64,
    /// Known result if the game is over at this node
    pub terminal: Option<GameOutcome>,
}

impl MctsNode {
    fn new(
        parent: Option<NodeId>,
        mv: Option<Move>,
        to_move: Player,
        board: &Board,
        terminal: Option<GameOutcome>,
        radius: usize,
    ) -> Self {
        let untried = if terminal.is_some() {
            Vec::new()
        } else {
            let mut moves = generate(board, radius);
            moves.reverse();
            moves
        };
        Self {
            parent,
            mv,
            to_move,
            children: Vec::new(),
            untried,
            visits: 0,
            reward: 0.0,
            terminal,
        }
    }

    /// Average reward, or `None` if never visited.
    #[inline]
    pub fn mean_reward(&self) -> Option<f64> {
        (self.visits > 0).then(|| self.reward / self.visits as f64)
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// Candidate moves still waiting to be expanded, next one last.
    pub fn untried(&self) -> &[Move] {
        &self.untried
    }
}

/// Reward of a finished (or abandoned) simulation for the root player.
pub fn reward_for(outcome: GameOutcome, root_player: Player) -> f64 {
    let result = match outcome {
        GameOutcome::Win(p) if p == REWARD_PLAYER => 1.0,
        GameOutcome::Win(_) => 0.0,
        GameOutcome::Draw | GameOutcome::InProgress => DRAW_REWARD,
    };
    if root_player == REWARD_PLAYER {
        result
    } else {
        1.0 - result
    }
}

/// Search tree built for a single move decision.
pub struct MctsTree {
    nodes: Vec<MctsNode>,
    root_board: Board,
    root_player: Player,
    radius: usize,
}

impl MctsTree {
    /// Create a tree rooted at `board` with `to_move` to play.
    pub fn new(board: &Board, to_move: Player, radius: usize) -> Self {
        let terminal = match board.outcome() {
            GameOutcome::InProgress => None,
            decided => Some(decided),
        };
        let root = MctsNode::new(None, None, to_move, board, terminal, radius);
        Self {
            nodes: vec![root],
            root_board: board.clone(),
            root_player: to_move,
            radius,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// All nodes, root first.
    pub fn arena(&self) -> &[MctsNode] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// UCB1 score of `child` as seen by the side choosing at its parent.
    fn ucb1(&self, child: &MctsNode, chooser: Player, ln_parent: f64, c: f64) -> f64 {
        let Some(mean) = child.mean_reward() else {
            return f64::INFINITY;
        };
        let mean = if chooser == self.root_player {
            mean
        } else {
            1.0 - mean
        };
        mean + c * (ln_parent / child.visits as f64).sqrt()
    }

    /// Child with the highest UCB1 score; the earliest child wins ties.
    fn select_child(&self, id: NodeId, c: f64) -> Option<NodeId> {
        let node = self.get(id);
        let ln_parent = (node.visits.max(1) as f64).ln();
        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let score = self.ucb1(self.get(child_id), node.to_move, ln_parent, c);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((child_id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Walk down from the root, replaying moves onto `board`.
    fn select(&self, board: &mut Board, c: f64) -> NodeId {
        let mut id = self.root();
        loop {
            let node = self.get(id);
            if node.is_terminal() || !node.is_fully_expanded() {
                return id;
            }
            let Some(child) = self.select_child(id, c) else {
                return id;
            };
            if let Some(mv) = self.get(child).mv {
                board.apply(mv, node.to_move);
            }
            id = child;
        }
    }

    /// Add a child for the next untried move of `id`, playing it on `board`.
    /// Returns `id` unchanged if there is nothing to expand.
    fn expand(&mut self, id: NodeId, board: &mut Board) -> NodeId {
        let node = self.get(id);
        if node.is_terminal() {
            return id;
        }
        let mover = node.to_move;
        let Some(mv) = self.get_mut(id).untried.pop() else {
            return id;
        };

        board.apply(mv, mover);
        let terminal = if board.win_at(mv, mover) {
            Some(GameOutcome::Win(mover))
        } else if board.is_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        };

        let child_id = NodeId(self.nodes.len() as u32);
        let child = MctsNode::new(
            Some(id),
            Some(mv),
            mover.opponent(),
            board,
            terminal,
            self.radius,
        );
        self.nodes.push(child);
        self.get_mut(id).children.push(child_id);
        child_id
    }

    /// Add `reward` to every node from `id` up to and including the root.
    fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.visits += 1;
            node.reward += reward;
            current = node.parent;
        }
    }

    /// Run one select/expand/simulate/backpropagate pass.
    pub fn iterate(&mut self, config: &MctsConfig, rng: &mut Rng) {
        let mut board = self.root_board.clone();
        let leaf = self.select(&mut board, config.exploration);
        let node_id = self.expand(leaf, &mut board);

        let node = self.get(node_id);
        let outcome = match node.terminal {
            Some(known) => known,
            None => rollout(
                &mut board,
                node.to_move,
                config.rollout_radius,
                config.rollout_steps,
                rng,
            ),
        };
        let reward = reward_for(outcome, self.root_player);
        self.backpropagate(node_id, reward);

        trace!(node = node_id.0, ?outcome, reward, "MCTS iteration complete");
    }

    /// Run `config.iterations` passes.
    pub fn run(&mut self, config: &MctsConfig, rng: &mut Rng) {
        for _ in 0..config.iterations {
            self.iterate(config, rng);
        }
    }

    /// Most visited root child; the earliest child wins ties.
    pub fn best_child(&self) -> Option<NodeId> {
        let mut best: Option<(NodeId, u32)> = None;
        for &id in &self.get(self.root()).children {
            let visits = self.get(id).visits;
            if best.is_none_or(|(_, v)| visits > v) {
                best = Some((id, visits));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Root child whose move wins outright for the root player.
    pub fn winning_child(&self) -> Option<NodeId> {
        let win = Some(GameOutcome::Win(self.root_player));
        self.get(self.root())
            .children
            .iter()
            .copied()
            .find(|&id| self.get(id).terminal == win)
    }

    /// The move to play: an immediate win if the tree found one, otherwise
    /// the most visited child.
    pub fn chosen_child(&self) -> Option<NodeId> {
        self.winning_child().or_else(|| self.best_child())
    }

    pub fn best_move(&self) -> Option<Move> {
        self.chosen_child().and_then(|id| self.get(id).mv)
    }
}

/// Result of an MCTS move decision.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsOutcome {
    pub best_move: Option<Move>,
    /// Iterations run
    pub iterations: u32,
    /// Visits recorded at the root
    pub root_visits: u32,
    /// Nodes in the tree when the search stopped
    pub nodes: usize,
    /// Mean reward of the chosen child, if one was chosen from the tree
    pub win_rate: Option<f64>,
}

/// Pick a move for `player` with MCTS.
///
/// Falls back to a random candidate if the tree has no children.
pub fn choose(board: &Board, player: Player, config: &MctsConfig, rng: &mut Rng) -> MctsOutcome {
    let mut tree = MctsTree::new(board, player, config.radius);
    tree.run(config, rng);

    let best = tree.chosen_child();
    let win_rate = best.and_then(|id| tree.get(id).mean_reward());
    let best_move = match best.and_then(|id| tree.get(id).mv) {
        Some(mv) => Some(mv),
        None => {
            let moves = generate(board, config.radius);
            (!moves.is_empty()).then(|| moves[rng.usize(..moves.len())])
        }
    };

    log_children(&tree, board.size());
    let root = tree.get(tree.root());
    debug!(
        engine = "mcts",
        iterations = config.iterations,
        best_move = ?best_move,
        win_rate = ?win_rate,
        nodes = tree.len(),
        "MCTS search complete"
    );

    MctsOutcome {
        best_move,
        iterations: config.iterations,
        root_visits: root.visits,
        nodes: tree.len(),
        win_rate,
    }
}

/// Trace the statistics of the root's children.
fn log_children(tree: &MctsTree, size: usize) {
    for &id in &tree.get(tree.root()).children {
        let child = tree.get(id);
        if let Some(mv) = child.mv {
            trace!(
                mv = %vertex(mv, size),
                visits = child.visits,
                mean = child.mean_reward().unwrap_or(0.0),
                "root child"
            );
        }
    }
}

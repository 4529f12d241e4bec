use std::rc::Rc;
use std::time::{Duration, Instant};

use bit_set::BitSet;
use fastrand::Rng;

use crate::clique::{Graph, NodeId, VertexId};

/** a partial clique: a set of pairwise-adjacent dense vertex indices.
`take_action` returns a fresh state and never touches the predecessor, so
states already linked into the search tree stay valid. */
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliqueState {
    /// members of the clique (dense indices)
    members: BitSet,
}

impl CliqueState {
    /// the empty clique
    pub fn empty() -> Self { Self::default() }

    /// number of members
    pub fn len(&self) -> usize { self.members.len() }

    /// true iff the clique has no member
    pub fn is_empty(&self) -> bool { self.members.is_empty() }

    /// true iff dense index v is a member
    pub fn contains(&self, v:VertexId) -> bool { self.members.contains(v) }

    /// every vertex outside the clique that is adjacent to all its members
    pub fn possible_actions(&self, graph:&Graph) -> Vec<VertexId> {
        (0..graph.n())
            .filter(|v| !self.members.contains(*v))
            .filter(|v| self.members.iter().all(|u| graph.are_adjacent(*v, u)))
            .collect()
    }

    /// extends the clique with vertex v, as a new state
    pub fn take_action(&self, v:VertexId) -> Self {
        let mut next = self.clone();
        next.members.insert(v);
        next
    }

    /// true iff the clique is maximal (no possible action remains)
    pub fn is_terminal(&self, graph:&Graph) -> bool {
        !(0..graph.n())
            .any(|v| !self.members.contains(v)
                && self.members.iter().all(|u| graph.are_adjacent(v, u)))
    }

    /// reward of the state: the clique size
    pub fn reward(&self) -> usize { self.members.len() }

    /// members as external node ids, in dense-index order
    pub fn to_node_ids(&self, graph:&Graph) -> Vec<NodeId> {
        self.members.iter().map(|v| graph.id_of(v)).collect()
    }
}

/// stopping criterion of one inner search call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// wall-clock limit, polled once per iteration
    Time(Duration),
    /// fixed number of iterations (reproducible alternative to wall-clock)
    Iterations(usize),
}

/** MCTS parameter set */
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// exploration constant C of UCB1 (default 1/sqrt(2))
    pub exploration: f64,
    /// budget of one inner search call (default 1 second)
    pub budget: Budget,
    /// random seed for rollouts and tie breaking
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: std::f64::consts::FRAC_1_SQRT_2,
            budget: Budget::Time(Duration::from_secs(1)),
            seed: 0,
        }
    }
}

/// node of the search tree (indexes into the tree arena)
#[derive(Debug)]
struct Node {
    /// vertex added to reach this node (None for the root)
    action: Option<VertexId>,
    /// parent arena index (None for the root)
    parent: Option<usize>,
    /// children arena indices
    children: Vec<usize>,
    /// actions not yet expanded into children
    untried: Vec<VertexId>,
    /// terminal flag (no action at all from this node)
    terminal: bool,
    /// visit count
    visits: u64,
    /// accumulated rollout reward
    value: f64,
}

/// arena storage of the search tree; one fresh tree per inner search call
#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn new(root_actions:Vec<VertexId>) -> Self {
        let terminal = root_actions.is_empty();
        Self {
            nodes: vec![Node {
                action: None,
                parent: None,
                children: Vec::new(),
                untried: root_actions,
                terminal,
                visits: 0,
                value: 0.0,
            }],
        }
    }

    fn add_child(&mut self, parent:usize, action:VertexId, untried:Vec<VertexId>) -> usize {
        let index = self.nodes.len();
        let terminal = untried.is_empty();
        self.nodes.push(Node {
            action: Some(action),
            parent: Some(parent),
            children: Vec::new(),
            untried,
            terminal,
            visits: 0,
            value: 0.0,
        });
        self.nodes[parent].children.push(index);
        index
    }

    /// adds the reward to every node from `leaf` up to the root
    fn backpropagate(&mut self, leaf:usize, reward:f64) {
        let mut current = Some(leaf);
        while let Some(index) = current {
            self.nodes[index].visits += 1;
            self.nodes[index].value += reward;
            current = self.nodes[index].parent;
        }
    }
}

/** Monte Carlo tree search over clique-extension states.
The outer driver is greedy: from the empty clique, one bounded inner search
picks a single vertex, the clique is extended, and a fresh tree is grown for
the next step until the clique is maximal.
The inner search is plain UCT: UCB1 selection (random tie break), one
expansion per iteration, uniform random rollout to a maximal clique,
backpropagation of the rollout reward. The returned action is the root child
with the highest visit count.
*/
#[derive(Debug)]
pub struct MctsEngine {
    /// instance searched
    graph: Rc<Graph>,
    /// parameters
    config: MctsConfig,
    /// seeded random number generator
    rng: Rng,
}

impl MctsEngine {
    /// creates an engine on the given instance
    pub fn new(graph:Rc<Graph>, config:MctsConfig) -> Self {
        let rng = Rng::with_seed(config.seed);
        Self { graph, config, rng }
    }

    /// greedy outer driver: repeatedly searches one action and applies it
    /// until the clique is maximal
    pub fn run(&mut self) -> CliqueState {
        let mut state = CliqueState::empty();
        while let Some(action) = self.search(&state) {
            state = state.take_action(action);
        }
        state
    }

    /** one bounded inner search from `root_state`.
    Returns the chosen action, or None when the state is already terminal. */
    pub fn search(&mut self, root_state:&CliqueState) -> Option<VertexId> {
        let root_actions = root_state.possible_actions(&self.graph);
        if root_actions.is_empty() {
            return None; // already a maximal clique
        }
        let mut tree = Tree::new(root_actions);
        let start = Instant::now();
        let mut nb_iter = 0;
        loop {
            match self.config.budget {
                Budget::Time(limit) => { if start.elapsed() >= limit { break; } }
                Budget::Iterations(limit) => { if nb_iter >= limit { break; } }
            }
            nb_iter += 1;
            self.execute_round(&mut tree, root_state);
        }
        // most visited root child (not best average value)
        tree.nodes[0].children.iter()
            .max_by_key(|c| tree.nodes[**c].visits)
            .and_then(|c| tree.nodes[*c].action)
    }

    /// one selection / expansion / simulation / backpropagation round
    fn execute_round(&mut self, tree:&mut Tree, root_state:&CliqueState) {
        // selection: descend through fully-expanded nodes with UCB1
        let mut index = 0;
        let mut state = root_state.clone();
        while tree.nodes[index].untried.is_empty() && !tree.nodes[index].terminal {
            index = self.select_ucb(tree, index);
            let action = tree.nodes[index].action
                .expect("non-root nodes carry the action that reached them");
            state = state.take_action(action);
        }
        // expansion: materialize one untried action
        if !tree.nodes[index].terminal {
            let pick = self.rng.usize(0..tree.nodes[index].untried.len());
            let action = tree.nodes[index].untried.swap_remove(pick);
            state = state.take_action(action);
            index = tree.add_child(index, action, state.possible_actions(&self.graph));
        }
        // simulation: uniform random rollout to a maximal clique
        let mut rollout = state;
        loop {
            let actions = rollout.possible_actions(&self.graph);
            if actions.is_empty() { break; }
            let action = actions[self.rng.usize(0..actions.len())];
            rollout = rollout.take_action(action);
        }
        // backpropagation
        tree.backpropagate(index, rollout.reward() as f64);
    }

    /// child of `parent` maximizing UCB1, ties broken uniformly at random
    fn select_ucb(&mut self, tree:&Tree, parent:usize) -> usize {
        let parent_visits = tree.nodes[parent].visits as f64;
        let exploration = self.config.exploration;
        let mut best_score = f64::NEG_INFINITY;
        let mut best:Vec<usize> = Vec::new();
        for child in &tree.nodes[parent].children {
            let node = &tree.nodes[*child];
            let visits = node.visits as f64;
            let score = node.value / visits
                + exploration * (2.0 * parent_visits.ln() / visits).sqrt();
            if score > best_score {
                best_score = score;
                best.clear();
                best.push(*child);
            } else if score == best_score {
                best.push(*child);
            }
        }
        best[self.rng.usize(0..best.len())]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    /// triangle {0,1,2} plus the isolated vertex 3
    fn triangle_plus_isolated() -> Rc<Graph> {
        let mut g = Graph::new();
        for i in 0..4 { g.add_node(i); }
        g.add_edge(0,1);
        g.add_edge(0,2);
        g.add_edge(1,2);
        Rc::new(g)
    }

    fn iteration_config(seed:u64, nb_iter:usize) -> MctsConfig {
        MctsConfig {
            budget: Budget::Iterations(nb_iter),
            seed,
            ..MctsConfig::default()
        }
    }

    #[test]
    fn test_actions_from_empty_state() {
        let g = triangle_plus_isolated();
        let state = CliqueState::empty();
        assert_eq!(state.possible_actions(&g), vec![0,1,2,3]);
        assert!(!state.is_terminal(&g));
        assert_eq!(state.reward(), 0);
    }

    #[test]
    fn test_action_trace_on_triangle() {
        let g = triangle_plus_isolated();
        let s0 = CliqueState::empty();
        let s1 = s0.take_action(0);
        assert_eq!(s1.possible_actions(&g), vec![1,2]); // 3 excluded
        let s2 = s1.take_action(1);
        assert_eq!(s2.possible_actions(&g), vec![2]);
        let s3 = s2.take_action(2);
        assert!(s3.is_terminal(&g));
        assert_eq!(s3.reward(), 3);
        // predecessors untouched
        assert_eq!(s0.reward(), 0);
        assert_eq!(s1.reward(), 1);
        assert_eq!(s2.possible_actions(&g), vec![2]);
    }

    #[test]
    fn test_actions_keep_the_clique_invariant() {
        let g = triangle_plus_isolated();
        let mut state = CliqueState::empty();
        loop {
            let actions = state.possible_actions(&g);
            assert_eq!(actions.is_empty(), state.is_terminal(&g));
            if actions.is_empty() { break; }
            for a in &actions {
                let next = state.take_action(*a);
                assert_eq!(next.reward(), state.reward() + 1);
                // every extended state is pairwise adjacent
                for u in next.members.iter() {
                    for v in next.members.iter() {
                        if u < v { assert!(g.are_adjacent(u, v)); }
                    }
                }
            }
            state = state.take_action(actions[0]);
        }
    }

    #[test]
    fn test_isolated_vertex_never_selected() {
        let g = triangle_plus_isolated();
        let mut engine = MctsEngine::new(g.clone(), iteration_config(11, 500));
        let clique = engine.run();
        assert_eq!(clique.to_node_ids(&g), vec![0,1,2]);
        assert!(!clique.contains(3));
    }

    #[test]
    fn test_complete_graph_fully_collected() {
        let mut g = Graph::new();
        g.make_clique(&[0,1,2,3,4]);
        let graph = Rc::new(g);
        let mut engine = MctsEngine::new(graph.clone(), iteration_config(3, 200));
        let clique = engine.run();
        assert_eq!(clique.reward(), 5);
        assert_eq!(clique.to_node_ids(&graph), vec![0,1,2,3,4]);
    }

    #[test]
    fn test_terminal_root_short_circuits() {
        let g = triangle_plus_isolated();
        let terminal = CliqueState::empty()
            .take_action(0).take_action(1).take_action(2);
        let mut engine = MctsEngine::new(g, iteration_config(0, 100));
        assert_eq!(engine.search(&terminal), None);
    }

    #[test]
    fn test_empty_graph_terminal_immediately() {
        let graph = Rc::new(Graph::new());
        let state = CliqueState::empty();
        assert!(state.is_terminal(&graph));
        let mut engine = MctsEngine::new(graph, iteration_config(0, 100));
        let clique = engine.run();
        assert!(clique.is_empty());
    }

    #[test]
    fn test_reproducible_with_iteration_budget() {
        let mut g = Graph::new();
        g.make_clique(&[0,2,5,14,17,18,19]);
        g.make_clique(&[1,3,4,6,10,13]);
        g.make_clique(&[3,5,6,17]);
        g.add_edge(0,16);
        let graph = Rc::new(g);
        let run_a = MctsEngine::new(graph.clone(), iteration_config(21, 300)).run();
        let run_b = MctsEngine::new(graph.clone(), iteration_config(21, 300)).run();
        assert_eq!(run_a, run_b);
        assert_eq!(
            crate::clique::checker(&graph, &run_a.to_node_ids(&graph)),
            crate::clique::CheckerResult::Ok(run_a.reward())
        );
    }

    #[test]
    fn test_time_budget_terminates() {
        let mut g = Graph::new();
        g.make_clique(&[0,1,2,3,4,5,6,7]);
        let graph = Rc::new(g);
        let config = MctsConfig {
            budget: Budget::Time(Duration::from_millis(10)),
            seed: 1,
            ..MctsConfig::default()
        };
        let clique = MctsEngine::new(graph.clone(), config).run();
        assert_eq!(clique.reward(), 8);
    }
}

use std::collections::HashMap;

use bit_set::BitSet;

/** external node identifier (as given by the caller, not necessarily contiguous) */
pub type NodeId = usize;

/** dense vertex index (0..n, assigned in insertion order) */
pub type VertexId = usize;

/** Solution of a maximum clique problem
(represented as a list of external node ids).
*/
pub type Solution = Vec<NodeId>;

/** models an undirected clique-search instance.
Node ids are arbitrary integers; internally every node gets a dense index
in insertion order. Bit-vector encodings and the search engines work on the
dense indices; solutions are reported with the external ids.
The graph is mutable during construction only: the engines take it read-only.
*/
#[derive(Debug, Default)]
pub struct Graph {
    /// ids[i]: external id of the i-th inserted node
    ids: Vec<NodeId>,
    /// dense index of each external id
    index_of: HashMap<NodeId, VertexId>,
    /// nb edges
    m: usize,
    /// adj_list[i]: list of dense indices adjacent to i
    adj_list: Vec<Vec<VertexId>>,
    /// adj_matrix[i]: bitset of the neighbors of i
    adj_matrix: Vec<BitSet>,
}

impl Graph {

    /// creates an empty graph
    pub fn new() -> Self { Self::default() }

    /// number of vertices
    pub fn n(&self) -> usize { self.ids.len() }

    /// number of edges
    pub fn m(&self) -> usize { self.m }

    /** inserts a node and returns its dense index.
    Inserting an existing id is a no-op (the existing index is returned). */
    pub fn add_node(&mut self, id:NodeId) -> VertexId {
        match self.index_of.get(&id) {
            Some(i) => *i,
            None => {
                let i = self.ids.len();
                self.ids.push(id);
                self.index_of.insert(id, i);
                self.adj_list.push(Vec::new());
                self.adj_matrix.push(BitSet::default());
                i
            }
        }
    }

    /** inserts the edge (u,v), creating missing endpoints.
    No-op on self-loops and already-existing edges. */
    pub fn add_edge(&mut self, u:NodeId, v:NodeId) {
        if u == v { return; }
        let a = self.add_node(u);
        let b = self.add_node(v);
        if self.adj_matrix[a].contains(b) { return; }
        self.adj_matrix[a].insert(b);
        self.adj_matrix[b].insert(a);
        self.adj_list[a].push(b);
        self.adj_list[b].push(a);
        self.m += 1;
    }

    /** inserts every missing pairwise edge among `nodes` (idempotent,
    self-pairs skipped). */
    pub fn make_clique(&mut self, nodes:&[NodeId]) {
        for u in nodes {
            for v in nodes {
                self.add_edge(*u, *v);
            }
        }
    }

    /// returns true iff the edge (u,v) exists. O(1). Unknown ids see no edges.
    pub fn has_edge(&self, u:NodeId, v:NodeId) -> bool {
        match (self.index_of.get(&u), self.index_of.get(&v)) {
            (Some(a), Some(b)) => self.adj_matrix[*a].contains(*b),
            _ => false
        }
    }

    /// external ids adjacent to node `u`
    pub fn neighbors(&self, u:NodeId) -> Vec<NodeId> {
        match self.index_of.get(&u) {
            None => Vec::new(),
            Some(a) => self.adj_list[*a].iter().map(|b| self.ids[*b]).collect()
        }
    }

    /// external node ids in insertion order
    pub fn node_ids(&self) -> &[NodeId] { &self.ids }

    /// dense index of an external id (if it exists)
    pub fn index_of(&self, id:NodeId) -> Option<VertexId> {
        self.index_of.get(&id).copied()
    }

    /// external id of a dense index
    pub fn id_of(&self, i:VertexId) -> NodeId { self.ids[i] }

    /// list of dense indices adjacent to dense index i
    pub fn adj(&self, i:VertexId) -> &Vec<VertexId> { &self.adj_list[i] }

    /// degree of dense index i
    pub fn degree(&self, i:VertexId) -> usize { self.adj_list[i].len() }

    /// returns true iff dense indices a and b are adjacent. O(1)
    pub fn are_adjacent(&self, a:VertexId, b:VertexId) -> bool {
        self.adj_matrix[a].contains(b)
    }

    /// print statistics of the instance
    pub fn display_statistics(&self) {
        println!("\t{} \t vertices", self.n());
        println!("\t{} \t edges", self.m());
        if self.n() > 0 {
            let degrees:Vec<usize> = (0..self.n()).map(|i| self.degree(i)).collect();
            println!("\t{} \t min degree", degrees.iter().min().unwrap());
            println!("\t{} \t max degree", degrees.iter().max().unwrap());
        }
    }
}

/// result of checking a clique solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerResult {
    /// the solution is a valid clique (contains its size)
    Ok(usize),
    /// a listed node does not exist in the graph
    UnknownNode(NodeId),
    /// a node appears more than once
    DuplicateNode(NodeId),
    /// two members are not adjacent
    MissingEdge(NodeId, NodeId),
}

/**
checks that a solution is a clique of the graph.
returns the clique size if it is feasible, the violation otherwise.
*/
pub fn checker(graph:&Graph, sol:&[NodeId]) -> CheckerResult {
    // check that all members exist and are distinct
    let mut visited: BitSet = BitSet::default();
    for v in sol {
        match graph.index_of(*v) {
            None => { return CheckerResult::UnknownNode(*v); }
            Some(i) => {
                if visited.contains(i) {
                    return CheckerResult::DuplicateNode(*v);
                }
                visited.insert(i);
            }
        }
    }
    // check pairwise adjacency
    for v1 in sol {
        for v2 in sol {
            if v1 < v2 && !graph.has_edge(*v1, *v2) {
                return CheckerResult::MissingEdge(*v1, *v2);
            }
        }
    }
    CheckerResult::Ok(sol.len())
}

use std::fmt;

use crate::clique::{Graph, VertexId};

/** fitness scalar maximized by the genetic algorithm */
pub type Fitness = i64;

/// violation of the bit-vector input contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// the bit vector length does not match the number of vertices
    InvalidEncoding {
        /// number of vertices in the graph
        expected: usize,
        /// length of the bit vector given
        got: usize,
    },
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingError::InvalidEncoding { expected, got } =>
                write!(f, "invalid encoding: expected {} genes, got {}", expected, got),
        }
    }
}

impl std::error::Error for EncodingError {}

/** builds the greedy online bucket partition of the set bits.
Bits are processed in increasing index order (bit i denotes the i-th
inserted vertex). Each set vertex is appended to EVERY existing bucket whose
members it is fully adjacent to; if none qualifies, a new bucket is opened.
Buckets are therefore not guaranteed disjoint: a vertex may count toward
several buckets at once. The GA fitness landscape depends on this, so it is
kept as is.
Fails with `InvalidEncoding` when the vector length differs from the vertex
count.
*/
pub fn partition(graph:&Graph, genes:&[bool]) -> Result<Vec<Vec<VertexId>>, EncodingError> {
    if genes.len() != graph.n() {
        return Err(EncodingError::InvalidEncoding { expected: graph.n(), got: genes.len() });
    }
    let mut buckets:Vec<Vec<VertexId>> = vec![Vec::new()];
    for (i, gene) in genes.iter().enumerate() {
        if !*gene { continue; }
        let mut placed = false;
        let nb_buckets = buckets.len(); // the bucket possibly opened below is not a candidate for i
        for bucket in buckets.iter_mut().take(nb_buckets) {
            if bucket.iter().all(|v| graph.are_adjacent(i, *v)) {
                bucket.push(i);
                placed = true;
            }
        }
        if !placed {
            buckets.push(vec![i]);
        }
    }
    Ok(buckets)
}

/** scores a bit-vector encoding: `10*max_size - (on_count - max_size)` where
`max_size` is the size of the largest greedy bucket and `on_count` the number
of set bits. Deterministic, the graph is not modified. */
pub fn evaluate(graph:&Graph, genes:&[bool]) -> Result<Fitness, EncodingError> {
    let buckets = partition(graph, genes)?;
    let max_size = buckets.iter().map(|b| b.len()).max().unwrap_or(0) as Fitness;
    let on_count = genes.iter().filter(|g| **g).count() as Fitness;
    Ok(10 * max_size - (on_count - max_size))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::clique::Graph;

    fn k5() -> Graph {
        let mut g = Graph::new();
        g.make_clique(&[0,1,2,3,4]);
        g
    }

    #[test]
    fn test_complete_graph_all_ones() {
        let g = k5();
        let genes = vec![true;5];
        assert_eq!(evaluate(&g, &genes), Ok(50));
    }

    #[test]
    fn test_stray_bit_penalized() {
        // triangle {0,1,2} plus isolated vertex 3
        let mut g = Graph::new();
        for i in 0..4 { g.add_node(i); }
        g.make_clique(&[0,1,2]);
        assert_eq!(evaluate(&g, &[true,true,true,false]), Ok(30));
        // 3 lands in its own bucket and costs 1
        assert_eq!(evaluate(&g, &[true,true,true,true]), Ok(29));
        // empty selection: one empty bucket, score 0
        assert_eq!(evaluate(&g, &[false;4].to_vec()), Ok(0));
    }

    #[test]
    fn test_largest_bucket_is_a_clique() {
        // two triangles sharing vertex 2: {0,1,2} and {2,3,4}
        let mut g = Graph::new();
        g.make_clique(&[0,1,2]);
        g.make_clique(&[2,3,4]);
        let genes = vec![true;5];
        let buckets = partition(&g, &genes).unwrap();
        for bucket in &buckets {
            for a in bucket {
                for b in bucket {
                    if a < b { assert!(g.are_adjacent(*a, *b)); }
                }
            }
        }
    }

    #[test]
    fn test_bucket_overlap_preserved() {
        // path 0-1, 1-2: vertex 1 joins both {0}'s bucket and {2} never forms;
        // processing order 0,1,2: 0 -> bucket0, 1 adjacent to 0 -> bucket0,
        // 2 not adjacent to 0 -> new bucket; then nothing overlaps here.
        // overlap case: star center 2 adjacent to 0 and 1, 0-1 not adjacent.
        let mut g = Graph::new();
        for i in 0..3 { g.add_node(i); }
        g.add_edge(0,2);
        g.add_edge(1,2);
        let buckets = partition(&g, &[true,true,true]).unwrap();
        // 0 -> bucket0; 1 not adjacent to 0 -> bucket1; 2 adjacent to both -> joins both
        assert_eq!(buckets, vec![vec![0,2], vec![1,2]]);
        assert_eq!(evaluate(&g, &[true,true,true]), Ok(19));
    }

    #[test]
    fn test_deterministic_and_pure() {
        let g = k5();
        let genes = vec![true,false,true,true,false];
        let a = evaluate(&g, &genes).unwrap();
        let b = evaluate(&g, &genes).unwrap();
        assert_eq!(a, b);
        assert_eq!(g.n(), 5);
        assert_eq!(g.m(), 10);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let g = k5();
        assert_eq!(
            evaluate(&g, &[true,true]),
            Err(EncodingError::InvalidEncoding { expected:5, got:2 })
        );
    }

    #[test]
    fn test_empty_graph() {
        let g = Graph::new();
        assert_eq!(evaluate(&g, &[]), Ok(0));
    }
}

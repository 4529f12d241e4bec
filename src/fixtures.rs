use crate::clique::Graph;

/** builds the 60-vertex demo instance used by the GA executable:
five overlapping planted cliques plus sparse extra edges. */
pub fn ga_demo_graph() -> Graph {
    let mut g = Graph::new();
    for i in 0..60 { g.add_node(i); }
    g.make_clique(&[0, 2, 5, 14, 17, 18, 19, 36, 30, 25, 55, 57, 49]);
    g.make_clique(&[1, 3, 4, 6, 10, 13, 20, 22, 25, 34, 37, 38, 39, 52, 58]);
    g.make_clique(&[1, 43, 4, 6, 30, 53, 56]);
    g.make_clique(&[3, 5, 6, 17, 50, 51]);
    g.make_clique(&[2, 11, 55, 17, 29, 12, 57]);
    for (u,v) in [
        (0,16), (13,15), (13,12), (20,22), (40,21), (44,26), (54,37),
        (41,23), (35,22), (13,1), (3,59), (1,2), (4,36), (41,23),
        (5,12), (6,34), (7,15), (7,8), (9,30), (10,46), (10,11),
        (24,31), (27,31), (28,11), (29,32), (42,33), (48,33), (42,45),
        (47,45), (49,45), (24,7), (26,7), (26,24), (47,16), (59,33),
        (45,21), (41,19),
    ].iter() {
        g.add_edge(*u, *v);
    }
    g
}

/** builds the 20-vertex demo instance used by the MCTS executable:
three planted cliques plus a few extra edges. */
pub fn mcts_demo_graph() -> Graph {
    let mut g = Graph::new();
    for i in 0..20 { g.add_node(i); }
    g.make_clique(&[0, 2, 5, 14, 17, 18, 19]);
    g.make_clique(&[1, 3, 4, 6, 10, 13]);
    g.make_clique(&[3, 5, 6, 17]);
    g.add_edge(0, 16);
    g.add_edge(13, 15);
    g.add_edge(13, 12);
    g
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::clique::{checker, CheckerResult};

    #[test]
    fn test_ga_demo_graph() {
        let g = ga_demo_graph();
        assert_eq!(g.n(), 60);
        // the planted 15-clique is a clique
        assert_eq!(
            checker(&g, &[1, 3, 4, 6, 10, 13, 20, 22, 25, 34, 37, 38, 39, 52, 58]),
            CheckerResult::Ok(15)
        );
        assert!(g.has_edge(0, 16));
        assert!(!g.has_edge(0, 1));
    }

    #[test]
    fn test_mcts_demo_graph() {
        let g = mcts_demo_graph();
        assert_eq!(g.n(), 20);
        assert_eq!(
            checker(&g, &[0, 2, 5, 14, 17, 18, 19]),
            CheckerResult::Ok(7)
        );
        assert_eq!(checker(&g, &[3, 5, 6, 17]), CheckerResult::Ok(4));
        assert!(!g.has_edge(0, 1));
    }
}

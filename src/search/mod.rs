//! Search engines for the maximum clique problem.

/// genetic algorithm over bit-vector encodings
pub mod ga;

/// monte carlo tree search over clique-extension states
pub mod mcts;

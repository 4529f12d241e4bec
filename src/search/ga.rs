use std::rc::Rc;

use fastrand::Rng;

use crate::clique::{Graph, NodeId};
use crate::eval::{evaluate, Fitness};

/** a candidate solution: one membership gene per graph vertex
(gene i flags the i-th inserted vertex), plus a cached fitness.
The cache is cleared whenever an operator touches the genes. */
#[derive(Debug, Clone)]
pub struct Individual {
    /// membership genes, indexed by dense vertex index
    genes: Vec<bool>,
    /// cached fitness (None when stale)
    fitness: Option<Fitness>,
}

impl Individual {
    /// draws an individual with each gene Bernoulli(0.5)
    pub fn random(nb_genes:usize, rng:&mut Rng) -> Self {
        Self {
            genes: (0..nb_genes).map(|_| rng.bool()).collect(),
            fitness: None,
        }
    }

    /// membership genes
    pub fn genes(&self) -> &[bool] { &self.genes }

    /// cached fitness (None when stale)
    pub fn fitness(&self) -> Option<Fitness> { self.fitness }

    /// external ids of the vertices this individual selects
    pub fn selected_nodes(&self, graph:&Graph) -> Vec<NodeId> {
        self.genes.iter().enumerate()
            .filter(|(_,g)| **g)
            .map(|(i,_)| graph.id_of(i))
            .collect()
    }
}

/// selects one parent from an evaluated population
pub trait Selection: std::fmt::Debug {
    /// returns the index of the selected individual
    fn select(&self, population:&[Individual], rng:&mut Rng) -> usize;
}

/// recombines two mates in place, invalidating their fitness
pub trait Crossover: std::fmt::Debug {
    /// mates a and b
    fn mate(&self, a:&mut Individual, b:&mut Individual, rng:&mut Rng);
}

/// mutates one individual in place
pub trait Mutation: std::fmt::Debug {
    /// mutates the individual, invalidating its fitness if a gene changed
    fn mutate(&self, individual:&mut Individual, rng:&mut Rng);
}

/** tournament selection: draws `size` contenders with replacement and keeps
the fittest (first drawn on ties) */
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    /// number of contenders per tournament
    pub size: usize,
}

impl Selection for TournamentSelection {
    fn select(&self, population:&[Individual], rng:&mut Rng) -> usize {
        let mut best = rng.usize(0..population.len());
        for _ in 1..self.size {
            let challenger = rng.usize(0..population.len());
            if population[challenger].fitness > population[best].fitness {
                best = challenger;
            }
        }
        best
    }
}

/** two-point crossover: swaps the gene segment between two cut points */
#[derive(Debug, Clone)]
pub struct TwoPointCrossover;

impl Crossover for TwoPointCrossover {
    fn mate(&self, a:&mut Individual, b:&mut Individual, rng:&mut Rng) {
        let nb_genes = a.genes.len();
        if nb_genes >= 2 {
            let mut cut1 = rng.usize(1..=nb_genes);
            let mut cut2 = rng.usize(1..=nb_genes-1);
            if cut2 >= cut1 { cut2 += 1; } else { std::mem::swap(&mut cut1, &mut cut2); }
            for i in cut1..cut2 {
                std::mem::swap(&mut a.genes[i], &mut b.genes[i]);
            }
        }
        a.fitness = None;
        b.fitness = None;
    }
}

/** bit-flip mutation: flips each gene independently with probability `gene_pb` */
#[derive(Debug, Clone)]
pub struct FlipBitMutation {
    /// per-gene flip probability
    pub gene_pb: f64,
}

impl Mutation for FlipBitMutation {
    fn mutate(&self, individual:&mut Individual, rng:&mut Rng) {
        let mut flipped = false;
        for gene in individual.genes.iter_mut() {
            if rng.f64() < self.gene_pb {
                *gene = !*gene;
                flipped = true;
            }
        }
        if flipped {
            individual.fitness = None;
        }
    }
}

/** GA parameter set */
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// number of individuals (default 100)
    pub population_size: usize,
    /// number of generations (default 50)
    pub nb_generations: usize,
    /// probability that a consecutive pair of offspring mates (default 0.5)
    pub cx_pb: f64,
    /// probability that an offspring is mutated (default 0.2)
    pub mut_pb: f64,
    /// per-gene flip probability of the mutation operator (default 0.05)
    pub gene_pb: f64,
    /// tournament size of the selection operator (default 3)
    pub tournament_size: usize,
    /// random seed
    pub seed: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            nb_generations: 50,
            cx_pb: 0.5,
            mut_pb: 0.2,
            gene_pb: 0.05,
            tournament_size: 3,
            seed: 0,
        }
    }
}

/** per-generation population statistics */
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    /// generation number (1-based)
    pub generation: usize,
    /// number of stale individuals re-evaluated this generation
    pub nb_evaluated: usize,
    /// minimum fitness in the population
    pub min: Fitness,
    /// maximum fitness in the population
    pub max: Fitness,
    /// arithmetic mean fitness
    pub mean: f64,
    /// population standard deviation: sqrt(|mean(f²) - mean(f)²|)
    pub std: f64,
}

/** outcome of a GA run */
#[derive(Debug)]
pub struct GaResult {
    /// fittest individual of the final population (earliest index on ties)
    pub best: Individual,
    /// its fitness
    pub best_fitness: Fitness,
    /// statistics of every generation
    pub stats: Vec<GenerationStats>,
}

/** generational genetic algorithm over bit-vector encodings.
Selection fills a mating pool of population size (with replacement); the
pool is cloned, consecutive pairs possibly mate, each offspring is possibly
mutated; only stale individuals are re-scored; the offspring entirely
replace the population (no elitism). Termination is a fixed generation
count, there is no time-based stopping.
*/
#[derive(Debug)]
pub struct GaEngine {
    /// instance searched
    graph: Rc<Graph>,
    /// parameters
    config: GaConfig,
    /// selection strategy
    selection: Box<dyn Selection>,
    /// crossover strategy
    crossover: Box<dyn Crossover>,
    /// mutation strategy
    mutation: Box<dyn Mutation>,
    /// seeded random number generator
    rng: Rng,
    /// print per-generation statistics
    verbose: bool,
}

impl GaEngine {
    /// creates an engine with the standard operators
    /// (tournament / two-point / flip-bit)
    pub fn new(graph:Rc<Graph>, config:GaConfig, verbose:bool) -> Self {
        let selection = Box::new(TournamentSelection { size: config.tournament_size });
        let crossover = Box::new(TwoPointCrossover);
        let mutation = Box::new(FlipBitMutation { gene_pb: config.gene_pb });
        Self::with_operators(graph, config, selection, crossover, mutation, verbose)
    }

    /// creates an engine with custom operators
    pub fn with_operators(
        graph:Rc<Graph>,
        config:GaConfig,
        selection:Box<dyn Selection>,
        crossover:Box<dyn Crossover>,
        mutation:Box<dyn Mutation>,
        verbose:bool,
    ) -> Self {
        let rng = Rng::with_seed(config.seed);
        Self { graph, config, selection, crossover, mutation, rng, verbose }
    }

    /// runs the evolution and returns the final best individual
    pub fn run(&mut self) -> GaResult {
        let nb_genes = self.graph.n();
        let mut population:Vec<Individual> = (0..self.config.population_size)
            .map(|_| Individual::random(nb_genes, &mut self.rng))
            .collect();
        let nb_init = Self::evaluate_stale(&self.graph, &mut population);
        if self.verbose {
            println!("Start of evolution");
            println!("  Evaluated {} individuals", nb_init);
        }
        let mut stats = Vec::with_capacity(self.config.nb_generations);
        for generation in 1..=self.config.nb_generations {
            // mating pool: tournament selection with replacement, then cloned
            let mut offspring:Vec<Individual> = (0..population.len())
                .map(|_| {
                    let i = self.selection.select(&population, &mut self.rng);
                    population[i].clone()
                })
                .collect();
            // crossover on consecutive pairs
            for pair in offspring.chunks_exact_mut(2) {
                if self.rng.f64() < self.config.cx_pb {
                    let (a, b) = pair.split_at_mut(1);
                    self.crossover.mate(&mut a[0], &mut b[0], &mut self.rng);
                }
            }
            // mutation
            for individual in offspring.iter_mut() {
                if self.rng.f64() < self.config.mut_pb {
                    self.mutation.mutate(individual, &mut self.rng);
                }
            }
            // lazy re-evaluation of the stale offspring only
            let nb_evaluated = Self::evaluate_stale(&self.graph, &mut offspring);
            // full generational replacement
            population = offspring;
            let generation_stats = Self::compute_stats(generation, nb_evaluated, &population);
            if self.verbose {
                println!("-- Generation {} --", generation);
                println!("  Evaluated {} individuals", nb_evaluated);
                println!("  Min {}", generation_stats.min);
                println!("  Max {}", generation_stats.max);
                println!("  Avg {}", generation_stats.mean);
                println!("  Std {}", generation_stats.std);
            }
            stats.push(generation_stats);
        }
        // best of the final population, earliest index on ties
        let mut best_index = 0;
        for (i, individual) in population.iter().enumerate() {
            if individual.fitness > population[best_index].fitness {
                best_index = i;
            }
        }
        let best = population[best_index].clone();
        let best_fitness = best.fitness
            .expect("population is evaluated after each generation");
        GaResult { best, best_fitness, stats }
    }

    /// scores every individual whose cached fitness is stale;
    /// returns how many were scored
    fn evaluate_stale(graph:&Graph, population:&mut [Individual]) -> usize {
        let mut nb = 0;
        for individual in population.iter_mut() {
            if individual.fitness.is_none() {
                let fitness = evaluate(graph, &individual.genes)
                    .expect("genome length matches the instance");
                individual.fitness = Some(fitness);
                nb += 1;
            }
        }
        nb
    }

    fn compute_stats(generation:usize, nb_evaluated:usize, population:&[Individual]) -> GenerationStats {
        let fits:Vec<Fitness> = population.iter()
            .map(|i| i.fitness.expect("population is evaluated"))
            .collect();
        let nb = fits.len() as f64;
        let mean:f64 = fits.iter().map(|f| *f as f64).sum::<f64>() / nb;
        let mean2:f64 = fits.iter().map(|f| (*f as f64) * (*f as f64)).sum::<f64>() / nb;
        // abs() guards against small negative values from cancellation
        let std = (mean2 - mean * mean).abs().sqrt();
        GenerationStats {
            generation,
            nb_evaluated,
            min: *fits.iter().min().expect("population is not empty"),
            max: *fits.iter().max().expect("population is not empty"),
            mean,
            std,
        }
    }
}

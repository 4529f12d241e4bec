use std::rc::Rc;
use std::time::Instant;

use clap::{App, Arg};
use serde_json::json;

use clique_search::clique::checker;
use clique_search::fixtures::ga_demo_graph;
use clique_search::search::ga::{GaConfig, GaEngine};
use clique_search::util::{export_results, read_common_params};

/** searches a large clique in the demo instance using a genetic algorithm. */
pub fn main() {
    // parse arguments
    let main_args = App::new("ga_clique")
        .about("genetic algorithm for the maximum clique problem")
        .arg(Arg::with_name("seed").short("s").long("seed")
            .takes_value(true).default_value("64")
            .help("random seed"))
        .arg(Arg::with_name("population").short("p").long("population")
            .takes_value(true).default_value("100")
            .help("population size"))
        .arg(Arg::with_name("generations").short("g").long("generations")
            .takes_value(true).default_value("50")
            .help("number of generations"))
        .arg(Arg::with_name("solution").long("solution")
            .takes_value(true)
            .help("solution filename"))
        .arg(Arg::with_name("perf").long("perf")
            .takes_value(true)
            .help("performance logs filename"))
        .get_matches();
    let (seed, sol_file, perf_file) = read_common_params(&main_args);
    let population_size:usize = main_args.value_of("population").unwrap()
        .parse().expect("unable to parse the population size given");
    let nb_generations:usize = main_args.value_of("generations").unwrap()
        .parse().expect("unable to parse the generation count given");

    // build the instance
    let instance = Rc::new(ga_demo_graph());
    instance.display_statistics();
    println!("=======================");

    // solve it
    let config = GaConfig {
        population_size,
        nb_generations,
        seed,
        ..GaConfig::default()
    };
    let t_start = Instant::now();
    let mut engine = GaEngine::new(instance.clone(), config, true);
    let result = engine.run();
    let duration = t_start.elapsed().as_secs_f32();
    println!("-- End of (successful) evolution --");

    let solution = result.best.selected_nodes(&instance);
    println!("Best individual selects {:?}, fitness {}", solution, result.best_fitness);
    println!("check: {:?}", checker(&instance, &solution));
    println!("--- {:.3} seconds ---", duration);
    let stats = json!({
        "best_fitness": result.best_fitness,
        "max_fitness_per_generation": result.stats.iter().map(|s| s.max).collect::<Vec<_>>(),
        "time_searched": duration,
        "seed": seed,
        "inst_name": "ga_demo_graph"
    });

    // export results
    export_results(&instance, &solution, &stats, perf_file, sol_file);
}

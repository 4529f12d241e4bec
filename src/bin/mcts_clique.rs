use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::{App, Arg};
use serde_json::json;

use clique_search::clique::checker;
use clique_search::fixtures::mcts_demo_graph;
use clique_search::search::mcts::{Budget, MctsConfig, MctsEngine};
use clique_search::util::{export_results, read_common_params};

/** searches a large clique in the demo instance using Monte Carlo tree
search (one bounded search call per vertex added). */
pub fn main() {
    // parse arguments
    let main_args = App::new("mcts_clique")
        .about("Monte Carlo tree search for the maximum clique problem")
        .arg(Arg::with_name("seed").short("s").long("seed")
            .takes_value(true).default_value("0")
            .help("random seed"))
        .arg(Arg::with_name("time").short("t").long("time")
            .takes_value(true).default_value("1.0")
            .help("time budget of one search call (seconds)"))
        .arg(Arg::with_name("iterations").short("i").long("iterations")
            .takes_value(true)
            .help("iteration budget of one search call (overrides the time budget)"))
        .arg(Arg::with_name("solution").long("solution")
            .takes_value(true)
            .help("solution filename"))
        .arg(Arg::with_name("perf").long("perf")
            .takes_value(true)
            .help("performance logs filename"))
        .get_matches();
    let (seed, sol_file, perf_file) = read_common_params(&main_args);
    let budget = match main_args.value_of("iterations") {
        Some(i) => Budget::Iterations(
            i.parse().expect("unable to parse the iteration budget given")
        ),
        None => {
            let t:f32 = main_args.value_of("time").unwrap().parse()
                .expect("unable to parse the time given");
            Budget::Time(Duration::from_secs_f32(t))
        }
    };

    // build the instance
    let instance = Rc::new(mcts_demo_graph());
    instance.display_statistics();
    println!("=======================");

    // solve it
    let config = MctsConfig { budget, seed, ..MctsConfig::default() };
    let t_start = Instant::now();
    let mut engine = MctsEngine::new(instance.clone(), config);
    let clique = engine.run();
    let duration = t_start.elapsed().as_secs_f32();

    let solution = clique.to_node_ids(&instance);
    println!("clique found: {:?} ({} vertices)", solution, clique.reward());
    println!("check: {:?}", checker(&instance, &solution));
    println!("--- {:.3} seconds ---", duration);
    let stats = json!({
        "clique_size": clique.reward(),
        "time_searched": duration,
        "seed": seed,
        "inst_name": "mcts_demo_graph"
    });

    // export results
    export_results(&instance, &solution, &stats, perf_file, sol_file);
}

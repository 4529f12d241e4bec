use clap::ArgMatches;
use serde_json::Value;

use crate::clique::{checker, CheckerResult, Graph, NodeId};

/** reads the command line parameters shared by the solver executables:
random seed, solution filename, performance logs filename */
pub fn read_common_params(main_args:&ArgMatches) -> (u64, Option<String>, Option<String>) {
    let seed:u64 = main_args.value_of("seed").unwrap_or("0").parse::<u64>()
        .expect("unable to parse the seed given");
    // read value of the solution filename
    let sol_file:Option<String> = match main_args.value_of("solution") {
        None => None,
        Some(e) => {
            println!("printing solutions in: {}", e);
            Some(e.to_string())
        }
    };
    // read value of the performance logs filename
    let perf_file:Option<String> = match main_args.value_of("perf") {
        None => None,
        Some(e) => {
            println!("printing perfs in: {}\n", e);
            Some(e.to_string())
        }
    };
    (seed, sol_file, perf_file)
}

/// exports search statistics and the clique found to files
pub fn export_results(
    graph:&Graph,
    solution:&[NodeId],
    stats:&Value,
    perf_file:Option<String>,
    sol_file:Option<String>,
) {
    // export statistics
    match perf_file {
        None => {},
        Some(filename) => {
            let mut file = match std::fs::File::create(filename.as_str()) {
                Err(why) => panic!("couldn't create {}: {}", filename, why),
                Ok(file) => file
            };
            if let Err(why) = std::io::Write::write(
                &mut file, serde_json::to_string(stats).unwrap().as_bytes()
            ) { panic!("couldn't write: {}", why) };
        }
    }
    // export solution
    match sol_file {
        None => {},
        Some(filename) => {
            match checker(graph, solution) {
                CheckerResult::Ok(_) => {},
                result => { println!("invalid solution (reason: {:?})", result); }
            };
            std::fs::write(filename.as_str(), solution_to_string(solution))
                .unwrap_or_else(|_|
                    panic!("export_results: unable to write the solution in {}", filename)
                );
        }
    }
}

/** writes a string encoding the clique (use this to export the solution) */
pub fn solution_to_string(solution:&[NodeId]) -> String {
    let mut res = String::default();
    for v in solution {
        res += format!("{} ", v).as_str();
    }
    res += "\n";
    res
}

use std::path::Path;
use std::process::ExitCode;

use seed_round::display::{print_schedule, print_stats};
use seed_round::persist::{read_schedule_csv, write_schedule_csv, write_stats_json};
use seed_round::{evaluate, search_best};

const USAGE: &str = "Usage:
  seed-round <nplayers> <nrounds> [iterations] [out.csv]
  seed-round eval <nplayers> <nrounds> <schedule.csv>";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = if args.first().map(String::as_str) == Some("eval") {
        run_eval(&args[1..])
    } else {
        run_search(&args)
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_count(args: &[String], idx: usize, name: &str) -> Result<usize, String> {
    args.get(idx)
        .ok_or_else(|| format!("missing <{}>\n{}", name, USAGE))?
        .parse::<usize>()
        .map_err(|_| format!("<{}> must be a positive integer\n{}", name, USAGE))
}

/// Generate mode: search for the best schedule among `iterations` candidates,
/// print it with its evaluation, and optionally write it out as CSV (plus a
/// JSON stats dump next to it).
fn run_search(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let nplayers = parse_count(args, 0, "nplayers")?;
    let nrounds = parse_count(args, 1, "nrounds")?;
    let iterations = match args.get(2) {
        Some(arg) => arg
            .parse::<usize>()
            .map_err(|_| format!("<iterations> must be a positive integer\n{}", USAGE))?,
        None => 1,
    };

    println!(
        "Searching {} candidate schedule(s) for {} players, {} rounds...",
        iterations, nplayers, nrounds
    );
    let (schedule, record) = search_best(nplayers, nrounds, iterations)?;
    print_schedule(&schedule);
    print_stats(&record);

    if let Some(out) = args.get(3) {
        let csv_path = Path::new(out);
        write_schedule_csv(&schedule, csv_path)?;
        let json_path = csv_path.with_extension("stats.json");
        write_stats_json(&record, &json_path)?;
        println!("\nSchedule saved to {}", csv_path.display());
        println!("Statistics saved to {}", json_path.display());
    }
    Ok(())
}

/// Eval mode: load a previously generated schedule and print its evaluation.
fn run_eval(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let nplayers = parse_count(args, 0, "nplayers")?;
    let nrounds = parse_count(args, 1, "nrounds")?;
    let path = args
        .get(2)
        .ok_or_else(|| format!("missing <schedule.csv>\n{}", USAGE))?;

    let schedule = read_schedule_csv(Path::new(path), nplayers, nrounds)?;
    print_schedule(&schedule);
    print_stats(&evaluate(&schedule));
    Ok(())
}

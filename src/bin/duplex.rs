//! Duplex CLI — geometric reaction enumeration for DSD systems.
//!
//! Usage:
//!   duplex run [NAMES...] [--seed N]
//!   duplex enumerate --process <TEXT|@FILE> --lengths <TEXT|@FILE> [--json]
//!   duplex list

use clap::{Parser, Subcommand};
use duplex::{ConstraintChecker, EnumerateError, EnumeratorSettings, GeometricEnumerator};
use std::fs;
use std::path::Path;

#[derive(Parser)]
#[command(name = "duplex", version, about = "Geometric reaction enumerator for DNA strand displacement")]
struct Cli {
    /// Log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run built-in test scenarios (all when no names are given)
    Run {
        /// Scenario names to run, in order
        names: Vec<String>,
        /// RNG seed for the plausibility oracle
        #[arg(long, default_value_t = 7)]
        seed: u64,
    },
    /// Enumerate the CRN of a process
    Enumerate {
        /// Process text, or @path to read it from a file
        #[arg(long)]
        process: String,
        /// Domain length declarations, or @path to read them from a file
        #[arg(long)]
        lengths: String,
        /// RNG seed for the plausibility oracle
        #[arg(long)]
        seed: Option<u64>,
        /// Abort if a complex exceeds this many strands
        #[arg(long)]
        max_complex_size: Option<usize>,
        /// Emit the CRN as JSON instead of the species/reaction tables
        #[arg(long)]
        json: bool,
    },
    /// List the built-in scenario names
    List,
}

struct Scenario {
    name: &'static str,
    process: &'static str,
    lengths: &'static str,
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "bind_long",
        process: "( <x> | <x*> )",
        lengths: "longDomain x length 20",
    },
    Scenario {
        name: "bind_toehold",
        process: "( <t^> | <t^*> )",
        lengths: "toeholdDomain t length 5",
    },
    Scenario {
        name: "tmsd",
        process: "( <t^ x> | <x!i1> | <x*!i1 t^*> )",
        lengths: "toeholdDomain t length 5 longDomain x length 20",
    },
    Scenario {
        name: "tmsd_second_toehold",
        process: "( <t^ x> | <x!i1 u^!i2> | <u^*!i2 x*!i1 t^*> )",
        lengths: "toeholdDomain t length 5 longDomain x length 20 toeholdDomain u length 5",
    },
    Scenario {
        name: "displacement_intermediate",
        process: "( <A!i1> | <A B!i2> | <B*!i2 A*!i1> )",
        lengths: "longDomain A length 20 longDomain B length 20",
    },
    Scenario {
        name: "no_leak_hairpin",
        process: "( <x!j y x*!j> | <x> )",
        lengths: "toeholdDomain x length 8 longDomain y length 20",
    },
    Scenario {
        name: "hairpin_loop_binding",
        process: "( <x!i1 spcr1^ y* spcr2^ x*!i1> | <y> )",
        lengths: "longDomain x length 20 toeholdDomain spcr1 length 6 \
                  toeholdDomain spcr2 length 6 longDomain y length 20",
    },
    Scenario {
        name: "remote_toehold",
        process: "( <t^ spcr1 y> | <y*!i1 spcr2 t^*> | <y!i1> )",
        lengths: "toeholdDomain t length 14 longDomain spcr1 length 5 \
                  longDomain y length 20 longDomain spcr2 length 5",
    },
    Scenario {
        name: "four_way_exchange",
        process: "( <E!i5 A!i1 B!i2 F!i7> | <F*!i7 B*!i2 A*!i3 G*!i6> \
                  | <G!i6 A!i3 B!i4 H!i8> | <H*!i8 B*!i4 A*!i1 E*!i5> )",
        lengths: "longDomain A length 20 longDomain B length 20 longDomain E length 20 \
                  longDomain F length 20 longDomain G length 20 longDomain H length 20",
    },
    Scenario {
        name: "zero_nt_loop",
        process: "( <t^ t^*> )",
        lengths: "toeholdDomain t length 14",
    },
];

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    let code = match cli.command {
        Commands::Run { names, seed } => run_scenarios(&names, seed),
        Commands::Enumerate { process, lengths, seed, max_complex_size, json } => {
            run_enumerate(&process, &lengths, seed, max_complex_size, json)
        }
        Commands::List => {
            for s in SCENARIOS {
                println!("{}", s.name);
            }
            0
        }
    };
    std::process::exit(code);
}

fn run_scenarios(names: &[String], seed: u64) -> i32 {
    let selected: Vec<&Scenario> = if names.is_empty() {
        SCENARIOS.iter().collect()
    } else {
        let mut picked = Vec::new();
        for name in names {
            match SCENARIOS.iter().find(|s| s.name == *name) {
                Some(s) => picked.push(s),
                None => {
                    eprintln!("error: unknown scenario '{}'; see 'duplex list'", name);
                    return 1;
                }
            }
        }
        picked
    };

    for scenario in selected {
        let title = format!("ENUMERATION SCENARIO {}:", scenario.name.to_uppercase());
        println!("{}", title);
        println!("{}", "-".repeat(title.len()));
        println!("Input string:");
        println!("{}", scenario.process);
        println!("{}", scenario.lengths);
        println!();

        let checker = ConstraintChecker::new(Some(seed));
        let settings = EnumeratorSettings::new("adjacent_detailed");
        let mut enumerator = match GeometricEnumerator::new(settings, checker) {
            Ok(e) => e,
            Err(err) => {
                eprintln!("error: {}", err);
                return 1;
            }
        };
        match enumerator.enumerate_input(scenario.process, scenario.lengths) {
            Ok(crn) => {
                println!(
                    "Found {} species and {} reactions in total.",
                    crn.species().len(),
                    crn.reactions().len()
                );
                println!();
                println!("{}", crn);
            }
            Err(err @ EnumerateError::ZeroNucleotideLoop { .. }) => {
                // Input rejection, not a harness failure
                println!("Input rejected: {}", err);
                println!();
            }
            Err(err) => {
                eprintln!("error: {}", err);
                return 1;
            }
        }
        println!();
    }
    0
}

fn run_enumerate(
    process: &str,
    lengths: &str,
    seed: Option<u64>,
    max_complex_size: Option<usize>,
    json: bool,
) -> i32 {
    let process_text = match load_arg(process) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: {}", err);
            return 1;
        }
    };
    let lengths_text = match load_arg(lengths) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: {}", err);
            return 1;
        }
    };

    let mut settings = EnumeratorSettings::new("adjacent_detailed");
    if let Some(max) = max_complex_size {
        settings = settings.with_max_complex_size(max);
    }
    let checker = ConstraintChecker::new(seed);
    let mut enumerator = match GeometricEnumerator::new(settings, checker) {
        Ok(e) => e,
        Err(err) => {
            eprintln!("error: {}", err);
            return 1;
        }
    };

    match enumerator.enumerate_input(&process_text, &lengths_text) {
        Ok(crn) => {
            if json {
                match serde_json::to_string_pretty(&crn.summary()) {
                    Ok(text) => println!("{}", text),
                    Err(err) => {
                        eprintln!("error: {}", err);
                        return 1;
                    }
                }
            } else {
                println!("{}", crn);
            }
            0
        }
        Err(err) => {
            eprintln!("error: {}", err);
            1
        }
    }
}

/// An argument is literal text, or `@path` to read a file
fn load_arg(arg: &str) -> Result<String, String> {
    match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(Path::new(path))
            .map_err(|e| format!("cannot read '{}': {}", path, e)),
        None => Ok(arg.to_string()),
    }
}

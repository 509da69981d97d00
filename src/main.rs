//! Hash Brute-Force Search CLI
//!
//! Usage:
//!   hash_brute -a abc -n 4 <hash>          # Single thread, iterative
//!   hash_brute -a ab -n 2 abg3r/JgoFqCQ    # crypt(3) DES target
//!   hash_brute -m -r -a ab -n 8 <hash>     # Worker pool, recursive
//!   hash_brute -l up-to -n 5 sha3-256:<hash>

use std::process;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hash_brute::{CancelHandle, Config, Search, SearchOutcome, TargetVerifier, ThreadMode};

fn main() {
    let config = Config::parse();

    // RUST_LOG wins over --log-level
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .init();

    let params = match config.search_params() {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    println!("Hash Brute-Force Search");
    println!("=======================");
    let verifier = TargetVerifier::for_target(&params.target);

    println!("Hash:       {} ({})", params.target, verifier.scheme());
    println!("Alphabet:   {} ({} symbols)", params.alphabet, params.alphabet.len());
    println!("Length:     {} ({})", params.password_length, params.length_mode);
    println!("Generator:  {}", params.brute_mode);
    match params.thread_mode {
        ThreadMode::Single => println!("Threads:    single"),
        ThreadMode::Multi => println!(
            "Threads:    {} workers, suffix width {}, queue {}",
            params.workers, params.suffix_width, params.queue_capacity
        ),
    }
    println!("Space:      {} candidates", format_number(params.search_space()));
    println!();

    let search = match Search::new(params, verifier) {
        Ok(search) => search,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    ctrlc_handler(search.cancel_handle());

    match search.run() {
        Ok(outcome) => print_outcome(&outcome),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn print_outcome(outcome: &SearchOutcome) {
    match &outcome.password {
        Some(password) => println!("FOUND\n{}", password),
        None if outcome.cancelled => println!("CANCELLED"),
        None => println!("NOT FOUND"),
    }

    println!("\n--- Final Statistics ---");
    println!(
        "Candidates checked: {}",
        format_number(outcome.stats.candidates_checked)
    );
    if outcome.stats.tasks_published > 0 {
        println!("Tasks processed:    {}", outcome.stats.tasks_processed);
    }
    println!("Time elapsed:       {:.2}s", outcome.elapsed.as_secs_f64());
    println!(
        "Average speed:      {}/s",
        format_number(outcome.candidates_per_second() as u64)
    );
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn ctrlc_handler(cancel: CancelHandle) {
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }
}

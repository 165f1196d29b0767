use std::process;

use clap::Parser;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = rsa_keygen::cli::Args::parse();
    if let Err(e) = rsa_keygen::cli::run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

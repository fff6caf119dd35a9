mod utils;

pub mod admin;
pub mod booking;
pub mod cli;
pub mod commands;
pub mod db;
pub mod gallery;
pub mod models;
pub mod notification;
pub mod settings;
pub mod storage;

use clap::Parser;
use cli::CliArgs;

/// Parse the command line, run it and return the process exit code.
pub fn run() -> i32 {
    let args = CliArgs::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // RUST_LOG still wins over the -v flags.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    log::debug!("Shree Lodge desk starting up...");

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start async runtime: {err}");
            return 1;
        }
    };

    match runtime.block_on(cli::execute(args)) {
        Ok(()) => 0,
        Err(message) => {
            cli::report_error(&message);
            1
        }
    }
}

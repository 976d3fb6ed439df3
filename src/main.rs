use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tasklist::cli::Cli;
use tasklist::commands;
use tasklist::config::Config;
use tasklist::storage::FileStorage;
use tasklist::store::TaskStore;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = match Config::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    debug!(?config, "config loaded");

    let storage = FileStorage::new(&config.data_dir);
    let mut store = TaskStore::open(storage, config.slot.clone());
    let today = chrono::Local::now().date_naive();

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = commands::run(&cli.command, &config, &mut store, today, &mut stdout) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

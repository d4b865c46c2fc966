mod aggregate;
mod config;
mod db;
mod models;
mod run;
mod store;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;
    let interactive = args.len() == 1;

    let log_path = config.log_path();
    config::init_logging(interactive.then_some(log_path.as_path()))?;

    let db = db::Database::open(&config.db_path())?;
    let today = chrono::Local::now().date_naive();
    let mut tracker = store::Tracker::open(db, today)?;
    let snapshot = tracker.snapshot();
    log::info!(
        "opened {} ({} categories, {} months)",
        config.db_path().display(),
        snapshot.categories.len(),
        snapshot.months.len()
    );

    if interactive {
        run::as_tui(&mut tracker)
    } else {
        run::as_cli(&args, &mut tracker)
    }
}

//! save-doctor: inspect and repair clicker save records.
//!
//! Usage:
//!   save-doctor --file game_state.json inspect
//!   save-doctor --db saves.db --key slot1 repair
//!   save-doctor --config storage.json dump

use anyhow::{bail, Result};
use clicker_core::{
    codec,
    snapshot::Snapshot,
    storage::{GameStorage, LoadOutcome, Loaded},
    StorageConfig,
};
use std::env;

#[derive(serde::Serialize)]
struct Report<'a> {
    key: &'a str,
    outcome: LoadOutcome,
    error: Option<String>,
    money: f64,
    manual_work: u64,
    buildings: &'a [u64],
    purchased_upgrades: Vec<&'a str>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = command(&args);

    let mut config = match flag(&args, "--config") {
        Some(path) => StorageConfig::load(path)?,
        None => StorageConfig::default(),
    };
    if let Some(key) = flag(&args, "--key").or_else(|| flag(&args, "--file")) {
        config = config.with_save_key(key);
    }
    // Only `repair` writes, and it does so explicitly below.
    config = config.with_corrective_save(false);

    let storage = match flag(&args, "--db") {
        Some(db) => GameStorage::open_sqlite(db, config)?,
        None => GameStorage::open_file(config),
    };

    match command {
        "inspect" => {
            let loaded = storage.load_game_state();
            print_report(&storage, &loaded)?;
        }
        "repair" => {
            let loaded = storage.load_game_state();
            if let Some(e) = &loaded.error {
                bail!("cannot repair '{}': {e}", storage.driver().key_name());
            }
            storage.save_game_state(&loaded.state, loaded.outcome)?;
            log::info!("Rewrote '{}' in the current format", storage.driver().key_name());
            print_report(&storage, &loaded)?;
        }
        "dump" => {
            let loaded = storage.load_game_state();
            let snapshot = Snapshot::capture(&loaded.state, storage.catalog());
            println!("{}", String::from_utf8_lossy(&codec::encode(&snapshot)?));
        }
        other => bail!("unknown command '{other}' (expected inspect, repair or dump)"),
    }

    Ok(())
}

fn print_report(storage: &GameStorage, loaded: &Loaded) -> Result<()> {
    let report = Report {
        key: storage.driver().key_name(),
        outcome: loaded.outcome,
        error: loaded.error.as_ref().map(ToString::to_string),
        money: loaded.state.money,
        manual_work: loaded.state.manual_work,
        buildings: &loaded.state.buildings,
        purchased_upgrades: loaded.state.purchased_upgrades.iter().map(String::as_str).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// First argument that is neither a flag nor a flag's value.
fn command(args: &[String]) -> &str {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if arg.starts_with("--") {
            rest.next();
            continue;
        }
        return arg;
    }
    "inspect"
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

//! Demonstration driver for the client directory.
//!
//! Wires config, logging and the database together the way an embedding
//! application would, then runs [`clientbook_cli::run_demo`] on stdout.

use clientbook_cli::run_demo;
use clientbook_core::db::{open_db, open_db_in_memory};
use clientbook_core::{
    core_version, init_logging, AppConfig, ClientService, DbLocation, SqliteClientRepository,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("clientbook: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    if let Some(log) = &config.log {
        init_logging(log)?;
    }
    info!("event=demo_start module=cli status=start version={}", core_version());

    let mut conn = match &config.db {
        DbLocation::File(path) => open_db(path)?,
        DbLocation::InMemory => open_db_in_memory()?,
    };
    let repo = SqliteClientRepository::try_new(&mut conn)?;
    let mut service = ClientService::new(repo);

    let stdout = std::io::stdout();
    run_demo(&mut service, &mut stdout.lock())?;

    drop(service);
    conn.close().map_err(|(_, err)| err)?;
    info!("event=demo_finish module=cli status=ok");
    Ok(())
}

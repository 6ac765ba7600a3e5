//! Station commands: list.

use clap::Subcommand;

use crate::storage::Storage;

use super::format::format_station;

#[derive(Debug, Subcommand)]
pub enum StationCommand {
    /// List every station with its status and assigned course.
    List,
}

pub(super) fn run(storage: &Storage, command: &StationCommand) -> Result<(), String> {
    match command {
        StationCommand::List => {
            let stations = storage
                .list_stations()
                .map_err(|e| format!("failed to list stations: {e}"))?;

            if stations.is_empty() {
                println!("No stations");
                return Ok(());
            }
            for station in &stations {
                println!("{}", format_station(station));
            }
            Ok(())
        }
    }
}

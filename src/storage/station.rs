//! Station storage: the roster and course assignments.

use tracing::{info, warn};
use uuid::Uuid;

use crate::model::{Station, StationStatus};
use crate::stations::{StationAssigner, StationRoster};

use super::{Result, Storage, StorageError};

/// The roster a fresh database starts with: (id, name, status, location).
const DEFAULT_ROSTER: &[(&str, &str, StationStatus, &str)] = &[
    ("ST-01", "Lane 1", StationStatus::Idle, "Range A"),
    ("ST-02", "Lane 2", StationStatus::Idle, "Range A"),
    ("ST-03", "Lane 3", StationStatus::InUse, "Range A"),
    ("ST-04", "Lane 4", StationStatus::Offline, "Range A"),
    ("ST-05", "Lane 5", StationStatus::Idle, "Range B"),
    ("ST-06", "Lane 6", StationStatus::Idle, "Range B"),
    ("ST-07", "Lane 7", StationStatus::InUse, "Range B"),
    ("ST-08", "Lane 8", StationStatus::Idle, "Range B"),
    ("ST-09", "Simulator 1", StationStatus::Offline, "Indoor bay"),
    ("ST-10", "Simulator 2", StationStatus::Idle, "Indoor bay"),
];

impl Storage {
    /// Inserts the default roster when the station table is empty.
    pub(super) fn seed_stations(&self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM station", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }
        for (id, name, status, location) in DEFAULT_ROSTER {
            self.insert_station(&Station {
                id: (*id).to_string(),
                name: (*name).to_string(),
                status: *status,
                location: (*location).to_string(),
                assigned_course_id: None,
            })?;
        }
        Ok(())
    }

    /// Inserts or replaces a station row.
    pub fn insert_station(&self, station: &Station) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO station (id, name, status, location, assigned_course_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                &station.id,
                &station.name,
                station.status.as_str(),
                &station.location,
                station.assigned_course_id.map(|id| id.to_string()),
            ],
        )?;
        Ok(())
    }

    /// Lists every station, ordered by id.
    pub fn list_stations(&self) -> Result<Vec<Station>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, status, location, assigned_course_id FROM station ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut stations = Vec::new();
        for row in rows {
            let (id, name, status_str, location, course_str) = row?;
            let status = StationStatus::parse(&status_str).ok_or_else(|| {
                StorageError::Corrupt(format!("unknown station status: {status_str}"))
            })?;
            let assigned_course_id = course_str
                .map(|s| s.parse::<Uuid>())
                .transpose()
                .map_err(|e| StorageError::Corrupt(format!("invalid assigned course id: {e}")))?;
            stations.push(Station {
                id,
                name,
                status,
                location,
                assigned_course_id,
            });
        }
        Ok(stations)
    }
}

impl StationRoster for Storage {
    fn stations(&self) -> Vec<Station> {
        self.list_stations().unwrap_or_else(|e| {
            warn!("failed to read station roster: {e}");
            Vec::new()
        })
    }
}

impl StationAssigner for Storage {
    fn assign_course_to_station(&self, course_id: Uuid, station_id: &str) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE station SET assigned_course_id = ?1 WHERE id = ?2",
            rusqlite::params![course_id.to_string(), station_id],
        )?;
        if rows == 0 {
            return Err(StorageError::StationNotFound(station_id.to_string()));
        }
        info!(%course_id, station_id, "assigned course to station");
        Ok(())
    }
}

//! Course storage: append and read saved courses.

use jiff::{Timestamp, civil::Date};
use rusqlite::Row;
use uuid::Uuid;

use crate::model::{Course, CourseStatus, ScheduleWindow};
use crate::workflow::CourseRepository;

use super::{Result, Storage, StorageError};

const COLUMNS: &str = "id, name, created_at, status, total_time_minutes, total_exercise_count,
     exercises, assigned_stations, schedule_start, schedule_end";

/// Raw column values for one course row.
struct CourseRow {
    id: String,
    name: String,
    created_at: String,
    status: String,
    total_time_minutes: u32,
    total_exercise_count: i64,
    exercises: String,
    assigned_stations: String,
    schedule_start: Option<String>,
    schedule_end: Option<String>,
}

impl CourseRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
            status: row.get(3)?,
            total_time_minutes: row.get(4)?,
            total_exercise_count: row.get(5)?,
            exercises: row.get(6)?,
            assigned_stations: row.get(7)?,
            schedule_start: row.get(8)?,
            schedule_end: row.get(9)?,
        })
    }

    fn into_course(self) -> Result<Course> {
        let id = self
            .id
            .parse::<Uuid>()
            .map_err(|e| StorageError::Corrupt(format!("invalid course id: {e}")))?;
        let created_at = self
            .created_at
            .parse::<Timestamp>()
            .map_err(|e| StorageError::Corrupt(format!("invalid created_at: {e}")))?;
        let status = CourseStatus::parse(&self.status)
            .ok_or_else(|| StorageError::Corrupt(format!("unknown course status: {}", self.status)))?;
        let total_exercise_count = usize::try_from(self.total_exercise_count)
            .map_err(|e| StorageError::Corrupt(format!("invalid exercise count: {e}")))?;
        let schedule = match (self.schedule_start, self.schedule_end) {
            (Some(start), Some(end)) => Some(
                ScheduleWindow::new(parse_date(&start)?, parse_date(&end)?)
                    .map_err(|e| StorageError::Corrupt(e.to_string()))?,
            ),
            (None, None) => None,
            _ => {
                return Err(StorageError::Corrupt(
                    "course has half a schedule window".into(),
                ));
            }
        };

        Ok(Course {
            id,
            name: self.name,
            exercises: serde_json::from_str(&self.exercises)?,
            created_at,
            total_time_minutes: self.total_time_minutes,
            total_exercise_count,
            status,
            assigned_stations: serde_json::from_str(&self.assigned_stations)?,
            schedule,
        })
    }
}

fn parse_date(s: &str) -> Result<Date> {
    s.parse::<Date>()
        .map_err(|e| StorageError::Corrupt(format!("invalid schedule date: {e}")))
}

impl Storage {
    /// Loads a single course.
    pub fn load_course(&self, id: Uuid) -> Result<Course> {
        let sql = format!("SELECT {COLUMNS} FROM course WHERE id = ?1");
        let row = self
            .conn
            .query_row(&sql, [id.to_string()], CourseRow::read)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StorageError::CourseNotFound(id),
                other => other.into(),
            })?;
        row.into_course()
    }

    /// Lists all courses, oldest first.
    pub fn list_courses(&self) -> Result<Vec<Course>> {
        let sql = format!("SELECT {COLUMNS} FROM course");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], CourseRow::read)?;
        let mut courses = Vec::new();
        for row in rows {
            courses.push(row?.into_course()?);
        }
        courses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(courses)
    }
}

impl CourseRepository for Storage {
    fn insert_course(&self, course: &Course) -> Result<()> {
        let count = i64::try_from(course.total_exercise_count)
            .map_err(|e| StorageError::Corrupt(format!("exercise count too large: {e}")))?;
        self.conn.execute(
            "INSERT INTO course (id, name, created_at, status, total_time_minutes,
                 total_exercise_count, exercises, assigned_stations, schedule_start, schedule_end)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                course.id.to_string(),
                &course.name,
                course.created_at.to_string(),
                course.status.as_str(),
                course.total_time_minutes,
                count,
                serde_json::to_string(&course.exercises)?,
                serde_json::to_string(&course.assigned_stations)?,
                course.schedule.map(|s| s.start().to_string()),
                course.schedule.map(|s| s.end().to_string()),
            ],
        )?;
        Ok(())
    }
}

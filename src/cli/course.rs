//! Course commands: save, list, show, assign.

use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use clap::Subcommand;
use uuid::Uuid;

use crate::config::Config;
use crate::model::Course;
use crate::notify::{ConsoleNotifier, Notifier, Severity};
use crate::stations::{StationAssignmentFlow, StationRoster};
use crate::storage::Storage;
use crate::workflow::{CourseSaveWorkflow, SystemClock};

use super::format::{format_course, format_exercise};
use super::{resolve, short_id};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Subcommand)]
pub enum CourseCommand {
    /// Save the draft as a new course. Prints the course ID.
    ///
    /// Stations and the schedule window chosen on the draft are carried
    /// over. The draft is cleared once the course is stored.
    Save {
        /// Assign the saved course to these stations. Only for drafts
        /// saved without stations.
        #[arg(long = "assign", value_name = "STATION")]
        assign: Vec<String>,

        /// Keep the confirmation up until it closes on its own.
        #[arg(long, conflicts_with = "assign")]
        linger: bool,
    },

    /// List saved courses, oldest first.
    List,

    /// Show one course and its exercises.
    Show {
        /// Course ID: full UUID or unambiguous prefix.
        course: String,
    },

    /// Assign a saved course to stations.
    Assign {
        /// Course ID: full UUID or unambiguous prefix.
        course: String,

        /// Station to assign. Can be specified multiple times.
        #[arg(long = "station", value_name = "ID", required = true)]
        stations: Vec<String>,
    },
}

pub(super) fn run(config: &Config, storage: &Storage, command: CourseCommand) -> Result<(), String> {
    match command {
        CourseCommand::Save { assign, linger } => cmd_save(config, storage, &assign, linger),
        CourseCommand::List => cmd_list(storage),
        CourseCommand::Show { course } => cmd_show(&resolve_course(storage, &course)?),
        CourseCommand::Assign { course, stations } => {
            let course = resolve_course(storage, &course)?;
            assign(storage, StationAssignmentFlow::new(course.id), &stations)
        }
    }
}

type SaveWorkflow<'a> = CourseSaveWorkflow<&'a Storage, ConsoleNotifier, SystemClock>;

fn cmd_save(
    config: &Config,
    storage: &Storage,
    stations: &[String],
    linger: bool,
) -> Result<(), String> {
    let mut draft = storage
        .load_draft()
        .map_err(|e| format!("failed to load draft: {e}"))?;

    // Before submit: a refused --assign must not save anything.
    if !stations.is_empty() && !draft.stations().is_empty() {
        return Err(format!(
            "draft already has stations ({}); drop --assign or run `drill draft station clear`",
            draft.stations().ids().join(", ")
        ));
    }

    let mut workflow: SaveWorkflow<'_> =
        CourseSaveWorkflow::new(storage, ConsoleNotifier, SystemClock)
            .with_confirmation_duration(config.confirmation_duration());

    let course = workflow
        .submit(&mut draft)
        .map_err(|e| format!("course not saved: {e}"))?;

    storage
        .save_draft(&draft)
        .map_err(|e| format!("course saved, but failed to clear draft: {e}"))?;
    println!("{}", course.id);

    if !stations.is_empty() {
        let flow = workflow.request_station_assignment().ok_or_else(|| {
            format!(
                "course {} already has stations; use `drill course assign`",
                short_id(course.id)
            )
        })?;
        return assign(storage, flow, stations);
    }

    if linger {
        linger_on_confirmation(&mut workflow);
    } else {
        workflow.dismiss();
    }
    Ok(())
}

/// Block until the confirmation closes itself.
fn linger_on_confirmation(workflow: &mut SaveWorkflow<'_>) {
    if let Some(remaining) = workflow.time_remaining() {
        ConsoleNotifier.notify(
            "Confirmation",
            &format!("closing in {}s", remaining.as_secs()),
            Severity::Info,
        );
    }
    while workflow.time_remaining().is_some() {
        if workflow.poll().is_some() {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn assign(
    storage: &Storage,
    mut flow: StationAssignmentFlow,
    stations: &[String],
) -> Result<(), String> {
    let roster = storage.stations();
    let unique: BTreeSet<&str> = stations.iter().map(String::as_str).collect();
    for station in unique {
        flow.toggle(station, &roster).map_err(|e| e.to_string())?;
    }

    let assigned = flow
        .confirm(storage)
        .map_err(|e| format!("failed to assign stations: {e}"))?;
    eprintln!(
        "Course {} assigned to {}",
        short_id(flow.course_id()),
        assigned.join(", ")
    );
    Ok(())
}

fn cmd_list(storage: &Storage) -> Result<(), String> {
    let courses = storage
        .list_courses()
        .map_err(|e| format!("failed to list courses: {e}"))?;

    if courses.is_empty() {
        println!("No courses");
        return Ok(());
    }

    for course in &courses {
        println!("{}", format_course(course));
    }
    Ok(())
}

fn cmd_show(course: &Course) -> Result<(), String> {
    println!("{}", format_course(course));
    println!("Created: {}", course.created_at);
    for (i, exercise) in course.exercises.iter().enumerate() {
        println!("{}", format_exercise(i + 1, exercise));
    }
    Ok(())
}

/// Resolve a course reference (full UUID or unambiguous prefix) to a course.
fn resolve_course(storage: &Storage, reference: &str) -> Result<Course, String> {
    if let Ok(id) = reference.parse::<Uuid>() {
        return storage
            .load_course(id)
            .map_err(|e| format!("course not found: {e}"));
    }

    let courses = storage
        .list_courses()
        .map_err(|e| format!("failed to list courses: {e}"))?;
    resolve(&courses, reference, "course", |c| c.id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::builder;
    use crate::catalog::find_type;
    use crate::draft::CourseDraft;
    use crate::storage::test_storage;

    fn stage_draft(storage: &Storage, name: &str) {
        let t = find_type("rapid-fire").unwrap();
        let mut draft = CourseDraft::new();
        draft.set_name(name);
        draft.add_exercise(builder::commit(t, &builder::instantiate(t)).unwrap());
        storage.save_draft(&draft).unwrap();
    }

    #[test]
    fn save_persists_course_and_clears_draft() {
        let (_dir, storage) = test_storage();
        stage_draft(&storage, "Evening Qual");

        cmd_save(&Config::default(), &storage, &[], false).unwrap();

        let courses = storage.list_courses().unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name, "Evening Qual");
        assert_eq!(storage.load_draft().unwrap(), CourseDraft::new());
    }

    #[test]
    fn failed_save_keeps_draft() {
        let (_dir, storage) = test_storage();
        let mut draft = CourseDraft::new();
        draft.set_name("No exercises yet");
        storage.save_draft(&draft).unwrap();

        assert!(cmd_save(&Config::default(), &storage, &[], false).is_err());

        assert!(storage.list_courses().unwrap().is_empty());
        assert_eq!(storage.load_draft().unwrap(), draft);
    }

    #[test]
    fn save_with_assign_updates_stations() {
        let (_dir, storage) = test_storage();
        stage_draft(&storage, "Lanes");

        let stations = vec!["ST-02".to_string(), "ST-01".to_string(), "ST-02".to_string()];
        cmd_save(&Config::default(), &storage, &stations, false).unwrap();

        let course_id = storage.list_courses().unwrap()[0].id;
        let assigned: Vec<String> = storage
            .list_stations()
            .unwrap()
            .into_iter()
            .filter(|s| s.assigned_course_id == Some(course_id))
            .map(|s| s.id)
            .collect();
        assert_eq!(assigned, vec!["ST-01", "ST-02"]);
    }

    #[test]
    fn save_with_assign_rejects_draft_that_has_stations() {
        let (_dir, storage) = test_storage();
        stage_draft(&storage, "Preselected");
        let mut draft = storage.load_draft().unwrap();
        draft.toggle_station("ST-01", &storage.stations()).unwrap();
        storage.save_draft(&draft).unwrap();

        let stations = vec!["ST-02".to_string()];
        let err = cmd_save(&Config::default(), &storage, &stations, false).unwrap_err();

        assert!(err.contains("ST-01"));
        assert!(storage.list_courses().unwrap().is_empty());
        assert_eq!(storage.load_draft().unwrap(), draft);
    }

    #[test]
    fn assign_rejects_offline_station() {
        let (_dir, storage) = test_storage();
        let flow = StationAssignmentFlow::new(Uuid::new_v4());

        let err = assign(&storage, flow, &["ST-09".to_string()]).unwrap_err();
        assert!(err.contains("ST-09"));
    }

    #[test]
    fn resolve_course_by_prefix() {
        let (_dir, storage) = test_storage();
        stage_draft(&storage, "Prefix");
        cmd_save(&Config::default(), &storage, &[], false).unwrap();
        let id = storage.list_courses().unwrap()[0].id;

        let course = resolve_course(&storage, &id.to_string()[..5]).unwrap();
        assert_eq!(course.id, id);

        let course = resolve_course(&storage, &id.to_string()).unwrap();
        assert_eq!(course.name, "Prefix");
    }
}

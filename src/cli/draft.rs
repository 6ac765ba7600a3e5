//! Draft commands: show, name, add, remove, move, load, clear, station,
//! schedule.
//!
//! Each command loads the persisted draft, applies one edit, and writes it
//! back. A failed edit leaves the stored draft untouched.

use clap::{Args, Subcommand, ValueEnum};
use jiff::civil::Date;

use crate::builder;
use crate::catalog;
use crate::draft::CourseDraft;
use crate::error::ValidationError;
use crate::model::{ExerciseConfig, FiringPosition};
use crate::reorder::DragReorderController;
use crate::stations::StationRoster;
use crate::storage::Storage;
use crate::templates::TemplateStore;

use super::format::{format_exercise, format_minutes, format_schedule};
use super::{resolve, short_id};

#[derive(Debug, Subcommand)]
pub enum DraftCommand {
    /// Show the draft: name, exercises, totals, stations, schedule.
    Show {
        /// Print the draft as JSON instead.
        #[arg(long)]
        json: bool,
    },

    /// Set the course name.
    Name {
        name: String,
    },

    /// Configure an exercise and append it to the draft.
    ///
    /// Unspecified parameters take the type's defaults.
    Add(ExerciseArgs),

    /// Remove an exercise by id (full UUID or unambiguous prefix).
    Remove {
        exercise: String,
    },

    /// Move the exercise at one position to another (1-based, as shown).
    Move {
        from: usize,
        to: usize,
    },

    /// Append every exercise of a template, with fresh ids.
    Load {
        /// Template id: full UUID or unambiguous prefix.
        template: String,
    },

    /// Reset the draft to empty.
    Clear,

    /// Choose stations for the course.
    Station {
        #[command(subcommand)]
        command: DraftStationCommand,
    },

    /// Set or clear the schedule window.
    Schedule {
        /// First day, e.g. 2026-03-01.
        #[arg(required_unless_present = "clear")]
        start: Option<Date>,

        /// Last day, inclusive.
        #[arg(required_unless_present = "clear")]
        end: Option<Date>,

        /// Remove the schedule window.
        #[arg(long, conflicts_with_all = ["start", "end"])]
        clear: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum DraftStationCommand {
    /// Select a station, or deselect it if already selected.
    Toggle {
        station: String,
    },

    /// Select every station that is not offline.
    All,

    /// Deselect all if every available station is selected, else select all.
    ToggleAll,

    /// Deselect every station.
    Clear,
}

#[derive(Debug, Args)]
pub struct ExerciseArgs {
    /// Exercise type id (see `drill catalog types`).
    #[arg(value_name = "TYPE")]
    type_id: String,

    /// Scenario time in seconds (15 to 300, in steps of 15).
    #[arg(long)]
    time: Option<u32>,

    /// Target id (see `drill catalog targets`).
    #[arg(long)]
    target: Option<String>,

    /// Range in meters (25 to 800, in steps of 25).
    #[arg(long)]
    range: Option<u32>,

    /// Rounds allotted (1 to 30).
    #[arg(long)]
    bullets: Option<u32>,

    #[arg(long, value_enum)]
    position: Option<PositionArg>,

    /// Grouping threshold in cm (5 to 50). Grouping types only.
    #[arg(long)]
    grouping: Option<u32>,

    /// Target speed level (1 to 10). Moving types only.
    #[arg(long)]
    speed: Option<u32>,
}

impl ExerciseArgs {
    /// Apply the given overrides on top of `config`.
    fn apply(&self, config: &mut ExerciseConfig) {
        if let Some(time) = self.time {
            config.scenario_time_seconds = time;
        }
        if let Some(target) = &self.target {
            config.target_id.clone_from(target);
        }
        if let Some(range) = self.range {
            config.range_meters = range;
        }
        if let Some(bullets) = self.bullets {
            config.bullet_count = bullets;
        }
        if let Some(position) = &self.position {
            config.position = position.to_domain();
        }
        if self.grouping.is_some() {
            config.grouping_threshold_cm = self.grouping;
        }
        if self.speed.is_some() {
            config.speed_level = self.speed;
        }
    }
}

/// CLI-facing firing position, mapped to the domain `FiringPosition`.
#[derive(Debug, Clone, ValueEnum)]
pub enum PositionArg {
    Standing,
    Crouching,
    Prone,
}

impl PositionArg {
    fn to_domain(&self) -> FiringPosition {
        match self {
            Self::Standing => FiringPosition::Standing,
            Self::Crouching => FiringPosition::Crouching,
            Self::Prone => FiringPosition::Prone,
        }
    }
}

pub(super) fn run(storage: &Storage, command: DraftCommand) -> Result<(), String> {
    // Clearing must work even when the stored draft is unreadable.
    let mut draft = if matches!(command, DraftCommand::Clear) {
        CourseDraft::new()
    } else {
        storage
            .load_draft()
            .map_err(|e| format!("failed to load draft: {e}"))?
    };

    match command {
        DraftCommand::Show { json } => return cmd_show(&draft, json),
        DraftCommand::Name { name } => draft.set_name(name),
        DraftCommand::Add(args) => cmd_add(&mut draft, &args)?,
        DraftCommand::Remove { exercise } => cmd_remove(&mut draft, &exercise)?,
        DraftCommand::Move { from, to } => cmd_move(&mut draft, from, to)?,
        DraftCommand::Load { template } => cmd_load(storage, &mut draft, &template)?,
        DraftCommand::Station { command } => cmd_station(storage, &mut draft, &command)?,
        DraftCommand::Schedule { start, end, clear } => {
            cmd_schedule(&mut draft, start, end, clear)?;
        }
        DraftCommand::Clear => draft.clear(),
    }

    save(storage, &draft)
}

fn save(storage: &Storage, draft: &CourseDraft) -> Result<(), String> {
    storage
        .save_draft(draft)
        .map_err(|e| format!("failed to save draft: {e}"))
}

fn cmd_show(draft: &CourseDraft, json: bool) -> Result<(), String> {
    if json {
        let json = serde_json::to_string_pretty(draft)
            .map_err(|e| format!("failed to serialize draft: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let name = if draft.name().is_empty() {
        "(unnamed)"
    } else {
        draft.name()
    };
    println!("{name}");

    if draft.exercises().is_empty() {
        println!("No exercises");
    } else {
        for (i, exercise) in draft.exercises().iter().enumerate() {
            println!("{}", format_exercise(i + 1, exercise));
        }
    }

    let totals = draft.derived_totals();
    println!(
        "Total: {} exercises, {}, {} rounds",
        draft.exercises().len(),
        format_minutes(totals.total_time_minutes),
        totals.total_bullets
    );

    if !draft.stations().is_empty() {
        println!("Stations: {}", draft.stations().ids().join(", "));
    }
    if let Some(window) = draft.schedule() {
        println!("Schedule: {}", format_schedule(&window));
    }
    Ok(())
}

fn cmd_add(draft: &mut CourseDraft, args: &ExerciseArgs) -> Result<(), String> {
    let exercise_type = catalog::find_type(&args.type_id)
        .ok_or_else(|| ValidationError::UnknownExerciseType(args.type_id.clone()).to_string())?;

    let mut config = builder::instantiate(exercise_type);
    args.apply(&mut config);

    let exercise = builder::commit(exercise_type, &config).map_err(|e| e.to_string())?;
    eprintln!("Added {} ({})", exercise.type_name, short_id(exercise.id));
    draft.add_exercise(exercise);
    Ok(())
}

fn cmd_remove(draft: &mut CourseDraft, reference: &str) -> Result<(), String> {
    let id = resolve(draft.exercises(), reference, "exercise", |e| e.id)?.id;
    draft.remove_exercise(id);
    Ok(())
}

/// Runs the move through the drag controller, as a pointer drag would.
fn cmd_move(draft: &mut CourseDraft, from: usize, to: usize) -> Result<(), String> {
    let (Some(from), Some(to)) = (from.checked_sub(1), to.checked_sub(1)) else {
        return Err("positions start at 1".to_string());
    };

    let mut drag = DragReorderController::new();
    drag.drag_start(from);
    drag.drag_over(to);
    let moved = drag.drop_on(draft).map_err(|e| e.to_string())?;
    if !moved {
        eprintln!("Nothing to move");
    }
    Ok(())
}

fn cmd_load(storage: &Storage, draft: &mut CourseDraft, reference: &str) -> Result<(), String> {
    let templates = TemplateStore::new(storage).list();
    let template = resolve(&templates, reference, "template", |t| t.id)?;
    let added = draft.load_from_template(template);
    eprintln!("Loaded {added} exercises from '{}'", template.name);
    Ok(())
}

fn cmd_station(
    storage: &Storage,
    draft: &mut CourseDraft,
    command: &DraftStationCommand,
) -> Result<(), String> {
    let roster = storage.stations();
    match command {
        DraftStationCommand::Toggle { station } => draft
            .toggle_station(station, &roster)
            .map_err(|e| e.to_string())?,
        DraftStationCommand::All => draft.select_all_stations(&roster),
        DraftStationCommand::ToggleAll => draft.toggle_all_stations(&roster),
        DraftStationCommand::Clear => draft.clear_stations(),
    }
    eprintln!("{} stations selected", draft.stations().len());
    Ok(())
}

fn cmd_schedule(
    draft: &mut CourseDraft,
    start: Option<Date>,
    end: Option<Date>,
    clear: bool,
) -> Result<(), String> {
    if clear {
        draft.clear_schedule();
        return Ok(());
    }
    let (Some(start), Some(end)) = (start, end) else {
        return Err("specify a start and end date, or --clear".to_string());
    };
    draft
        .set_schedule_window(start, end)
        .map_err(|e| e.to_string())
}

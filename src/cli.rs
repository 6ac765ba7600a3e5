//! CLI interface for Drill.
//!
//! Builds training courses from the command line. Each subcommand is
//! non-interactive: arguments in, text out.
//!
//! The working draft persists between invocations, so a course is built up
//! over several `drill draft ...` calls and saved with `drill course save`.
//!
//! Courses, templates, and draft exercises are referenced by full UUID or
//! an unambiguous prefix.

mod catalog;
mod course;
mod draft;
mod format;
mod station;
mod template;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::config::Config;
use crate::storage::Storage;

use catalog::CatalogCommand;
use course::CourseCommand;
use draft::DraftCommand;
use station::StationCommand;
use template::TemplateCommand;

/// Drill: compose training courses for simulator stations.
#[derive(Debug, Parser)]
#[command(name = "drill", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: building a course
  1. drill draft name 'Basic Drill'
  2. drill draft add grouping --range 50 --bullets 10
  3. drill draft add moving-target --speed 7 --position prone
  4. drill draft station toggle ST-01
  5. drill course save

Reuse:
  drill template save 'Warmup' --description 'first hour'
  drill draft load warm";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse exercise types and targets.
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },

    /// Edit the working draft.
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },

    /// Save, list, and delete reusable templates.
    Template {
        #[command(subcommand)]
        command: TemplateCommand,
    },

    /// Save the draft as a course and manage saved courses.
    Course {
        #[command(subcommand)]
        command: CourseCommand,
    },

    /// Inspect the station roster.
    Station {
        #[command(subcommand)]
        command: StationCommand,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Catalog { command } => catalog::run(&command),
        Command::Draft { command } => draft::run(storage, command),
        Command::Template { command } => template::run(storage, command),
        Command::Course { command } => course::run(config, storage, command),
        Command::Station { command } => station::run(storage, &command),
    }
}

/// Resolve a reference (full UUID or unambiguous prefix) among `items`.
fn resolve<'a, T>(
    items: &'a [T],
    reference: &str,
    kind: &str,
    id_of: impl Fn(&T) -> Uuid,
) -> Result<&'a T, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return items
            .iter()
            .find(|item| id_of(*item) == id)
            .ok_or_else(|| format!("no {kind} with id {id}"));
    }

    let matches: Vec<&T> = items
        .iter()
        .filter(|item| id_of(*item).to_string().starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no {kind} matching '{reference}'")),
        [only] => Ok(*only),
        _ => {
            let ids: Vec<String> = matches.iter().map(|item| short_id(id_of(*item))).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {} {kind}s: {}",
                matches.len(),
                ids.join(", ")
            ))
        }
    }
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

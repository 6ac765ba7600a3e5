//! Catalog commands: types, targets.

use clap::Subcommand;

use crate::catalog::{self, EXERCISE_TYPES, TARGETS};
use crate::error::ValidationError;
use crate::model::{Capabilities, TargetDefinition};

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List exercise types and the optional parameters each accepts.
    Types,

    /// List targets.
    Targets {
        /// Only targets that this exercise type may engage.
        #[arg(long = "type")]
        type_id: Option<String>,
    },
}

pub(super) fn run(command: &CatalogCommand) -> Result<(), String> {
    match command {
        CatalogCommand::Types => {
            for t in EXERCISE_TYPES {
                println!("{:<20} {}", t.id, t.name);
                println!("{:<20} {}", "", t.description);
                let extras = describe_capabilities(t.capabilities);
                if !extras.is_empty() {
                    println!("{:<20} accepts: {extras}", "");
                }
            }
            Ok(())
        }
        CatalogCommand::Targets { type_id } => {
            let targets: Vec<&TargetDefinition> = match type_id {
                Some(id) => {
                    let t = catalog::find_type(id)
                        .ok_or_else(|| ValidationError::UnknownExerciseType(id.clone()).to_string())?;
                    catalog::allowed_targets(t).collect()
                }
                None => TARGETS.iter().collect(),
            };
            for target in targets {
                println!("{:<20} [{}]  {}", target.id, target.category, target.name);
            }
            Ok(())
        }
    }
}

fn describe_capabilities(caps: Capabilities) -> String {
    let mut extras = Vec::new();
    if caps.has_grouping {
        extras.push("--grouping");
    }
    if caps.has_speed {
        extras.push("--speed");
    }
    if caps.includes_vehicles {
        extras.push("vehicle targets");
    }
    extras.join(", ")
}

//! Template commands: save, list, delete.

use clap::Subcommand;

use crate::storage::Storage;
use crate::templates::TemplateStore;

use super::format::format_minutes;
use super::{resolve, short_id};

#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// Save the draft's exercises as a template. Prints the template ID.
    ///
    /// The draft itself is left as it is.
    Save {
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// List templates.
    ///
    /// With `--json`, outputs a JSON array to stdout.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Delete a template.
    Delete {
        /// Template ID: full UUID or unambiguous prefix.
        template: String,
    },
}

pub(super) fn run(storage: &Storage, command: TemplateCommand) -> Result<(), String> {
    let store = TemplateStore::new(storage);

    match command {
        TemplateCommand::Save { name, description } => {
            let draft = storage
                .load_draft()
                .map_err(|e| format!("failed to load draft: {e}"))?;
            let template = store
                .save(&name, description.as_deref(), draft.exercises())
                .map_err(|e| format!("template not saved: {e}"))?;
            println!("{}", template.id);
            Ok(())
        }
        TemplateCommand::List { json } => {
            let templates = store.list();
            if json {
                let json = serde_json::to_string_pretty(&templates)
                    .map_err(|e| format!("failed to serialize templates: {e}"))?;
                println!("{json}");
                return Ok(());
            }

            if templates.is_empty() {
                println!("No templates");
                return Ok(());
            }
            for t in &templates {
                let minutes = t.exercises.iter().map(|e| e.config.scenario_minutes()).sum::<u32>();
                println!(
                    "{}  {}  ({} exercises, {})",
                    short_id(t.id),
                    t.name,
                    t.exercises.len(),
                    format_minutes(minutes)
                );
                if let Some(description) = &t.description {
                    println!("          {description}");
                }
            }
            Ok(())
        }
        TemplateCommand::Delete { template } => {
            let templates = store.list();
            let id = resolve(&templates, &template, "template", |t| t.id)?.id;
            let deleted = store
                .delete(id)
                .map_err(|e| format!("failed to delete template: {e}"))?;
            if !deleted {
                return Err(format!("template {} was already deleted", short_id(id)));
            }
            Ok(())
        }
    }
}

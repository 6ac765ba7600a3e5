//! Template store: named, reusable snapshots of an exercise list.
//!
//! The whole collection lives in one durable slot. Every operation reads
//! the slot fresh, so external edits to the backing store are always seen;
//! writes replace the collection wholesale. Two writers racing on the same
//! slot lose one update (last write wins).

use jiff::Timestamp;
use tracing::info;
use uuid::Uuid;

use crate::error::{SaveError, ValidationError};
use crate::model::{ConfiguredExercise, CourseTemplate};
use crate::storage::StorageError;

/// A durable slot holding the full template collection.
pub trait TemplateSlot {
    /// Read the collection. Missing or corrupt data reads as empty.
    fn read(&self) -> Vec<CourseTemplate>;

    /// Replace the collection.
    fn write(&self, templates: &[CourseTemplate]) -> Result<(), StorageError>;
}

impl<T: TemplateSlot + ?Sized> TemplateSlot for &T {
    fn read(&self) -> Vec<CourseTemplate> {
        (**self).read()
    }

    fn write(&self, templates: &[CourseTemplate]) -> Result<(), StorageError> {
        (**self).write(templates)
    }
}

pub struct TemplateStore<S> {
    slot: S,
}

impl<S: TemplateSlot> TemplateStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Snapshot `exercises` under `name` and append it to the collection.
    pub fn save(
        &self,
        name: &str,
        description: Option<&str>,
        exercises: &[ConfiguredExercise],
    ) -> Result<CourseTemplate, SaveError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if exercises.is_empty() {
            return Err(ValidationError::NoExercises.into());
        }

        let template = CourseTemplate {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
            exercises: exercises.iter().map(ConfiguredExercise::snapshot).collect(),
            created_at: Timestamp::now(),
        };

        let mut templates = self.slot.read();
        templates.push(template.clone());
        self.slot.write(&templates)?;

        info!(id = %template.id, name = %template.name, "saved template");
        Ok(template)
    }

    /// All templates in insertion order, read fresh from the slot.
    pub fn list(&self) -> Vec<CourseTemplate> {
        self.slot.read()
    }

    /// Remove the template with `id`. Returns whether one was removed.
    ///
    /// The slot is not rewritten when nothing matches.
    pub fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut templates = self.slot.read();
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Ok(false);
        }
        self.slot.write(&templates)?;
        info!(%id, "deleted template");
        Ok(true)
    }
}

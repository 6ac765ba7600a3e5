//! Slot storage: whole documents kept under a single key.
//!
//! The template collection and the working draft each occupy one slot.
//! A write replaces the document; there is no merging.

use rusqlite::OptionalExtension;
use tracing::warn;

use crate::builder;
use crate::draft::CourseDraft;
use crate::error::ValidationError;
use crate::model::CourseTemplate;
use crate::templates::TemplateSlot;

use super::{Result, Storage, StorageError};

const TEMPLATES: &str = "templates";
const DRAFT: &str = "draft";

impl Storage {
    /// Reads the raw document in `key`, if any.
    pub fn read_slot(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM slot WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?)
    }

    /// Replaces the document in `key`.
    pub fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO slot (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    /// Loads the working draft. A missing slot is an empty draft.
    ///
    /// Every exercise is checked against the catalog; one that no longer
    /// validates makes the whole draft corrupt.
    pub fn load_draft(&self) -> Result<CourseDraft> {
        let Some(json) = self.read_slot(DRAFT)? else {
            return Ok(CourseDraft::new());
        };
        let draft: CourseDraft = serde_json::from_str(&json)
            .map_err(|e| StorageError::Corrupt(format!("invalid draft: {e}")))?;
        for exercise in draft.exercises() {
            builder::revalidate(&exercise.type_id, &exercise.config).map_err(|e| {
                StorageError::Corrupt(format!("invalid exercise {} in draft: {e}", exercise.id))
            })?;
        }
        Ok(draft)
    }

    /// Persists the working draft, replacing the previous one.
    pub fn save_draft(&self, draft: &CourseDraft) -> Result<()> {
        let json = serde_json::to_string(draft)?;
        self.write_slot(DRAFT, &json)
    }
}

fn check_template(template: &CourseTemplate) -> core::result::Result<(), ValidationError> {
    if template.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if template.exercises.is_empty() {
        return Err(ValidationError::NoExercises);
    }
    template
        .exercises
        .iter()
        .try_for_each(|s| builder::revalidate(&s.type_id, &s.config))
}

impl TemplateSlot for Storage {
    fn read(&self) -> Vec<CourseTemplate> {
        let json = match self.read_slot(TEMPLATES) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("failed to read templates, treating as empty: {e}");
                return Vec::new();
            }
        };
        let templates: Vec<CourseTemplate> = serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!("template slot is corrupt, treating as empty: {e}");
            Vec::new()
        });
        templates
            .into_iter()
            .filter(|t| match check_template(t) {
                Ok(()) => true,
                Err(e) => {
                    warn!(id = %t.id, name = %t.name, "skipping invalid template: {e}");
                    false
                }
            })
            .collect()
    }

    fn write(&self, templates: &[CourseTemplate]) -> Result<()> {
        let json = serde_json::to_string(templates)?;
        self.write_slot(TEMPLATES, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use uuid::Uuid;

    use crate::builder;
    use crate::catalog::find_type;
    use crate::storage::test_storage;
    use crate::templates::TemplateStore;

    fn sample_template() -> CourseTemplate {
        let t = find_type("grouping").unwrap();
        let exercise = builder::commit(t, &builder::instantiate(t)).unwrap();
        CourseTemplate {
            id: Uuid::new_v4(),
            name: "Basic Drill".into(),
            description: Some("Two-minute warm-up".into()),
            exercises: vec![exercise.snapshot()],
            created_at: Timestamp::now(),
        }
    }

    #[test]
    fn read_missing_slot_is_none() {
        let (_dir, storage) = test_storage();
        assert_eq!(storage.read_slot("nothing").unwrap(), None);
    }

    #[test]
    fn write_slot_replaces_value() {
        let (_dir, storage) = test_storage();
        storage.write_slot("k", "one").unwrap();
        storage.write_slot("k", "two").unwrap();
        assert_eq!(storage.read_slot("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn templates_round_trip() {
        let (_dir, storage) = test_storage();
        let template = sample_template();

        storage.write(std::slice::from_ref(&template)).unwrap();

        assert_eq!(storage.read(), vec![template]);
    }

    #[test]
    fn missing_templates_read_as_empty() {
        let (_dir, storage) = test_storage();
        assert!(storage.read().is_empty());
    }

    #[test]
    fn corrupt_templates_read_as_empty() {
        let (_dir, storage) = test_storage();
        storage.write_slot(TEMPLATES, "{not json").unwrap();
        assert!(storage.read().is_empty());

        // Well-formed JSON of the wrong shape is corrupt too.
        storage.write_slot(TEMPLATES, r#"{"name":"x"}"#).unwrap();
        assert!(storage.read().is_empty());
    }

    #[test]
    fn templates_that_fail_validation_are_skipped() {
        let (_dir, storage) = test_storage();
        let valid = sample_template();
        let slot = serde_json::json!([
            {
                "id": Uuid::new_v4(),
                "name": "Out of bounds",
                "exercises": [{
                    "typeId": "qualification",
                    "typeName": "Qualification",
                    "config": {
                        "scenarioTimeSeconds": 7,
                        "targetId": "apc",
                        "rangeMeters": 1,
                        "bulletCount": 4_000_000_000_u32,
                        "position": "standing",
                        "speedLevel": 99
                    }
                }],
                "createdAt": "2026-01-01T00:00:00Z"
            },
            {
                "id": Uuid::new_v4(),
                "name": "Unknown type",
                "exercises": [{
                    "typeId": "nope",
                    "typeName": "Nope",
                    "config": valid.exercises[0].config
                }],
                "createdAt": "2026-01-01T00:00:00Z"
            },
            valid
        ]);
        storage.write_slot(TEMPLATES, &slot.to_string()).unwrap();

        let templates = storage.read();

        assert_eq!(templates, vec![valid]);
        let mut draft = CourseDraft::new();
        for t in &templates {
            draft.load_from_template(t);
        }
        assert_eq!(draft.derived_totals().total_bullets, 5);
    }

    #[test]
    fn draft_with_invalid_exercise_is_corrupt() {
        let (_dir, storage) = test_storage();
        let mut draft = CourseDraft::new();
        draft.load_from_template(&sample_template());
        let mut json = serde_json::to_value(&draft).unwrap();
        json["exercises"][0]["config"]["rangeMeters"] = 1.into();
        storage.write_slot(DRAFT, &json.to_string()).unwrap();

        assert!(matches!(
            storage.load_draft().unwrap_err(),
            StorageError::Corrupt(_)
        ));
    }

    #[test]
    fn store_recovers_from_corrupt_slot_on_next_save() {
        let (_dir, storage) = test_storage();
        storage.write_slot(TEMPLATES, "garbage").unwrap();

        let store = TemplateStore::new(storage);
        let t = find_type("qualification").unwrap();
        let exercise = builder::commit(t, &builder::instantiate(t)).unwrap();
        store.save("Fresh", None, &[exercise]).unwrap();

        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn missing_draft_loads_empty() {
        let (_dir, storage) = test_storage();
        assert_eq!(storage.load_draft().unwrap(), CourseDraft::new());
    }

    #[test]
    fn draft_round_trip() {
        let (_dir, storage) = test_storage();
        let mut draft = CourseDraft::new();
        draft.set_name("Evening");
        draft.load_from_template(&sample_template());

        storage.save_draft(&draft).unwrap();

        assert_eq!(storage.load_draft().unwrap(), draft);
    }

    #[test]
    fn corrupt_draft_is_an_error() {
        let (_dir, storage) = test_storage();
        storage.write_slot(DRAFT, "[]").unwrap();
        assert!(matches!(
            storage.load_draft().unwrap_err(),
            StorageError::Corrupt(_)
        ));
    }
}

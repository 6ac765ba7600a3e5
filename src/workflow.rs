//! Saving a draft as a course, and the confirmation that follows.
//!
//! ```text
//! Idle -> Validating -> Rejected -> Idle
//!                    -> Persisted -> ConfirmationShown -> Idle
//! ```
//!
//! A successful submit persists a deep copy of the draft, clears the
//! draft, and shows a confirmation carrying the saved course's name and id.
//! Stations picked on the draft are re-read from the roster at submit; any
//! that went offline in the meantime are left off the course with a warning.
//! The confirmation closes on its own once the countdown runs out, unless
//! the operator interacts with it first. Any interaction cancels the
//! countdown for good.

mod countdown;

pub use countdown::{Clock, Countdown, SystemClock};

use jiff::SignedDuration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::draft::CourseDraft;
use crate::error::{SaveError, ValidationError};
use crate::model::{Course, CourseStatus, CourseTotals};
use crate::notify::{Notifier, Severity};
use crate::stations::{StationAssigner, StationAssignmentFlow, StationRoster};
use crate::storage::StorageError;

/// Where saved courses go. Append-only.
pub trait CourseRepository {
    fn insert_course(&self, course: &Course) -> Result<(), StorageError>;
}

impl<T: CourseRepository + ?Sized> CourseRepository for &T {
    fn insert_course(&self, course: &Course) -> Result<(), StorageError> {
        (**self).insert_course(course)
    }
}

/// How long a confirmation stays up without interaction.
pub const DEFAULT_CONFIRMATION: SignedDuration = SignedDuration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Validating,
    Rejected,
    Persisted,
    ConfirmationShown(Confirmation),
}

/// What the confirmation displays, captured when the course was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub course_id: Uuid,
    pub course_name: String,

    /// Offered only when the course was saved without stations.
    pub offers_station_assignment: bool,
}

/// How a confirmation was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    AutoDismissed,
    UserDismissed,
    UserRequestedStationAssignment,
}

pub struct CourseSaveWorkflow<S, N, C> {
    store: S,
    notifier: N,
    clock: C,
    confirmation_duration: SignedDuration,
    state: SaveState,
    countdown: Countdown,
    last_dismissal: Option<Dismissal>,
}

impl<S, N, C> CourseSaveWorkflow<S, N, C>
where
    S: CourseRepository + StationAssigner + StationRoster,
    N: Notifier,
    C: Clock,
{
    pub fn new(store: S, notifier: N, clock: C) -> Self {
        Self {
            store,
            notifier,
            clock,
            confirmation_duration: DEFAULT_CONFIRMATION,
            state: SaveState::Idle,
            countdown: Countdown::new(),
            last_dismissal: None,
        }
    }

    #[must_use]
    pub fn with_confirmation_duration(mut self, duration: SignedDuration) -> Self {
        self.confirmation_duration = duration;
        self
    }

    pub fn state(&self) -> &SaveState {
        &self.state
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        match &self.state {
            SaveState::ConfirmationShown(c) => Some(c),
            _ => None,
        }
    }

    pub fn last_dismissal(&self) -> Option<Dismissal> {
        self.last_dismissal
    }

    /// Time left before the confirmation closes itself.
    pub fn time_remaining(&self) -> Option<SignedDuration> {
        self.countdown.remaining(self.clock.now())
    }

    /// Validate and persist `draft` as a new course.
    ///
    /// On success the draft is cleared. On any failure the draft is left
    /// exactly as it was and the workflow returns to `Idle`.
    pub fn submit(&mut self, draft: &mut CourseDraft) -> Result<Course, SaveError> {
        // A confirmation still on screen is replaced by this submit.
        self.countdown.cancel();
        self.transition(SaveState::Validating);

        if let Err(e) = validate_draft(draft) {
            self.transition(SaveState::Rejected);
            self.notifier
                .notify("Cannot save course", &e.to_string(), Severity::Error);
            self.transition(SaveState::Idle);
            return Err(e.into());
        }

        let (stations, unavailable) = self.live_stations(draft);
        let course = snapshot(draft, stations, self.clock.now());
        if let Err(e) = self.store.insert_course(&course) {
            self.notifier.notify(
                "Save failed",
                &format!("course '{}' was not saved: {e}", course.name),
                Severity::Error,
            );
            self.transition(SaveState::Idle);
            return Err(e.into());
        }
        self.transition(SaveState::Persisted);
        info!(id = %course.id, name = %course.name, "saved course");

        for station_id in &unavailable {
            self.notifier.notify(
                "Station unavailable",
                &format!("station {station_id} went offline; course not assigned to it"),
                Severity::Warning,
            );
        }
        for station_id in &course.assigned_stations {
            if let Err(e) = self.store.assign_course_to_station(course.id, station_id) {
                self.notifier.notify(
                    "Station assignment failed",
                    &format!("station {station_id}: {e}"),
                    Severity::Warning,
                );
            }
        }

        draft.clear();
        self.notifier.notify(
            "Course saved",
            &format!("'{}' ({} exercises)", course.name, course.total_exercise_count),
            Severity::Success,
        );

        self.countdown
            .arm(self.clock.now(), self.confirmation_duration);
        self.transition(SaveState::ConfirmationShown(Confirmation {
            course_id: course.id,
            course_name: course.name.clone(),
            offers_station_assignment: course.assigned_stations.is_empty(),
        }));
        Ok(course)
    }

    /// Close the confirmation if its countdown has run out.
    pub fn poll(&mut self) -> Option<Dismissal> {
        if self.confirmation().is_none() || !self.countdown.is_due(self.clock.now()) {
            return None;
        }
        Some(self.close(Dismissal::AutoDismissed))
    }

    /// The operator closed the confirmation.
    pub fn dismiss(&mut self) -> Option<Dismissal> {
        self.confirmation()?;
        Some(self.close(Dismissal::UserDismissed))
    }

    /// The confirmation was explicitly opened or closed.
    ///
    /// Either way the countdown stops. Opening keeps it on screen until the
    /// operator closes it.
    pub fn set_dialog_open(&mut self, open: bool) -> Option<Dismissal> {
        self.confirmation()?;
        if self.countdown.is_armed() {
            debug!("confirmation countdown cancelled");
        }
        self.countdown.cancel();
        if open {
            debug!("confirmation held open");
            None
        } else {
            Some(self.close(Dismissal::UserDismissed))
        }
    }

    /// Leave the confirmation to pick stations for the saved course.
    ///
    /// Returns `None`, changing nothing, when no confirmation is shown or it
    /// does not offer assignment.
    pub fn request_station_assignment(&mut self) -> Option<StationAssignmentFlow> {
        let confirmation = self.confirmation()?;
        if !confirmation.offers_station_assignment {
            return None;
        }
        let flow = StationAssignmentFlow::new(confirmation.course_id);
        self.close(Dismissal::UserRequestedStationAssignment);
        Some(flow)
    }

    /// Split the draft's stations into those still assignable and those that
    /// are now offline or gone from the roster.
    fn live_stations(&self, draft: &CourseDraft) -> (Vec<String>, Vec<String>) {
        let roster = self.store.stations();
        draft.stations().ids().into_iter().partition(|id| {
            roster
                .iter()
                .any(|station| station.id == *id && station.is_assignable())
        })
    }

    fn close(&mut self, dismissal: Dismissal) -> Dismissal {
        self.countdown.cancel();
        self.last_dismissal = Some(dismissal);
        debug!(?dismissal, "confirmation closed");
        self.transition(SaveState::Idle);
        dismissal
    }

    fn transition(&mut self, next: SaveState) {
        debug!(from = ?self.state, to = ?next, "save workflow transition");
        self.state = next;
    }
}

fn validate_draft(draft: &CourseDraft) -> Result<(), ValidationError> {
    if draft.name().trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if draft.exercises().is_empty() {
        return Err(ValidationError::NoExercises);
    }
    Ok(())
}

/// Deep copy of the draft as a course.
fn snapshot(draft: &CourseDraft, stations: Vec<String>, now: jiff::Timestamp) -> Course {
    let totals = CourseTotals::of(draft.exercises());
    let schedule = draft.schedule();
    Course {
        id: Uuid::new_v4(),
        name: draft.name().trim().to_string(),
        exercises: draft.exercises().to_vec(),
        created_at: now,
        total_time_minutes: totals.total_time_minutes,
        total_exercise_count: draft.exercises().len(),
        status: if schedule.is_some() {
            CourseStatus::Scheduled
        } else {
            CourseStatus::Active
        },
        assigned_stations: stations,
        schedule,
    }
}

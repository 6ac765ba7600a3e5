//! A cancellable deadline, checked against an injected clock.

use jiff::{SignedDuration, Timestamp};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A single pending deadline. Arming replaces any previous deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    deadline: Option<Timestamp>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now: Timestamp, duration: SignedDuration) {
        self.cancel();
        self.deadline = Some(now + duration);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether an armed deadline has been reached.
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self, now: Timestamp) -> Option<SignedDuration> {
        self.deadline
            .map(|d| d.duration_since(now).max(SignedDuration::ZERO))
    }
}

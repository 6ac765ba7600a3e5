//! Operator-visible notices.

use std::fmt;

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "ok"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Somewhere to surface feedback to the operator.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str, severity: Severity);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        (**self).notify(title, message, severity);
    }
}

/// Writes notices to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Warning | Severity::Error => warn!(%severity, title, message),
            Severity::Info | Severity::Success => info!(%severity, title, message),
        }
        eprintln!("[{severity}] {title}: {message}");
    }
}

/// Told when the expiry timer ends a session, before the token is cleared.
///
/// Implementations must not block the runtime for long; a UI would raise a
/// toast here rather than a modal dialog.
pub trait ExpiryNotifier: Send + Sync {
    fn session_expired(&self);
}

/// Reports expiry through the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl ExpiryNotifier for LogNotifier {
    fn session_expired(&self) {
        tracing::warn!("⏰ Your session has expired. Please login again.");
    }
}

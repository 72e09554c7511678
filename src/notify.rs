/// Transient user-facing notifications (the toast channel). Nothing here is
/// persisted; production routes notices into the log stream and an embedding
/// UI is expected to provide its own implementation.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!("notice: {}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!("notice: {}", message);
    }
}

#[cfg(test)]
pub use test_support::{BufferNotifier, Notice, NoticeLevel};

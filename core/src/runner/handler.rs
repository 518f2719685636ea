use tokio::sync::mpsc;

use super::RunnerEvent;

/// Trait for systems that react to runner transitions.
/// Implement this for cue dispatch, displays, loggers, etc.
pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &RunnerEvent);

    /// Handle multiple events (default implementation calls handle_event for each)
    fn handle_events(&mut self, events: &[RunnerEvent]) {
        for event in events {
            self.handle_event(event);
        }
    }
}

/// Forward events to another task. A closed receiver is ignored.
impl EventHandler for mpsc::UnboundedSender<RunnerEvent> {
    fn handle_event(&mut self, event: &RunnerEvent) {
        if self.send(event.clone()).is_err() {
            tracing::debug!(seq = event.seq, "Event subscriber gone");
        }
    }
}

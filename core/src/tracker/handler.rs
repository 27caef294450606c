use super::TrackerSignal;
use super::TrackerState;

/// Trait for systems that react to tracker signals.
/// Implement this for persistence, front-end refresh, logging, etc.
pub trait SignalHandler {
    /// Handle a single signal with read access to the committed state.
    fn handle_signal(&mut self, signal: &TrackerSignal, state: &TrackerState);

    /// Handle multiple signals (default implementation calls handle_signal for each)
    fn handle_signals(&mut self, signals: &[TrackerSignal], state: &TrackerState) {
        for signal in signals {
            self.handle_signal(signal, state);
        }
    }

    /// Called once per dispatch after every signal has been delivered
    fn on_commit(&mut self, _state: &TrackerState) {}
}

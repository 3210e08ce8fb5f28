//! Debounced undo/redo over full editor snapshots

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::state::EditorState;

/// Quiet period after the last edit before a snapshot is taken
pub const HISTORY_DEBOUNCE: Duration = Duration::from_millis(500);

/// Window after undo/redo during which edits are not captured
pub const RESTORE_SUPPRESSION: Duration = Duration::from_millis(100);

pub const MAX_HISTORY_SIZE: usize = 50;

/// Cancelable one-shot timer. Arming an armed timer pushes its deadline back.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before the timer fires
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Disarm and return true once the deadline has passed
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Bounded snapshot stack with a cursor.
///
/// Snapshots are captured by the debounce timer rather than per operation, so
/// a burst of edits collapses into one undo step.
#[derive(Debug)]
pub struct History {
    snapshots: VecDeque<EditorState>,
    index: usize,
    capacity: usize,
    timer: DebounceTimer,
    suppress_until: Option<Instant>,
    /// The capture right after a load reflects the load itself, not a user edit
    awaiting_initial_capture: bool,
    dirty: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            index: 0,
            capacity: capacity.max(1),
            timer: DebounceTimer::new(HISTORY_DEBOUNCE),
            suppress_until: None,
            awaiting_initial_capture: false,
            dirty: false,
        }
    }

    /// Start a fresh history from a loaded document
    pub fn load(&mut self, state: EditorState, now: Instant) {
        self.snapshots.clear();
        self.snapshots.push_back(state);
        self.index = 0;
        self.suppress_until = None;
        self.awaiting_initial_capture = true;
        self.dirty = false;
        self.timer.arm(now);
    }

    /// An edit happened; (re)start the quiet-period timer
    pub fn notify_change(&mut self, now: Instant) {
        if self.snapshots.is_empty() || self.is_suppressed(now) {
            return;
        }
        self.timer.arm(now);
    }

    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.suppress_until.is_some_and(|until| now < until)
    }

    /// Capture `current` if the debounce timer has fired. Returns true when a
    /// new snapshot was recorded.
    pub fn poll(&mut self, now: Instant, current: &EditorState) -> bool {
        if !self.timer.fire_if_due(now) {
            return false;
        }
        let recorded = self.record(current);
        if self.awaiting_initial_capture {
            self.awaiting_initial_capture = false;
        } else if recorded {
            self.dirty = true;
        }
        recorded
    }

    /// Append a snapshot unless it equals the current one
    pub fn record(&mut self, state: &EditorState) -> bool {
        if self.current() == Some(state) {
            return false;
        }

        // Drop the redo branch
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push_back(state.clone());
        if self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
        self.index = self.snapshots.len() - 1;
        true
    }

    pub fn undo(&mut self, now: Instant) -> Option<&EditorState> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.begin_restore(now);
        self.snapshots.get(self.index)
    }

    pub fn redo(&mut self, now: Instant) -> Option<&EditorState> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.begin_restore(now);
        self.snapshots.get(self.index)
    }

    fn begin_restore(&mut self, now: Instant) {
        self.timer.cancel();
        self.suppress_until = Some(now + RESTORE_SUPPRESSION);
    }

    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty() && self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn current(&self) -> Option<&EditorState> {
        self.snapshots.get(self.index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// A capture is scheduled
    pub fn is_pending(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn time_until_capture(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_bpm(bpm: f64) -> EditorState {
        EditorState { bpm, ..Default::default() }
    }

    #[test]
    fn test_debounce_rearms() {
        let t0 = Instant::now();
        let mut timer = DebounceTimer::new(HISTORY_DEBOUNCE);
        timer.arm(t0);
        timer.arm(t0 + Duration::from_millis(400));
        assert!(!timer.fire_if_due(t0 + Duration::from_millis(600)));
        assert!(timer.fire_if_due(t0 + Duration::from_millis(900)));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_skip_unchanged_snapshot() {
        let mut history = History::new();
        history.load(state_with_bpm(120.0), Instant::now());
        assert!(!history.record(&state_with_bpm(120.0)));
        assert!(history.record(&state_with_bpm(130.0)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new();
        let t0 = Instant::now();
        history.load(state_with_bpm(0.5), t0);
        for i in 1..=60 {
            history.record(&state_with_bpm(i as f64));
        }
        assert_eq!(history.len(), MAX_HISTORY_SIZE);

        let mut now = t0;
        for _ in 0..50 {
            now += Duration::from_secs(1);
            history.undo(now);
        }
        // 61 snapshots were taken, the 11 oldest are gone
        assert_eq!(history.current().map(|s| s.bpm), Some(11.0));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_new_edit_discards_redo_branch() {
        let mut history = History::new();
        let t0 = Instant::now();
        history.load(state_with_bpm(100.0), t0);
        history.record(&state_with_bpm(110.0));
        history.record(&state_with_bpm(120.0));
        history.undo(t0);
        history.undo(t0);
        assert!(history.can_redo());
        history.record(&state_with_bpm(90.0));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_first_capture_after_load_is_clean() {
        let mut history = History::new();
        let t0 = Instant::now();
        history.load(state_with_bpm(100.0), t0);

        // Edit lands inside the load's quiet period and is folded into it
        history.notify_change(t0 + Duration::from_millis(200));
        assert!(history.poll(t0 + Duration::from_millis(800), &state_with_bpm(105.0)));
        assert!(!history.is_dirty());

        history.notify_change(t0 + Duration::from_secs(2));
        assert!(!history.poll(t0 + Duration::from_millis(2100), &state_with_bpm(110.0)));
        assert!(history.poll(t0 + Duration::from_millis(2600), &state_with_bpm(110.0)));
        assert!(history.is_dirty());

        history.mark_saved();
        assert!(!history.is_dirty());
    }

    #[test]
    fn test_changes_ignored_while_restoring() {
        let mut history = History::new();
        let t0 = Instant::now();
        history.load(state_with_bpm(100.0), t0);
        history.record(&state_with_bpm(110.0));
        let now = t0 + Duration::from_secs(5);
        history.undo(now);
        history.notify_change(now + Duration::from_millis(50));
        assert!(!history.is_pending());
        history.notify_change(now + Duration::from_millis(150));
        assert!(history.is_pending());
    }
}

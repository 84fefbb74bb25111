use std::time::Duration;

use serde_with::serde_as;
use serde_with::DurationMilliSeconds;

/// Play time measured on the session clock. `started_at` is the instant the
/// board became interactive.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimerState {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub started_at: Duration,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    pub ended_at: Option<Duration>,
}

impl TimerState {
    pub fn started(now: Duration) -> TimerState {
        TimerState {
            started_at: now,
            ended_at: None,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        self.ended_at
            .unwrap_or(now)
            .saturating_sub(self.started_at)
    }

    /// Whole seconds played, rounded down.
    pub fn elapsed_seconds(&self, now: Duration) -> u64 {
        self.elapsed(now).as_secs()
    }

    pub fn ended(&self, now: Duration) -> TimerState {
        let mut new_state = self.clone();
        if new_state.ended_at.is_none() {
            new_state.ended_at = Some(now);
        }
        new_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_running() {
        let timer = TimerState::started(Duration::from_secs(10));
        assert_eq!(timer.elapsed(Duration::from_millis(15_500)), Duration::from_millis(5_500));
        assert_eq!(timer.elapsed_seconds(Duration::from_millis(15_999)), 5);
    }

    #[test]
    fn test_elapsed_with_end() {
        let timer = TimerState::started(Duration::from_secs(10)).ended(Duration::from_secs(40));
        assert!(timer.is_ended());
        assert_eq!(timer.elapsed(Duration::from_secs(99)), Duration::from_secs(30));
    }

    #[test]
    fn test_end_is_sticky() {
        let timer = TimerState::started(Duration::ZERO)
            .ended(Duration::from_secs(3))
            .ended(Duration::from_secs(8));
        assert_eq!(timer.ended_at, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_serialized_as_millis() {
        let timer = TimerState::started(Duration::from_millis(10_250));
        let json = serde_json::to_value(&timer).unwrap();
        assert_eq!(json, serde_json::json!({"started_at": 10250, "ended_at": null}));
    }
}

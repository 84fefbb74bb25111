use std::time::Duration;

use log::debug;
use uuid::Uuid;

use super::scheduler::{Scheduler, TaskHandle, TaskPriority};
use crate::model::{GameTask, SessionTask};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    Running(u32),
    Expired,
}

/// Per-second countdown driven by the session scheduler. Only one tick is
/// ever outstanding.
#[derive(Debug)]
pub struct Countdown {
    limit_seconds: u32,
    remaining_seconds: u32,
    tick_handle: Option<TaskHandle>,
}

impl Countdown {
    pub fn new(limit_seconds: u32) -> Self {
        Self {
            limit_seconds,
            remaining_seconds: limit_seconds,
            tick_handle: None,
        }
    }

    pub fn limit_seconds(&self) -> u32 {
        self.limit_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.tick_handle.is_some()
    }

    pub fn start(&mut self, scheduler: &mut Scheduler<SessionTask>, session_id: Uuid) {
        self.stop(scheduler);
        self.schedule_tick(scheduler, session_id);
    }

    pub fn stop(&mut self, scheduler: &mut Scheduler<SessionTask>) {
        if let Some(handle) = self.tick_handle.take() {
            scheduler.cancel(handle);
        }
    }

    /// Stops ticking and restores the full time limit.
    pub fn reset(&mut self, scheduler: &mut Scheduler<SessionTask>) {
        self.stop(scheduler);
        self.remaining_seconds = self.limit_seconds;
    }

    /// Called when the tick scheduled by this countdown fires.
    pub fn on_tick(
        &mut self,
        scheduler: &mut Scheduler<SessionTask>,
        session_id: Uuid,
    ) -> CountdownStatus {
        self.tick_handle = None;
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            debug!(target: "countdown", "Countdown expired");
            return CountdownStatus::Expired;
        }
        self.schedule_tick(scheduler, session_id);
        CountdownStatus::Running(self.remaining_seconds)
    }

    fn schedule_tick(&mut self, scheduler: &mut Scheduler<SessionTask>, session_id: Uuid) {
        let handle = scheduler.schedule(
            TICK,
            TaskPriority::Tick,
            SessionTask::new(session_id, GameTask::CountdownTick),
        );
        self.tick_handle = Some(handle);
    }
}

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// First run: setup, then a cycle.
    Loading,
    /// Later runs reuse what loading set up.
    Reloading,
}

#[derive(Debug, Default)]
struct RunState {
    phase: Phase,
    launched: bool,
}

/// Lets at most one cycle run at a time. Ticks arriving while one is in
/// flight are dropped, not queued.
#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    state: Arc<Mutex<RunState>>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims the guard, or `None` when a cycle is already running.
    pub fn try_begin(&self) -> Option<RunTicket> {
        let mut state = self.lock();
        if state.phase != Phase::Idle {
            return None;
        }
        state.phase = if state.launched { Phase::Reloading } else { Phase::Loading };
        Some(RunTicket { guard: self.clone(), phase: state.phase })
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.phase() != Phase::Idle
    }

    pub fn launched(&self) -> bool {
        self.lock().launched
    }
}

/// Held for the duration of one run. Dropping it returns the guard to
/// `Idle`, on success, error and panic alike.
#[derive(Debug)]
pub struct RunTicket {
    guard: RunGuard,
    phase: Phase,
}

impl RunTicket {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Marks the run successful; the first successful load sets `launched`.
    pub fn complete(self) {
        if self.phase == Phase::Loading {
            self.guard.lock().launched = true;
        }
    }
}

impl Drop for RunTicket {
    fn drop(&mut self) {
        self.guard.lock().phase = Phase::Idle;
    }
}

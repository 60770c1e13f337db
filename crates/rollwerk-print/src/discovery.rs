// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-transport discovery session state machines.
//
// One session per transport, process-wide, owned by the engine thread.
// Restarting a live session is last-writer-wins: the generation counter
// bumps and callbacks carrying a stale generation are dropped, so a
// replaced session can never emit into the new one's stream.

use std::time::{Duration, Instant};

use tracing::debug;

/// Lifecycle of a discovery session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Searching,
    /// Network only: the driver delivered its one-shot result batch.
    Completed,
    /// Network only: the watchdog fired before the driver completed.
    TimedOut,
    /// Beacon only: explicitly stopped by the caller.
    Stopped,
}

/// Time-bounded network search with an exactly-once completion guarantee.
pub struct NetworkSession {
    phase: SessionPhase,
    generation: u64,
    deadline: Option<Instant>,
}

impl NetworkSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            generation: 0,
            deadline: None,
        }
    }

    /// Begin a search.  Replaces any live session (last-writer-wins) and
    /// returns the new generation for the completion callback to carry.
    /// The watchdog duration already includes the driver grace allowance.
    pub fn start(&mut self, watchdog: Duration) -> u64 {
        if self.phase == SessionPhase::Searching {
            debug!(
                generation = self.generation,
                "live network session replaced"
            );
        }
        self.generation += 1;
        self.phase = SessionPhase::Searching;
        self.deadline = Some(Instant::now() + watchdog);
        self.generation
    }

    /// Watchdog deadline of the live search, if one is running.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Driver completion arrived.  Returns false for stale generations and
    /// for sessions the watchdog already expired — the batch must then be
    /// dropped, keeping completion exactly-once.
    pub fn complete(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.phase != SessionPhase::Searching {
            return false;
        }
        self.phase = SessionPhase::Completed;
        self.deadline = None;
        true
    }

    /// Watchdog fired.  Returns true if a live search actually expired.
    pub fn expire(&mut self) -> bool {
        self.deadline = None;
        if self.phase != SessionPhase::Searching {
            return false;
        }
        self.phase = SessionPhase::TimedOut;
        true
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }
}

/// Streaming beacon search, bounded only by an explicit stop.
pub struct BeaconSession {
    phase: SessionPhase,
    generation: u64,
}

impl BeaconSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            generation: 0,
        }
    }

    /// Begin a search, replacing any live one (last-writer-wins).
    pub fn start(&mut self) -> u64 {
        if self.phase == SessionPhase::Searching {
            debug!(generation = self.generation, "live beacon session replaced");
        }
        self.generation += 1;
        self.phase = SessionPhase::Searching;
        self.generation
    }

    /// Whether a device arrival carrying this generation may be emitted.
    pub fn accepts(&self, generation: u64) -> bool {
        self.phase == SessionPhase::Searching && generation == self.generation
    }

    /// Stop the search.  Idempotent: returns true only on the transition
    /// out of `Searching`, so the driver is told to stop at most once.
    pub fn stop(&mut self) -> bool {
        if self.phase != SessionPhase::Searching {
            return false;
        }
        self.phase = SessionPhase::Stopped;
        true
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_completion_is_exactly_once() {
        let mut session = NetworkSession::new();
        let generation = session.start(Duration::from_secs(7));
        assert_eq!(session.phase(), SessionPhase::Searching);
        assert!(session.deadline().is_some());

        assert!(session.complete(generation));
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert!(session.deadline().is_none());

        // A second delivery for the same generation is dropped.
        assert!(!session.complete(generation));
    }

    #[test]
    fn stale_network_completion_is_dropped_after_restart() {
        let mut session = NetworkSession::new();
        let first = session.start(Duration::from_secs(7));
        let second = session.start(Duration::from_secs(7));
        assert_ne!(first, second);

        assert!(!session.complete(first));
        assert!(session.complete(second));
    }

    #[test]
    fn expired_session_rejects_late_completion() {
        let mut session = NetworkSession::new();
        let generation = session.start(Duration::from_secs(7));

        assert!(session.expire());
        assert_eq!(session.phase(), SessionPhase::TimedOut);
        assert!(!session.complete(generation));

        // Expiring again is a no-op.
        assert!(!session.expire());
    }

    #[test]
    fn beacon_stop_is_idempotent() {
        let mut session = BeaconSession::new();
        let generation = session.start();
        assert!(session.accepts(generation));

        assert!(session.stop());
        assert_eq!(session.phase(), SessionPhase::Stopped);
        assert!(!session.accepts(generation));

        assert!(!session.stop());
        // Stopping before any search is also a no-op.
        assert!(!BeaconSession::new().stop());
    }

    #[test]
    fn beacon_restart_invalidates_old_generation() {
        let mut session = BeaconSession::new();
        let first = session.start();
        let second = session.start();
        assert!(!session.accepts(first));
        assert!(session.accepts(second));
    }
}

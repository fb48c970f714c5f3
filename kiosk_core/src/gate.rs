use chrono::{Duration, NaiveDateTime};
use log::debug;

use crate::config::*;
use crate::tally::VoteTally;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum GateState {
    Open,
    Closed { until: NaiveDateTime },
}

/// Throttles the voting buttons: after each accepted vote, further votes are
/// rejected for a short cooldown.
///
/// The kiosk is anonymous, so this is the only protection against a double
/// tap being counted twice.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VotingGate {
    state: GateState,
}

impl Default for VotingGate {
    fn default() -> Self {
        VotingGate {
            state: GateState::Open,
        }
    }
}

impl VotingGate {
    pub fn cooldown() -> Duration {
        Duration::milliseconds(VOTE_COOLDOWN_MS)
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// A closed gate counts as open as soon as its cooldown is over, even if
    /// the reopening task did not run yet.
    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        match self.state {
            GateState::Open => true,
            GateState::Closed { until } => now >= until,
        }
    }

    /// Records the vote if the gate is open and closes the gate.
    ///
    /// Returns the time at which the gate opens again.
    pub fn try_vote(
        &mut self,
        tally: &mut VoteTally,
        category: Category,
        now: NaiveDateTime,
    ) -> Result<NaiveDateTime, KioskError> {
        if !self.is_open(now) {
            debug!("try_vote: rejected {:?} at {}, gate {:?}", category, now, self.state);
            return Err(KioskError::GateClosed);
        }
        tally.increment(category);
        let until = now + VotingGate::cooldown();
        self.state = GateState::Closed { until };
        Ok(until)
    }

    /// Opens the gate if its cooldown is over. Returns true if the state
    /// changed.
    ///
    /// Safe to call at any time: an open gate stays open and a gate closed by
    /// a more recent vote stays closed until its own deadline.
    pub fn reopen_if_due(&mut self, now: NaiveDateTime) -> bool {
        match self.state {
            GateState::Closed { until } if now >= until => {
                self.state = GateState::Open;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.state = GateState::Open;
    }
}

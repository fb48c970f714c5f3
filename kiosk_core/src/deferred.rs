use chrono::NaiveDateTime;

use crate::config::Category;

/// Work that restores some part of the kiosk to its resting state after a
/// delay.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Deferred {
    ReopenGate,
    ClearPinError,
    ReleaseHighlight(Category),
    SettlePulse,
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct ScheduledTask {
    fire_at: NaiveDateTime,
    // Tasks scheduled for the same instant run in scheduling order.
    seq: u64,
    task: Deferred,
}

/// The delayed callbacks of a session.
///
/// Tasks cannot be cancelled. They run on the same thread as the rest of the
/// session, when the owner advances the clock, so every task must leave the
/// session unchanged if the state it restores is already in place.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TaskQueue {
    tasks: Vec<ScheduledTask>,
    next_seq: u64,
}

impl TaskQueue {
    pub fn schedule(&mut self, fire_at: NaiveDateTime, task: Deferred) {
        self.tasks.push(ScheduledTask {
            fire_at,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    /// Removes and returns the tasks due at `now`, earliest first.
    pub fn pop_due(&mut self, now: NaiveDateTime) -> Vec<(NaiveDateTime, Deferred)> {
        let (mut due, pending): (Vec<ScheduledTask>, Vec<ScheduledTask>) = self
            .tasks
            .drain(..)
            .partition(|st| st.fire_at <= now);
        self.tasks = pending;
        due.sort_by_key(|st| (st.fire_at, st.seq));
        due.into_iter().map(|st| (st.fire_at, st.task)).collect()
    }

    pub fn next_fire_at(&self) -> Option<NaiveDateTime> {
        self.tasks.iter().map(|st| st.fire_at).min()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn t(ms: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            + Duration::milliseconds(ms)
    }

    #[test]
    fn pops_only_due_tasks_in_order() {
        let mut q = TaskQueue::default();
        q.schedule(t(700), Deferred::ReopenGate);
        q.schedule(t(200), Deferred::SettlePulse);
        q.schedule(t(3000), Deferred::ClearPinError);
        q.schedule(t(200), Deferred::ReleaseHighlight(Category::Same));
        assert_eq!(q.next_fire_at(), Some(t(200)));

        assert!(q.pop_due(t(100)).is_empty());
        assert_eq!(
            q.pop_due(t(700)),
            vec![
                (t(200), Deferred::SettlePulse),
                (t(200), Deferred::ReleaseHighlight(Category::Same)),
                (t(700), Deferred::ReopenGate),
            ]
        );
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(t(10_000)), vec![(t(3000), Deferred::ClearPinError)]);
        assert!(q.is_empty());
        assert_eq!(q.next_fire_at(), None);
    }
}

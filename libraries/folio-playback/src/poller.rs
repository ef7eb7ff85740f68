//! Playback position poller
//!
//! Cooperative, self-rescheduling sampler. The poller never sleeps or spawns:
//! it hands out [`PollTicket`]s that the owner of the navigator fires after
//! their delay. Tickets are keyed by a generation; starting or cancelling
//! bumps the generation, so a ticket already in flight becomes a no-op.

use std::time::Duration;

/// A scheduled position sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket {
    generation: u64,
    sequence: u64,
    delay: Duration,
}

impl PollTicket {
    /// Delay after which the ticket should be fired
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Generation the ticket belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Generation-keyed repeating sample schedule
#[derive(Debug, Clone)]
pub struct PositionPoller {
    interval: Duration,
    generation: u64,
    sequence: u64,
    running: bool,
    scheduled: Option<PollTicket>,
}

impl PositionPoller {
    /// Create a stopped poller sampling every `interval`
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            generation: 0,
            sequence: 0,
            running: false,
            scheduled: None,
        }
    }

    /// Delay between two samples
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a sampling chain is alive
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start a new sampling chain, invalidating any ticket in flight
    ///
    /// Returns the generation of the new chain; the caller samples right away
    /// and then calls [`reschedule`](Self::reschedule).
    pub fn start(&mut self) -> u64 {
        self.generation += 1;
        self.running = true;
        self.scheduled = None;
        self.generation
    }

    /// Stop sampling; tickets in flight become stale
    pub fn cancel(&mut self) {
        if self.running {
            self.generation += 1;
        }
        self.running = false;
        self.scheduled = None;
    }

    /// Whether a fired ticket belongs to the running chain
    pub fn accept(&self, ticket: &PollTicket) -> bool {
        self.running && ticket.generation == self.generation
    }

    /// Schedule the next sample of the running chain
    pub fn reschedule(&mut self, generation: u64) -> Option<PollTicket> {
        if !self.running || generation != self.generation {
            return None;
        }
        self.sequence += 1;
        let ticket = PollTicket {
            generation,
            sequence: self.sequence,
            delay: self.interval,
        };
        self.scheduled = Some(ticket);
        Some(ticket)
    }

    /// Take the ticket scheduled since the last call, for the timer owner
    pub fn take_scheduled(&mut self) -> Option<PollTicket> {
        self.scheduled.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_poller_is_stopped() {
        let mut poller = PositionPoller::new(Duration::from_millis(500));
        assert!(!poller.is_running());
        assert_eq!(poller.reschedule(0), None);
        assert_eq!(poller.take_scheduled(), None);
    }

    #[test]
    fn reschedule_hands_out_one_ticket() {
        let mut poller = PositionPoller::new(Duration::from_millis(500));
        let generation = poller.start();

        let ticket = poller.reschedule(generation).unwrap();
        assert_eq!(ticket.delay(), Duration::from_millis(500));
        assert!(poller.accept(&ticket));
        assert_eq!(poller.take_scheduled(), Some(ticket));
        assert_eq!(poller.take_scheduled(), None);
    }

    #[test]
    fn cancel_makes_tickets_stale() {
        let mut poller = PositionPoller::new(Duration::from_millis(500));
        let generation = poller.start();
        let ticket = poller.reschedule(generation).unwrap();

        poller.cancel();
        assert!(!poller.accept(&ticket));
        assert_eq!(poller.reschedule(generation), None);
        assert_eq!(poller.take_scheduled(), None);
    }

    #[test]
    fn restart_invalidates_previous_chain() {
        let mut poller = PositionPoller::new(Duration::from_millis(500));
        let first = poller.start();
        let old = poller.reschedule(first).unwrap();

        let second = poller.start();
        assert_ne!(first, second);
        assert!(!poller.accept(&old));
        assert_eq!(poller.reschedule(first), None);

        let fresh = poller.reschedule(second).unwrap();
        assert!(poller.accept(&fresh));
        assert_ne!(fresh, old);
    }
}

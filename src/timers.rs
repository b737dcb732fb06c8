use std::{
    collections::HashMap,
    time::Duration,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TimerKind {
    /// End of the rolling animation.
    RollSettle,
    /// End of the result display window.
    ResultExpiry,
    /// Inactivity window of the secret tap buffer.
    TapIdle,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TimerToken(u64);

/// A deferred callback handed to whoever drives the clock. Hand it back to
/// the table once `delay` has elapsed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Scheduled {
    pub kind: TimerKind,
    pub token: TimerToken,
    pub delay: Duration,
}

/// At most one live timer per kind; scheduling a kind again supersedes the
/// previous token.
#[derive(Debug, Default)]
pub struct Timers {
    next: u64,
    live: HashMap<TimerKind, TimerToken>,
    outbox: Vec<Scheduled>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerToken {
        self.next += 1;
        let token = TimerToken(self.next);
        self.live.insert(kind, token);
        self.outbox.push(Scheduled { kind, token, delay });
        token
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.live.remove(&kind);
    }

    pub fn cancel_all(&mut self) {
        self.live.clear();
        self.outbox.clear();
    }

    /// Consumes the live slot if `fired` is still current for its kind.
    pub fn claim(&mut self, fired: &Scheduled) -> bool {
        match self.live.get(&fired.kind) {
            Some(token) if *token == fired.token => {
                self.live.remove(&fired.kind);
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.live.contains_key(&kind)
    }

    /// Timers scheduled since the last drain.
    pub fn drain(&mut self) -> Vec<Scheduled> {
        std::mem::take(&mut self.outbox)
    }
}

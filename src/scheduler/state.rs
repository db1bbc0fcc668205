//! Render debounce state machine.
//!
//! ```text
//!            touch                 poll (deadline passed, auto)
//! Idle ───────────────▶ Pending ───────────────────────────────▶ Committed
//!   ▲                   │  ▲ touch (deadline moves)                  │
//!   │                   └──┘                                         │
//!   └───────────── render_now / manual→auto commit from any state ◀──┘
//! ```
//!
//! Pure: time is passed in, nothing sleeps here. The actor owns the timer.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing changed since start.
    Idle,
    /// Changes waiting for the quiet period to end.
    Pending { deadline: Instant },
    /// The latest changes have been handed to the host.
    Committed,
}

#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    auto_refresh: bool,
    state: RenderState,
}

impl Debounce {
    pub fn new(delay: Duration, auto_refresh: bool) -> Self {
        Self {
            delay,
            auto_refresh,
            state: RenderState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> RenderState {
        self.state
    }

    #[inline]
    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// A buffer changed. Any earlier deadline is superseded.
    pub fn touch(&mut self, now: Instant) {
        self.state = RenderState::Pending {
            deadline: now + self.delay,
        };
    }

    /// Returns true when the quiet period has ended and a render is due.
    /// Never fires in manual mode.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            RenderState::Pending { deadline } if self.auto_refresh && deadline <= now => {
                self.state = RenderState::Committed;
                true
            }
            _ => false,
        }
    }

    /// Explicit render request: commits immediately in either mode.
    pub fn render_now(&mut self) -> bool {
        self.state = RenderState::Committed;
        true
    }

    /// Switch modes. Turning auto-refresh on commits once right away.
    pub fn set_auto_refresh(&mut self, enabled: bool) -> bool {
        let switched_on = enabled && !self.auto_refresh;
        self.auto_refresh = enabled;
        if switched_on {
            self.state = RenderState::Committed;
        }
        switched_on
    }

    /// When the owner should call [`poll`](Self::poll) next.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            RenderState::Pending { deadline } if self.auto_refresh => Some(deadline),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_touch_then_poll_after_delay() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DELAY, true);
        assert_eq!(debounce.state(), RenderState::Idle);
        assert_eq!(debounce.next_deadline(), None);

        debounce.touch(start);
        assert_eq!(debounce.next_deadline(), Some(start + DELAY));
        assert!(!debounce.poll(start + DELAY / 2));
        assert!(debounce.poll(start + DELAY));
        assert_eq!(debounce.state(), RenderState::Committed);
        assert!(!debounce.poll(start + DELAY * 2));
    }

    #[test]
    fn test_touch_supersedes_deadline() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DELAY, true);

        debounce.touch(start);
        debounce.touch(start + Duration::from_millis(200));
        assert!(!debounce.poll(start + DELAY));
        assert!(debounce.poll(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_manual_mode_never_fires() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DELAY, false);
        debounce.touch(start);
        assert_eq!(debounce.next_deadline(), None);
        assert!(!debounce.poll(start + DELAY * 10));
        assert!(matches!(debounce.state(), RenderState::Pending { .. }));

        assert!(debounce.render_now());
        assert_eq!(debounce.state(), RenderState::Committed);
    }

    #[test]
    fn test_switching_to_auto_commits_once() {
        let mut debounce = Debounce::new(DELAY, false);
        assert!(debounce.set_auto_refresh(true));
        assert_eq!(debounce.state(), RenderState::Committed);
        assert!(!debounce.set_auto_refresh(true));
        assert!(!debounce.set_auto_refresh(false));
        assert!(!debounce.auto_refresh());
    }

    #[test]
    fn test_pending_survives_switch_to_manual() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DELAY, true);
        debounce.touch(start);
        debounce.set_auto_refresh(false);
        assert_eq!(debounce.next_deadline(), None);
        assert!(!debounce.poll(start + DELAY));
    }
}

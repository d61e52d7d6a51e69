//! Page selection: manual button navigation with a temporary override, and
//! optional timed auto-cycling.
//!
//! The controller never reads a clock itself; every operation takes `now`,
//! which keeps it deterministic under test.

use std::time::{Duration, Instant};

use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationConfig {
    pub page_count: usize,
    /// `None` disables auto-cycling.
    pub auto_cycle_interval: Option<Duration>,
    /// How long a button press suspends auto-cycling.
    pub manual_override: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub current_page: usize,
    pub auto_deadline: Option<Instant>,
    pub manual_deadline: Option<Instant>,
}

/// Outcome of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed { page: usize },
    Unchanged { remaining: Option<Duration> },
}

impl Transition {
    pub fn changed_page(&self) -> Option<usize> {
        match self {
            Transition::Changed { page } => Some(*page),
            Transition::Unchanged { .. } => None,
        }
    }
}

/// What the status line shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    Auto { remaining: Duration },
    Manual { remaining: Duration },
    Disabled,
}

impl CycleStatus {
    pub fn is_auto_cycling(&self) -> bool {
        matches!(self, CycleStatus::Auto { .. })
    }

    pub fn remaining(&self) -> Option<Duration> {
        match self {
            CycleStatus::Auto { remaining } | CycleStatus::Manual { remaining } => Some(*remaining),
            CycleStatus::Disabled => None,
        }
    }
}

pub struct NavigationController {
    config: NavigationConfig,
    state: NavigationState,
}

impl NavigationController {
    /// Starts on page 0 with the first auto-cycle due one interval after `now`.
    ///
    /// A zero `page_count` is treated as one page.
    pub fn new(mut config: NavigationConfig, now: Instant) -> Self {
        config.page_count = config.page_count.max(1);
        let state = NavigationState {
            current_page: 0,
            auto_deadline: config.auto_cycle_interval.map(|interval| now + interval),
            manual_deadline: None,
        };
        Self { config, state }
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Step one page in `direction`, wrapping at both ends, and suspend
    /// auto-cycling for the override period.
    pub fn on_button_edge(&mut self, direction: Direction, now: Instant) -> Transition {
        let count = self.config.page_count;
        self.state.current_page = match direction {
            Direction::Next => (self.state.current_page + 1) % count,
            Direction::Previous => (self.state.current_page + count - 1) % count,
        };
        self.state.manual_deadline = Some(now + self.config.manual_override);
        self.rearm_auto(now);
        Transition::Changed {
            page: self.state.current_page,
        }
    }

    /// Time-driven step. Only called on cycles where no button edge fired.
    pub fn on_tick(&mut self, now: Instant) -> Transition {
        if let Some(deadline) = self.state.manual_deadline {
            if now < deadline {
                return Transition::Unchanged {
                    remaining: Some(deadline - now),
                };
            }
            self.state.manual_deadline = None;
        }

        match self.state.auto_deadline {
            Some(deadline) if now >= deadline => {
                self.state.current_page = (self.state.current_page + 1) % self.config.page_count;
                self.rearm_auto(now);
                Transition::Changed {
                    page: self.state.current_page,
                }
            }
            Some(deadline) => Transition::Unchanged {
                remaining: Some(deadline - now),
            },
            None => Transition::Unchanged { remaining: None },
        }
    }

    /// Mode and time left for the status line. Does not modify state.
    pub fn remaining_and_mode(&self, now: Instant) -> CycleStatus {
        if let Some(deadline) = self.state.manual_deadline {
            if now < deadline {
                return CycleStatus::Manual {
                    remaining: deadline - now,
                };
            }
        }
        match self.state.auto_deadline {
            Some(deadline) => CycleStatus::Auto {
                remaining: deadline.saturating_duration_since(now),
            },
            None => CycleStatus::Disabled,
        }
    }

    fn rearm_auto(&mut self, now: Instant) {
        if let Some(interval) = self.config.auto_cycle_interval {
            self.state.auto_deadline = Some(now + interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn controller(pages: usize, auto: Option<u64>, start: Instant) -> NavigationController {
        NavigationController::new(
            NavigationConfig {
                page_count: pages,
                auto_cycle_interval: auto.map(secs),
                manual_override: secs(10),
            },
            start,
        )
    }

    #[test]
    fn next_from_first_page() {
        let t0 = Instant::now();
        let mut nav = controller(3, Some(120), t0);
        assert_eq!(
            nav.on_button_edge(Direction::Next, t0),
            Transition::Changed { page: 1 }
        );
    }

    #[test]
    fn presses_wrap_in_both_directions() {
        let t0 = Instant::now();
        let mut nav = controller(3, Some(120), t0);
        for _ in 0..3 {
            nav.on_button_edge(Direction::Next, t0);
        }
        assert_eq!(nav.current_page(), 0);

        nav.on_button_edge(Direction::Previous, t0);
        assert_eq!(nav.current_page(), 2);
    }

    #[test]
    fn press_starts_manual_override() {
        let t0 = Instant::now();
        let mut nav = controller(3, Some(120), t0);
        nav.on_button_edge(Direction::Next, t0 + secs(5));
        assert_eq!(nav.state().manual_deadline, Some(t0 + secs(15)));

        for t in [6, 10, 14] {
            let now = t0 + secs(t);
            assert!(!nav.remaining_and_mode(now).is_auto_cycling());
            assert!(matches!(
                nav.on_tick(now),
                Transition::Unchanged { remaining: Some(_) }
            ));
        }
        assert_eq!(nav.current_page(), 1);
    }

    #[test]
    fn lapsed_override_advances_exactly_once() {
        let t0 = Instant::now();
        let mut nav = controller(3, Some(20), t0);
        nav.on_button_edge(Direction::Next, t0);

        assert_eq!(
            nav.on_tick(t0 + secs(11)),
            Transition::Unchanged {
                remaining: Some(secs(9))
            }
        );
        assert_eq!(nav.on_tick(t0 + secs(20)), Transition::Changed { page: 2 });
        assert!(nav.on_tick(t0 + secs(21)).changed_page().is_none());
    }

    #[test]
    fn status_is_side_effect_free() {
        let t0 = Instant::now();
        let mut nav = controller(3, Some(120), t0);
        nav.on_button_edge(Direction::Next, t0);
        let before = nav.state().clone();
        nav.remaining_and_mode(t0 + secs(500));
        assert_eq!(*nav.state(), before);
    }

    #[test]
    fn disabled_auto_cycle_never_advances() {
        let t0 = Instant::now();
        let mut nav = controller(3, None, t0);
        assert_eq!(nav.remaining_and_mode(t0), CycleStatus::Disabled);
        assert_eq!(
            nav.on_tick(t0 + secs(10_000)),
            Transition::Unchanged { remaining: None }
        );

        nav.on_button_edge(Direction::Previous, t0);
        assert_eq!(nav.current_page(), 2);
        assert_eq!(
            nav.remaining_and_mode(t0 + secs(4)),
            CycleStatus::Manual {
                remaining: secs(6)
            }
        );
        assert_eq!(nav.remaining_and_mode(t0 + secs(10)), CycleStatus::Disabled);
    }

    #[test]
    fn single_page_stays_put() {
        let t0 = Instant::now();
        let mut nav = controller(1, Some(5), t0);
        nav.on_button_edge(Direction::Next, t0);
        assert_eq!(nav.current_page(), 0);
        assert_eq!(nav.on_tick(t0 + secs(60)), Transition::Changed { page: 0 });
    }

    #[test]
    fn override_and_auto_cycle_timeline() {
        let t0 = Instant::now();
        let mut nav = controller(3, Some(120), t0);

        assert_eq!(nav.on_tick(t0 + secs(120)), Transition::Changed { page: 1 });

        nav.on_button_edge(Direction::Next, t0 + secs(121));
        assert_eq!(nav.current_page(), 2);
        assert_eq!(nav.state().manual_deadline, Some(t0 + secs(131)));
        assert_eq!(nav.state().auto_deadline, Some(t0 + secs(241)));

        for t in 122..131 {
            let now = t0 + secs(t);
            assert!(!nav.remaining_and_mode(now).is_auto_cycling());
            assert!(nav.on_tick(now).changed_page().is_none());
        }

        let now = t0 + secs(132);
        assert!(nav.on_tick(now).changed_page().is_none());
        assert_eq!(
            nav.remaining_and_mode(now),
            CycleStatus::Auto {
                remaining: secs(109)
            }
        );
        assert_eq!(nav.state().manual_deadline, None);
    }
}

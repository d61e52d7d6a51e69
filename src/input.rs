//! Edge detection for the two Mini PiTFT buttons.
//!
//! Buttons are active-low with pull-ups. An edge is reported when a button
//! reads pressed now and did not on the previous poll; the fixed poll period
//! is the only debounce.

use crate::hardware::InputLine;
use crate::logger;
use crate::navigation::Direction;

/// Edge state for one button.
#[derive(Debug, Default, Clone, Copy)]
pub struct ButtonState {
    was_pressed: bool,
}

impl ButtonState {
    pub const fn new() -> Self {
        Self { was_pressed: false }
    }

    /// `true` only on the poll where the button goes from released to pressed.
    pub fn just_pressed(&mut self, is_pressed: bool) -> bool {
        let edge = is_pressed && !self.was_pressed;
        self.was_pressed = is_pressed;
        edge
    }
}

/// A button line and its edge state.
pub struct Button<L> {
    line: L,
    state: ButtonState,
    direction: Direction,
}

impl<L: InputLine> Button<L> {
    pub fn new(line: L, direction: Direction) -> Self {
        Self {
            line,
            state: ButtonState::new(),
            direction,
        }
    }

    /// The button's direction if it was pressed since the last poll. A read
    /// error is logged, yields no event and keeps the previous state.
    pub fn poll(&mut self) -> Option<Direction> {
        match self.line.is_low() {
            Ok(pressed) => self.state.just_pressed(pressed).then_some(self.direction),
            Err(e) => {
                logger::warning(format!("{} button read failed: {e}", self.direction));
                None
            }
        }
    }
}

pub struct ButtonPair<L> {
    previous: Button<L>,
    next: Button<L>,
}

impl<L: InputLine> ButtonPair<L> {
    pub fn new(previous: L, next: L) -> Self {
        Self {
            previous: Button::new(previous, Direction::Previous),
            next: Button::new(next, Direction::Next),
        }
    }

    /// Edges from this poll, Previous before Next.
    pub fn poll(&mut self) -> Vec<Direction> {
        [self.previous.poll(), self.next.poll()]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LineError;
    use std::collections::VecDeque;

    /// Replays scripted reads; `None` is a read error.
    struct ScriptedLine(VecDeque<Option<bool>>);

    impl ScriptedLine {
        fn new(reads: &[Option<bool>]) -> Self {
            Self(reads.iter().copied().collect())
        }
    }

    impl InputLine for ScriptedLine {
        fn is_low(&mut self) -> Result<bool, LineError> {
            match self.0.pop_front().flatten() {
                Some(level) => Ok(level),
                None => Err(LineError::new(23, "read failed")),
            }
        }
    }

    #[test]
    fn held_button_fires_once() {
        let mut state = ButtonState::new();
        let edges: Vec<bool> = [false, true, true, true, false, true]
            .into_iter()
            .map(|pressed| state.just_pressed(pressed))
            .collect();
        assert_eq!(edges, vec![false, true, false, false, false, true]);
    }

    #[test]
    fn read_error_keeps_previous_state() {
        let mut button = Button::new(
            ScriptedLine::new(&[Some(true), None, Some(true), Some(false), Some(true)]),
            Direction::Next,
        );
        assert_eq!(button.poll(), Some(Direction::Next));
        assert_eq!(button.poll(), None);
        // Still held: no new edge after the failed read.
        assert_eq!(button.poll(), None);
        assert_eq!(button.poll(), None);
        assert_eq!(button.poll(), Some(Direction::Next));
    }

    #[test]
    fn simultaneous_presses_report_previous_first() {
        let mut pair = ButtonPair::new(
            ScriptedLine::new(&[Some(true)]),
            ScriptedLine::new(&[Some(true)]),
        );
        assert_eq!(pair.poll(), vec![Direction::Previous, Direction::Next]);
    }
}

use std::collections::VecDeque;

use super::loop_runner::GameTime;
use super::scene::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Fire,
    Exit,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Fire => 4,
            InputAction::Exit => 5,
        }
    }
}

/// One tick's worth of key state, independent of where it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    actions: ActionStates,
}

impl InputState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(up: bool, down: bool, left: bool, right: bool, exit: bool) -> Self {
        Self::empty()
            .with_action_down(InputAction::MoveUp, up)
            .with_action_down(InputAction::MoveDown, down)
            .with_action_down(InputAction::MoveLeft, left)
            .with_action_down(InputAction::MoveRight, right)
            .with_action_down(InputAction::Exit, exit)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn exit_requested(&self) -> bool {
        self.is_down(InputAction::Exit)
    }

    pub fn fire_pressed(&self) -> bool {
        self.is_down(InputAction::Fire)
    }

    /// Unit movement vector, or zero when no (or opposing) keys are held. Up is -y.
    pub fn direction(&self) -> Vec2 {
        let mut direction = Vec2::ZERO;
        if self.is_down(InputAction::MoveUp) {
            direction.y -= 1.0;
        }
        if self.is_down(InputAction::MoveDown) {
            direction.y += 1.0;
        }
        if self.is_down(InputAction::MoveLeft) {
            direction.x -= 1.0;
        }
        if self.is_down(InputAction::MoveRight) {
            direction.x += 1.0;
        }
        direction.normalized_or_zero(1e-5)
    }
}

pub trait InputSource {
    fn state(&mut self, time: &GameTime) -> InputState;
}

/// Plays back a fixed script, one state per query, then keeps repeating the last one.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<InputState>,
    last: InputState,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = InputState>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last: InputState::empty(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InputSource for ScriptedInput {
    fn state(&mut self, _time: &GameTime) -> InputState {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn tick() -> GameTime {
        GameTime::new(Duration::from_millis(16), Duration::from_millis(16))
    }

    #[test]
    fn diagonal_direction_is_normalized() {
        let state = InputState::new(true, false, false, true, false);
        let direction = state.direction();

        assert!((direction.length() - 1.0).abs() < 0.0001);
        assert!(direction.x > 0.0 && direction.y < 0.0);
    }

    #[test]
    fn opposing_keys_cancel_out() {
        let state = InputState::new(true, true, false, false, false);
        assert_eq!(state.direction(), Vec2::ZERO);
    }

    #[test]
    fn scripted_input_repeats_last_state_after_script_ends() {
        let mut input = ScriptedInput::new([
            InputState::new(false, false, false, true, false),
            InputState::new(false, false, false, false, true),
        ]);

        assert!(input.state(&tick()).is_down(InputAction::MoveRight));
        assert!(input.state(&tick()).exit_requested());
        assert!(input.state(&tick()).exit_requested());
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn empty_script_yields_idle_state() {
        let mut input = ScriptedInput::default();
        let state = input.state(&tick());

        assert_eq!(state, InputState::empty());
        assert!(!state.fire_pressed());
    }
}

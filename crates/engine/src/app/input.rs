use super::geometry::{Resolution, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

const BUTTON_COUNT: usize = 2;

impl MouseButton {
    const fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ButtonStates {
    down: [bool; BUTTON_COUNT],
    just_pressed: [bool; BUTTON_COUNT],
    just_released: [bool; BUTTON_COUNT],
}

impl ButtonStates {
    pub(crate) fn press(&mut self, button: MouseButton) {
        let index = button.index();
        if !self.down[index] {
            self.just_pressed[index] = true;
        }
        self.down[index] = true;
    }

    pub(crate) fn release(&mut self, button: MouseButton) {
        let index = button.index();
        if self.down[index] {
            self.just_released[index] = true;
        }
        self.down[index] = false;
    }

    pub(crate) fn clear_edges(&mut self) {
        self.just_pressed = [false; BUTTON_COUNT];
        self.just_released = [false; BUTTON_COUNT];
    }
}

/// Pointer state for one frame. Edges are true only in the frame they happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSnapshot {
    cursor: Vector,
    buttons: ButtonStates,
    window_size: Resolution,
}

impl InputSnapshot {
    pub(crate) fn new(cursor: Vector, buttons: ButtonStates, window_size: Resolution) -> Self {
        Self {
            cursor,
            buttons,
            window_size,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vector::default(), ButtonStates::default(), Resolution::default())
    }

    pub fn cursor_position(&self) -> Vector {
        self.cursor
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons.down[button.index()]
    }

    pub fn is_just_pressed(&self, button: MouseButton) -> bool {
        self.buttons.just_pressed[button.index()]
    }

    pub fn is_just_released(&self, button: MouseButton) -> bool {
        self.buttons.just_released[button.index()]
    }

    pub fn window_size(&self) -> Resolution {
        self.window_size
    }

    pub fn with_cursor(mut self, cursor: Vector) -> Self {
        self.cursor = cursor;
        self
    }

    /// Button went down this frame.
    pub fn with_press(mut self, button: MouseButton) -> Self {
        let index = button.index();
        self.buttons.down[index] = true;
        self.buttons.just_pressed[index] = true;
        self.buttons.just_released[index] = false;
        self
    }

    /// Button is down from an earlier frame.
    pub fn with_held(mut self, button: MouseButton) -> Self {
        let index = button.index();
        self.buttons.down[index] = true;
        self.buttons.just_pressed[index] = false;
        self.buttons.just_released[index] = false;
        self
    }

    pub fn with_release(mut self, button: MouseButton) -> Self {
        let index = button.index();
        self.buttons.down[index] = false;
        self.buttons.just_pressed[index] = false;
        self.buttons.just_released[index] = true;
        self
    }

    pub fn with_window_size(mut self, window_size: Resolution) -> Self {
        self.window_size = window_size;
        self
    }

    /// Same cursor, no buttons. Used to hide clicks from entities behind a modal layer.
    pub fn without_buttons(mut self) -> Self {
        self.buttons = ButtonStates::default();
        self
    }
}

// Window wrapper: presents the composited frame and decodes the discrete key
// commands and pointer state the session loop consumes.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::session::KeyCommand;
use crate::tracker::PointerState;
use crate::types::{Frame, Point};

pub struct Drawer {
    window: Window,
}

impl Drawer {
    /// Create a window sized to the canvas.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen. This is also where
    /// minifb polls the event queue, so call it once per iteration.
    pub fn present(&mut self, frame: &Frame) -> Result<(), Error> {
        self.window
            .update_with_buffer(&frame.pixels, frame.width, frame.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Current mouse state, mapped onto the pointer-tracker contract:
    /// left button draws, right button selects.
    pub fn pointer(&self) -> PointerState {
        let pos = self
            .window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| Point::new(x.max(0.0) as i32, y.max(0.0) as i32));
        PointerState {
            pos,
            draw_held: self.window.get_mouse_down(MouseButton::Left),
            select_held: self.window.get_mouse_down(MouseButton::Right),
        }
    }

    /// Drain this frame's discrete key presses into commands, each firing
    /// once per physical press.
    pub fn poll_commands(&self) -> Vec<KeyCommand> {
        let mut commands = Vec::new();
        let pressed = |key| self.window.is_key_pressed(key, KeyRepeat::No);

        if pressed(Key::Q) || pressed(Key::Escape) {
            commands.push(KeyCommand::Quit);
        }
        if pressed(Key::C) {
            commands.push(KeyCommand::CyclePalette);
        }
        if pressed(Key::X) {
            commands.push(KeyCommand::ClearCanvas);
        }
        if pressed(Key::Equal) || pressed(Key::NumPadPlus) {
            commands.push(KeyCommand::BrushUp);
        }
        if pressed(Key::Minus) || pressed(Key::NumPadMinus) {
            commands.push(KeyCommand::BrushDown);
        }

        const DIGITS: [(Key, Key, u8); 10] = [
            (Key::Key0, Key::NumPad0, 0),
            (Key::Key1, Key::NumPad1, 1),
            (Key::Key2, Key::NumPad2, 2),
            (Key::Key3, Key::NumPad3, 3),
            (Key::Key4, Key::NumPad4, 4),
            (Key::Key5, Key::NumPad5, 5),
            (Key::Key6, Key::NumPad6, 6),
            (Key::Key7, Key::NumPad7, 7),
            (Key::Key8, Key::NumPad8, 8),
            (Key::Key9, Key::NumPad9, 9),
        ];
        for (row, pad, digit) in DIGITS {
            if pressed(row) || pressed(pad) {
                commands.push(KeyCommand::Digit(digit));
            }
        }

        commands
    }
}

use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use crate::display::{FrameBuffer, HEIGHT, WIDTH};

const FOREGROUND: u32 = from_u8_rgb(0, 127, 255);
const BACKGROUND: u32 = from_u8_rgb(0, 0, 0);

const fn from_u8_rgb(r: u8, g: u8, b: u8) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

/// Host window: presents the frame buffer and reports which keys are held.
pub struct Screen {
    pixel_buffer: Vec<u32>,
    window: Window,
}

impl Screen {
    pub fn new() -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "chipvm - ESC to exit, SPACE to pause",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale: Scale::X16,
                ..WindowOptions::default()
            },
        )?;
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self {
            pixel_buffer: vec![BACKGROUND; WIDTH * HEIGHT],
            window,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn held_keys(&self) -> Vec<Key> {
        self.window.get_keys()
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// Repaints if the buffer changed since the last frame, otherwise just
    /// pumps window events. Either way this blocks until the next 60 Hz slot.
    pub fn present(&mut self, fb: &mut FrameBuffer) -> Result<(), minifb::Error> {
        if !fb.take_dirty() {
            self.window.update();
            return Ok(());
        }
        for (pixel, on) in self.pixel_buffer.iter_mut().zip(fb.pixels()) {
            *pixel = if *on { FOREGROUND } else { BACKGROUND };
        }
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
    }
}

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// What happens to sprite pixels that run past the right or bottom edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SpriteEdge {
    /// Stop drawing the row (or the sprite) at the edge.
    #[default]
    Clip,
    /// Continue on the opposite edge.
    Wrap,
}

pub struct FrameBuffer {
    bit_buffer: [bool; WIDTH * HEIGHT],
    dirty: bool,
    edge: SpriteEdge,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(SpriteEdge::default())
    }
}

impl FrameBuffer {
    pub fn new(edge: SpriteEdge) -> Self {
        Self {
            bit_buffer: [false; WIDTH * HEIGHT],
            dirty: false,
            edge,
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [false; WIDTH * HEIGHT];
        self.dirty = true;
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[y * WIDTH + x]
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.bit_buffer[y * WIDTH + x] = on;
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reports whether anything changed since the last call and resets the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn pixels(&self) -> &[bool] {
        &self.bit_buffer
    }

    /// XORs `sprite` (one byte per row, MSB leftmost) onto the buffer with
    /// its origin at (`x`, `y`) taken modulo the screen size. Returns true
    /// if any lit pixel was turned off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let (ox, oy) = (x as usize % WIDTH, y as usize % HEIGHT);
        let mut collision = false;
        for (i, row) in sprite.iter().enumerate() {
            let mut ny = oy + i;
            if ny >= HEIGHT {
                match self.edge {
                    SpriteEdge::Clip => break,
                    SpriteEdge::Wrap => ny %= HEIGHT,
                }
            }
            for j in 0..8 {
                let mut nx = ox + j;
                if nx >= WIDTH {
                    match self.edge {
                        SpriteEdge::Clip => break,
                        SpriteEdge::Wrap => nx %= WIDTH,
                    }
                }
                let bit = (row >> (7 - j)) & 1 == 1;
                if !bit {
                    continue;
                }
                let index = ny * WIDTH + nx;
                collision |= self.bit_buffer[index];
                self.bit_buffer[index] ^= true;
            }
        }
        self.dirty = true;
        collision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lit(fb: &FrameBuffer) -> Vec<(usize, usize)> {
        let mut out = vec![];
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if fb.get(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn paint_sets_pixels_msb_first() {
        let mut fb = FrameBuffer::default();
        assert!(!fb.paint(2, 3, &[0b1000_0001]));
        assert_eq!(lit(&fb), vec![(2, 3), (9, 3)]);
        assert!(fb.take_dirty());
        assert!(!fb.is_dirty());
    }

    #[test]
    fn origin_is_taken_modulo_screen() {
        let mut fb = FrameBuffer::default();
        fb.paint(64 + 1, 32 + 2, &[0x80]);
        assert_eq!(lit(&fb), vec![(1, 2)]);
    }

    #[test]
    fn clipping_never_wraps_right_edge() {
        let mut fb = FrameBuffer::default();
        fb.paint(60, 0, &[0xFF]);
        assert_eq!(lit(&fb), vec![(60, 0), (61, 0), (62, 0), (63, 0)]);
    }

    #[test]
    fn clipping_drops_rows_below_bottom() {
        let mut fb = FrameBuffer::default();
        fb.paint(0, 30, &[0x80, 0x80, 0x80, 0x80]);
        assert_eq!(lit(&fb), vec![(0, 30), (0, 31)]);
    }

    #[test]
    fn wrap_policy_wraps_both_axes() {
        let mut fb = FrameBuffer::new(SpriteEdge::Wrap);
        fb.paint(62, 31, &[0xF0, 0x80]);
        assert_eq!(lit(&fb), vec![(62, 0), (0, 31), (1, 31), (62, 31), (63, 31)]);
    }

    #[test]
    fn clear_turns_everything_off() {
        let mut fb = FrameBuffer::default();
        fb.paint(0, 0, &[0xFF; 15]);
        fb.take_dirty();
        fb.clear_buffer();
        assert!(lit(&fb).is_empty());
        assert!(fb.is_dirty());
    }

    #[test]
    fn collision_only_when_lit_pixel_turns_off() {
        let mut fb = FrameBuffer::default();
        fb.paint(0, 0, &[0b1010_0000]);
        assert!(!fb.paint(0, 0, &[0b0101_0000]));
        assert!(fb.paint(0, 0, &[0b0010_0000]));
        assert!(!fb.get(2, 0));
    }

    proptest! {
        #[test]
        fn drawing_twice_restores_the_buffer(
            x in any::<u8>(),
            y in any::<u8>(),
            background in proptest::collection::vec(any::<u8>(), 1..16),
            sprite in proptest::collection::vec(any::<u8>(), 1..16),
        ) {
            let mut fb = FrameBuffer::default();
            fb.paint(0, 0, &background);
            fb.paint(17, 9, &background);
            let before = fb.pixels().to_vec();

            fb.paint(x, y, &sprite);
            let after_first = fb.pixels().to_vec();
            let collided = fb.paint(x, y, &sprite);

            prop_assert_eq!(fb.pixels(), &before[..]);
            prop_assert_eq!(collided, sprite_hits_lit(&after_first, x, y, &sprite));
        }
    }

    fn sprite_hits_lit(pixels: &[bool], x: u8, y: u8, sprite: &[u8]) -> bool {
        let (ox, oy) = (x as usize % WIDTH, y as usize % HEIGHT);
        sprite.iter().enumerate().any(|(i, row)| {
            (0..8).any(|j| {
                let (nx, ny) = (ox + j, oy + i);
                nx < WIDTH && ny < HEIGHT && (row >> (7 - j)) & 1 == 1 && pixels[ny * WIDTH + nx]
            })
        })
    }
}

//! Projects the indexed framebuffer through the palette into the caller's
//! output surface (4.6. Renderer).

use crate::constants::{BORDER_HEIGHT, BORDER_WIDTH, FULL_HEIGHT, FULL_WIDTH};
use crate::framebuffer::Framebuffer;
use crate::surface::Surface;

/// Renders `fb` into `surface`, honouring the current scroll offsets and
/// painting the border ring from `border_index`.
///
/// The border is always painted from `border_index`, even where the
/// underlying pixel cells were themselves mutated by a scroll or tile
/// write — the scroll offsets are display-only smooth-scroll within the
/// inner rectangle.
pub fn render(fb: &Framebuffer, surface: &mut dyn Surface) {
    let palette = fb.palette();
    let border_colour = palette[fb.border_index() as usize & 0x0F];
    let h_offset = fb.h_offset() as usize;
    let v_offset = fb.v_offset() as usize;

    for row in 0..FULL_HEIGHT {
        let in_border_row = row < BORDER_HEIGHT || row >= FULL_HEIGHT - BORDER_HEIGHT;
        for col in 0..FULL_WIDTH {
            let in_border = in_border_row
                || col < BORDER_WIDTH
                || col >= FULL_WIDTH - BORDER_WIDTH;
            let argb = if in_border {
                border_colour
            } else {
                let index = fb.pixel(row + v_offset, col + h_offset);
                palette[index as usize & 0x0F]
            };
            surface.write_pixel(row, col, argb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RgbSurface;

    #[test]
    fn border_ring_is_painted_from_border_index_even_over_mutated_pixels() {
        let mut surface = RgbSurface::new();
        let mut fb = Framebuffer::new();
        fb.palette_mut()[5] = 0xAAAAAA;
        fb.set_border_index(5);
        // Mutate a border cell directly; render must still use border_index.
        fb.set_pixel(0, 0, 9);

        render(&fb, &mut surface);

        assert_eq!(surface.pixel(0, 0), 0xAAAAAA);
    }

    #[test]
    fn inner_rectangle_reads_through_scroll_offsets() {
        let mut surface = RgbSurface::new();
        let mut fb = Framebuffer::new();
        fb.palette_mut()[3] = 0x00FF00;
        fb.set_pixel(13, 7, 3);
        fb.set_h_offset(1);
        fb.set_v_offset(1);

        render(&fb, &mut surface);

        // inner cell (12, 6) should read pixel at (13, 7) because of offsets
        assert_eq!(surface.pixel(12, 6), 0x00FF00);
    }
}

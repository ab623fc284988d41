//! Applies CD+G subcode packets to a [`Framebuffer`] and drives playback
//! (4.3. Instruction interpreter, 4.4. Playback clock, 4.5. Duration).

use crate::constants::{
    BORDER_HEIGHT, BORDER_WIDTH, FULL_HEIGHT, FULL_WIDTH, INST_BORDER_PRESET,
    INST_DEFINE_TRANSPARENT, INST_LOAD_PALETTE_HIGH, INST_LOAD_PALETTE_LOW,
    INST_MEMORY_PRESET, INST_SCROLL_COPY, INST_SCROLL_PRESET,
    INST_TILE_BLOCK, INST_TILE_BLOCK_XOR, MAX_H_OFFSET, MAX_V_OFFSET,
    PACKET_SIZE, TILE_HEIGHT, TILE_WIDTH,
};
use crate::error::{CdgError, Result};
use crate::framebuffer::Framebuffer;
use crate::packet::Packet;
use crate::render;
use crate::source::PacketSource;
use crate::surface::Surface;

/// A CD+G stream interpreter: owns the playback clock and the persistent
/// framebuffer, and drives a caller-owned byte source and output surface.
pub struct Interpreter {
    framebuffer: Framebuffer,
    source: Option<Box<dyn PacketSource>>,
    position_ms: i64,
    duration_ms: i64,
}

impl Interpreter {
    /// Creates an interpreter with no bound source. `render_at` returns
    /// [`CdgError::NotOpen`] until `open` succeeds.
    pub fn new() -> Self {
        Self {
            framebuffer: Framebuffer::new(),
            source: None,
            position_ms: 0,
            duration_ms: 0,
        }
    }

    /// Binds `source` for the session, computing total duration from its
    /// reported size and resetting the framebuffer to empty (5. Concurrency
    /// & resource model: every path out of `open` releases any previously
    /// bound source first).
    pub fn open(&mut self, source: Box<dyn PacketSource>) -> Result<()> {
        self.close();
        self.duration_ms = source
            .len()
            .map(|bytes| ((bytes / PACKET_SIZE as u64) * 1000 / 300) as i64)
            .unwrap_or(0);
        self.source = Some(source);
        Ok(())
    }

    /// Releases the bound source and clears interpreter state.
    pub fn close(&mut self) {
        self.source = None;
        self.framebuffer.reset();
        self.position_ms = 0;
        self.duration_ms = 0;
    }

    /// Total stream duration, computed once at `open` time. `0` if the
    /// source didn't report a size, or nothing is open.
    pub fn total_duration_ms(&self) -> i64 {
        self.duration_ms
    }

    /// Renders the framebuffer as it stands at `ms` milliseconds into the
    /// stream, advancing playback (and, on a backward seek, rewinding the
    /// source) as needed first.
    ///
    /// Returns `Ok(true)` if the stream has more data beyond `ms`,
    /// `Ok(false)` if end of stream was reached while advancing (the
    /// framebuffer is left in the last consistent state either way).
    pub fn render_at(
        &mut self,
        ms: i64,
        surface: &mut dyn Surface,
    ) -> Result<bool> {
        if self.source.is_none() {
            return Err(CdgError::NotOpen);
        }

        if ms < self.position_ms {
            self.source_mut()?.rewind()?;
            self.position_ms = 0;
        }

        let delta_ms = ms - self.position_ms;
        let units = delta_ms / 10;
        self.position_ms += units * 10;
        let mut packets_remaining = units * 3;

        let mut reached_eof = false;
        while packets_remaining > 0 {
            match Packet::read_from(self.source_mut()?) {
                Ok(Some(packet)) => {
                    self.apply_packet(&packet, surface);
                    packets_remaining -= 1;
                }
                Ok(None) => {
                    reached_eof = true;
                    break;
                }
                Err(err) => {
                    // A read failure is surfaced to the caller as end of
                    // stream, not propagated as an error (spec.md 7, kind 3).
                    log::warn!("packet stream read failed, treating as end of stream: {}", err);
                    reached_eof = true;
                    break;
                }
            }
        }

        render::render(&self.framebuffer, surface);

        Ok(!reached_eof)
    }

    /// Read-only access to the current framebuffer state, e.g. for
    /// inspecting the transparent colour index.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    fn source_mut(&mut self) -> Result<&mut dyn PacketSource> {
        self.source.as_deref_mut().ok_or(CdgError::NotOpen)
    }

    fn apply_packet(&mut self, packet: &Packet, surface: &dyn Surface) {
        if !packet.is_command() {
            return;
        }

        match packet.instruction_code() {
            INST_MEMORY_PRESET => self.memory_preset(&packet.data),
            INST_BORDER_PRESET => self.border_preset(&packet.data),
            INST_TILE_BLOCK => self.tile_block(&packet.data, false),
            INST_TILE_BLOCK_XOR => self.tile_block(&packet.data, true),
            INST_SCROLL_PRESET => self.scroll(&packet.data, false),
            INST_SCROLL_COPY => self.scroll(&packet.data, true),
            INST_DEFINE_TRANSPARENT => self.define_transparent(&packet.data),
            INST_LOAD_PALETTE_LOW => self.load_palette(&packet.data, 0, surface),
            INST_LOAD_PALETTE_HIGH => self.load_palette(&packet.data, 8, surface),
            code => {
                log::trace!("ignoring unrecognised instruction code {}", code);
            }
        }
    }

    fn memory_preset(&mut self, data: &[u8; 16]) {
        let colour = data[0] & 0x0F;
        let repeat = data[1] & 0x0F;

        self.framebuffer.set_preset_index(colour);
        self.framebuffer.set_border_index(colour);

        // On reliable media the preset is sent repeatedly; only the first
        // instance needs to act.
        if repeat == 0 {
            self.framebuffer
                .pixels_mut()
                .iter_mut()
                .for_each(|p| *p = colour);
        }
    }

    fn border_preset(&mut self, data: &[u8; 16]) {
        let colour = data[0] & 0x0F;
        self.framebuffer.set_border_index(colour);

        for row in 0..FULL_HEIGHT {
            let border_row =
                row < BORDER_HEIGHT || row >= FULL_HEIGHT - BORDER_HEIGHT;
            for col in 0..FULL_WIDTH {
                if border_row
                    || col < BORDER_WIDTH
                    || col >= FULL_WIDTH - BORDER_WIDTH
                {
                    self.framebuffer.set_pixel(row, col, colour);
                }
            }
        }
    }

    fn tile_block(&mut self, data: &[u8; 16], xor: bool) {
        let colour0 = data[0] & 0x0F;
        let colour1 = data[1] & 0x0F;
        let row = (data[2] & 0x1F) as usize * TILE_HEIGHT;
        let col = (data[3] & 0x3F) as usize * TILE_WIDTH;

        if row > FULL_HEIGHT - TILE_HEIGHT || col > FULL_WIDTH - TILE_WIDTH {
            log::trace!("dropping off-grid tile at row={} col={}", row, col);
            return;
        }

        for i in 0..TILE_HEIGHT {
            let byte = data[4 + i];
            for j in 0..TILE_WIDTH {
                let bit = (byte >> (5 - j)) & 0x01;
                let src = if bit == 1 { colour1 } else { colour0 };
                let value = if xor {
                    self.framebuffer.pixel(row + i, col + j) ^ src
                } else {
                    src
                };
                self.framebuffer.set_pixel(row + i, col + j, value);
            }
        }
    }

    fn scroll(&mut self, data: &[u8; 16], copy: bool) {
        let colour = data[0] & 0x0F;
        let h_scroll = data[1] & 0x3F;
        let h_s_cmd = (h_scroll >> 4) & 0x3;
        let h_offset = h_scroll & 0x07;
        let v_scroll = data[2] & 0x3F;
        let v_s_cmd = (v_scroll >> 4) & 0x3;
        let v_offset = v_scroll & 0x0F;

        // Display-only offsets; updated even if the whole-tile shifts below
        // both end up zero (9. Design notes: intentional sub-tile scroll).
        self.framebuffer.set_h_offset(h_offset.min(MAX_H_OFFSET));
        self.framebuffer.set_v_offset(v_offset.min(MAX_V_OFFSET));

        let v_shift: i32 = match v_s_cmd {
            2 => -(TILE_HEIGHT as i32),
            1 => TILE_HEIGHT as i32,
            _ => 0,
        };
        let h_shift: i32 = match h_s_cmd {
            2 => -(TILE_WIDTH as i32),
            1 => TILE_WIDTH as i32,
            _ => 0,
        };

        if v_shift == 0 && h_shift == 0 {
            return;
        }

        let width = FULL_WIDTH as i32;
        let height = FULL_HEIGHT as i32;
        let mut shifted = vec![0u8; FULL_WIDTH * FULL_HEIGHT];
        for r in 0..height {
            for c in 0..width {
                let value = self.framebuffer.pixel(r as usize, c as usize);
                let new_r = (r + v_shift).rem_euclid(height) as usize;
                let new_c = (c + h_shift).rem_euclid(width) as usize;
                shifted[new_r * FULL_WIDTH + new_c] = value;
            }
        }
        self.framebuffer.pixels_mut().copy_from_slice(&shifted);

        // Scroll-copy leaves the wrapped-in band as-is (it's exactly the
        // pixels that fell off the opposite edge); scroll-preset overwrites
        // it with `colour`.
        if copy {
            return;
        }

        if v_shift > 0 {
            for row in 0..v_shift as usize {
                for col in 0..FULL_WIDTH {
                    self.framebuffer.set_pixel(row, col, colour);
                }
            }
        } else if v_shift < 0 {
            let start = (FULL_HEIGHT as i32 + v_shift) as usize;
            for row in start..FULL_HEIGHT {
                for col in 0..FULL_WIDTH {
                    self.framebuffer.set_pixel(row, col, colour);
                }
            }
        }

        if h_shift > 0 {
            for col in 0..h_shift as usize {
                for row in 0..FULL_HEIGHT {
                    self.framebuffer.set_pixel(row, col, colour);
                }
            }
        } else if h_shift < 0 {
            let start = (FULL_WIDTH as i32 + h_shift) as usize;
            for col in start..FULL_WIDTH {
                for row in 0..FULL_HEIGHT {
                    self.framebuffer.set_pixel(row, col, colour);
                }
            }
        }
    }

    fn define_transparent(&mut self, data: &[u8; 16]) {
        self.framebuffer.set_transparent_index(data[0] & 0x0F);
    }

    fn load_palette(&mut self, data: &[u8; 16], offset: usize, surface: &dyn Surface) {
        for i in 0..8 {
            // Mask both bytes with 0x3F before recombining: robust against
            // noisy input that doesn't keep the parity layout's implicit
            // masking (9. Design notes, open question).
            let high = data[2 * i] & 0x3F;
            let low = data[2 * i + 1] & 0x3F;

            let r = (high >> 2) & 0x0F;
            let g = ((high & 0x03) << 2) | ((low >> 4) & 0x03);
            let b = low & 0x0F;

            // Expand 4-bit-per-channel to 8-bit by duplicating the nibble.
            let (r8, g8, b8) = (r * 17, g * 17, b * 17);

            self.framebuffer.palette_mut()[i + offset] =
                surface.pack_rgb(r8, g8, b8);
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

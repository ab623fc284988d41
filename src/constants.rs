// Internal constants.

/// Width of the full CD+G raster, in pixels.
pub const FULL_WIDTH: usize = 300;
/// Height of the full CD+G raster, in pixels.
pub const FULL_HEIGHT: usize = 216;

/// Width of a tile block, in pixels.
pub const TILE_WIDTH: usize = 6;
/// Height of a tile block, in pixels.
pub const TILE_HEIGHT: usize = 12;

/// Width of the border strip on each side of the raster.
pub const BORDER_WIDTH: usize = 6;
/// Height of the border strip on the top and bottom of the raster.
pub const BORDER_HEIGHT: usize = 12;

/// Number of entries in the colour table.
pub const PALETTE_SIZE: usize = 16;

/// Size of a single subcode packet, in bytes.
pub const PACKET_SIZE: usize = 24;

/// Masked command value that marks a packet as a CD+G command.
pub(crate) const CDG_COMMAND: u8 = 0x09;
/// All command/instruction fields only use the low 6 bits.
pub(crate) const CDG_MASK: u8 = 0x3F;

// Instruction codes, 4.3. Instruction interpreter.
pub(crate) const INST_MEMORY_PRESET: u8 = 1;
pub(crate) const INST_BORDER_PRESET: u8 = 2;
pub(crate) const INST_TILE_BLOCK: u8 = 6;
pub(crate) const INST_SCROLL_PRESET: u8 = 20;
pub(crate) const INST_SCROLL_COPY: u8 = 24;
pub(crate) const INST_DEFINE_TRANSPARENT: u8 = 28;
pub(crate) const INST_LOAD_PALETTE_LOW: u8 = 30;
pub(crate) const INST_LOAD_PALETTE_HIGH: u8 = 31;
pub(crate) const INST_TILE_BLOCK_XOR: u8 = 38;

/// Max value of h_offset after clamping (display-only smooth scroll).
pub(crate) const MAX_H_OFFSET: u8 = 5;
/// Max value of v_offset after clamping (display-only smooth scroll).
pub(crate) const MAX_V_OFFSET: u8 = 11;

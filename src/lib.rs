//! A CD+G (Compact Disc + Graphics) subcode stream interpreter.
//!
//! CD+G is a subcode channel carried alongside audio on karaoke discs: a
//! strict stream of fixed-size packets drives a tiny virtual graphics
//! terminal — 16-colour palette, 300x216 tiled bitmap, horizontal/vertical
//! scroll with wrap, XOR blit. This crate reproduces that terminal, bit for
//! bit, at any requested playback time.
//!
//! Muxing, container I/O, audio decoding, archive extraction and CLI
//! parsing are all external collaborators and out of scope here — see
//! [`source`] for the byte-source capability this crate expects from its
//! caller, and [`surface`] for the output-surface capability.

pub mod constants;
pub mod error;
pub mod framebuffer;
pub mod interpreter;
pub mod packet;
pub mod render;
pub mod source;
pub mod surface;

pub use error::{CdgError, Result};
pub use framebuffer::Framebuffer;
pub use interpreter::Interpreter;
pub use packet::Packet;
pub use source::{FileSource, PacketSource, ZipEntrySource};
pub use surface::{RgbSurface, Surface};

//! Decodes a single frame out of a `.cdg` file at a given millisecond
//! position and writes it to stdout as a binary PPM.
//!
//! Usage: `decode_frame <path.cdg> <ms>`
//!
//! This is a library-usage demo, not a CLI: argument parsing is
//! out-of-scope for the interpreter itself, so it's the bare minimum to
//! drive `Interpreter` end to end against a real file.

use std::io::{self, Write};

use cdg::constants::{FULL_HEIGHT, FULL_WIDTH};
use cdg::{FileSource, Interpreter, RgbSurface};

fn main() {
    let mut args = std::env::args().skip(1);
    let path = args.next().expect("usage: decode_frame <path.cdg> <ms>");
    let ms: i64 = args
        .next()
        .expect("usage: decode_frame <path.cdg> <ms>")
        .parse()
        .expect("ms must be an integer");

    let source = FileSource::open(&path).expect("failed to open source");

    let mut interpreter = Interpreter::new();
    interpreter.open(Box::new(source)).expect("failed to open stream");

    let mut surface = RgbSurface::new();
    interpreter
        .render_at(ms, &mut surface)
        .expect("failed to render frame");

    write_ppm(&surface).expect("failed to write ppm");
}

fn write_ppm(surface: &RgbSurface) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "P6\n{} {}\n255", FULL_WIDTH, FULL_HEIGHT)?;
    for row in 0..FULL_HEIGHT {
        for col in 0..FULL_WIDTH {
            let argb = surface.pixel(row, col);
            let bytes = [
                ((argb >> 16) & 0xFF) as u8,
                ((argb >> 8) & 0xFF) as u8,
                (argb & 0xFF) as u8,
            ];
            out.write_all(&bytes)?;
        }
    }
    Ok(())
}

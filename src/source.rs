//! The byte-source capability (4.1. Byte source): sequential reads of the
//! packet stream, an optional size query for duration, and rewind for
//! backward seeks.

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{CdgError, Result};

/// Capability the interpreter needs from its packet stream.
///
/// The interpreter never seeks within the stream except by full rewind, so
/// implementations only need to support sequential reads plus a reset to
/// the start.
pub trait PacketSource {
    /// Reads into `buf`, returning the number of bytes read. Returns `0` at
    /// end of stream.
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Total size of the stream in bytes, if known.
    fn len(&self) -> Option<u64>;

    /// Restarts the stream from offset zero.
    fn rewind(&mut self) -> std::io::Result<()>;
}

/// A packet stream backed directly by a file on disk.
pub struct FileSource {
    file: File,
    size: Option<u64>,
}

impl FileSource {
    /// Opens `path` as a packet stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata().ok().map(|m| m.len());
        Ok(Self { file, size })
    }
}

impl PacketSource for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Read::read(&mut self.file, buf)
    }

    fn len(&self) -> Option<u64> {
        self.size
    }

    fn rewind(&mut self) -> std::io::Result<()> {
        self.file.seek(SeekFrom::Start(0)).map(|_| ())
    }
}

/// A packet stream backed by a single entry inside a zip archive.
///
/// DEFLATE entries can't be seeked mid-stream, so the entry is decompressed
/// eagerly at construction time into an owned buffer; `rewind` then just
/// resets an in-memory cursor. CD+G streams are at most a few hundred
/// kilobytes, so this is cheap.
pub struct ZipEntrySource {
    cursor: Cursor<Vec<u8>>,
}

impl ZipEntrySource {
    /// Opens `entry_name` inside the zip archive read from `reader`.
    pub fn open<R: Read + Seek>(reader: R, entry_name: &str) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut entry = archive
            .by_name(entry_name)
            .map_err(|_| CdgError::ZipEntryNotFound(entry_name.to_owned()))?;
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut buf)?;
        Ok(Self {
            cursor: Cursor::new(buf),
        })
    }
}

impl PacketSource for ZipEntrySource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Read::read(&mut self.cursor, buf)
    }

    fn len(&self) -> Option<u64> {
        Some(self.cursor.get_ref().len() as u64)
    }

    fn rewind(&mut self) -> std::io::Result<()> {
        self.cursor.set_position(0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_source_reports_size_and_rewinds() {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "cdg-source-test-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&[1, 2, 3, 4, 5])
            .unwrap();

        let mut src = FileSource::open(&path).unwrap();
        assert_eq!(src.len(), Some(5));

        let mut buf = [0u8; 3];
        assert_eq!(src.read(&mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);

        src.rewind().unwrap();
        assert_eq!(src.read(&mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);

        std::fs::remove_file(&path).ok();
    }

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            for (name, data) in entries {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn zip_entry_source_reads_decompressed_bytes() {
        let zip_bytes = build_zip(&[("track.cdg", &[9, 1, 0, 0, 5])]);

        let mut src =
            ZipEntrySource::open(Cursor::new(zip_bytes), "track.cdg").unwrap();
        assert_eq!(src.len(), Some(5));
        let mut buf = [0u8; 5];
        assert_eq!(src.read(&mut buf).unwrap(), 5);
        assert_eq!(buf, [9, 1, 0, 0, 5]);
    }

    #[test]
    fn zip_entry_source_missing_entry_is_an_error() {
        let zip_bytes = build_zip(&[]);
        let err = ZipEntrySource::open(Cursor::new(zip_bytes), "missing.cdg")
            .unwrap_err();
        assert!(matches!(err, CdgError::ZipEntryNotFound(_)));
    }
}

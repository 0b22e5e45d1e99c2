//! Chain writers for sink output
//!
//! A pluggable writer wraps the output file with buffering and optional
//! streaming compression. Writes are buffered; durability is only
//! guaranteed after the close sequence (`flush_all` + `finish`) runs,
//! which the sink worker performs when its queue closes.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use zstd::stream::write::Encoder as ZstdEncoder;

/// Compression applied to a sink's output
///
/// Chosen once at sink creation from the destination's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Plain buffered writes
    None,
    /// Streaming gzip framing (`.gz`)
    Gzip,
    /// Streaming zstd framing (`.zst`)
    Zstd,
}

impl Compression {
    /// Select the compression for a destination path by extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Self::Gzip,
            Some("zst") => Self::Zstd,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Zstd => "zstd",
        }
    }

    /// Create the output file and wrap it with this compression
    pub fn open(self, path: &Path, buffer_size: usize) -> io::Result<Box<dyn RecordWrite>> {
        let file = File::create(path)?;
        let writer = BufWriter::with_capacity(buffer_size, file);
        Ok(match self {
            Self::None => Box::new(PlainChain {
                writer,
                bytes_written: 0,
            }),
            Self::Gzip => Box::new(GzipChain {
                encoder: GzEncoder::new(writer, flate2::Compression::default()),
                bytes_written: 0,
            }),
            Self::Zstd => Box::new(ZstdChain {
                // Level 0 selects zstd's default level.
                encoder: ZstdEncoder::new(writer, 0)?,
                bytes_written: 0,
            }),
        })
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The write half of a sink's output chain
///
/// Object-safe so sinks can hold `Box<dyn RecordWrite>` regardless of the
/// compression in use.
pub trait RecordWrite: Write + Send {
    /// Flush all buffered data towards the file
    fn flush_all(&mut self) -> io::Result<()>;

    /// Finish the stream and close the writer
    ///
    /// For compressed chains this writes the end-of-frame trailer and
    /// flushes the inner buffer; afterwards the file is fully decodable.
    fn finish(self: Box<Self>) -> io::Result<()>;

    /// Bytes handed to this writer (before compression)
    fn bytes_written(&self) -> u64;
}

struct PlainChain {
    writer: BufWriter<File>,
    bytes_written: u64,
}

impl Write for PlainChain {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl RecordWrite for PlainChain {
    fn flush_all(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn finish(mut self: Box<Self>) -> io::Result<()> {
        self.writer.flush()
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

struct GzipChain {
    encoder: GzEncoder<BufWriter<File>>,
    bytes_written: u64,
}

impl Write for GzipChain {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.encoder.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

impl RecordWrite for GzipChain {
    fn flush_all(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }

    fn finish(self: Box<Self>) -> io::Result<()> {
        // Writes the gzip trailer, then flush what the inner buffer holds.
        let mut writer = self.encoder.finish()?;
        writer.flush()
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

struct ZstdChain {
    encoder: ZstdEncoder<'static, BufWriter<File>>,
    bytes_written: u64,
}

impl Write for ZstdChain {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.encoder.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

impl RecordWrite for ZstdChain {
    fn flush_all(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }

    fn finish(self: Box<Self>) -> io::Result<()> {
        let mut writer = self.encoder.finish()?;
        writer.flush()
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod writer_test;

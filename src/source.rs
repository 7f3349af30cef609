use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::info;
use memmap2::Mmap;

use crate::error::Result;

enum Buffer {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

/// Program text handed to the scanner, either memory‑mapped from a file or
/// read whole from standard input.
pub struct SourceFile {
    name: String,
    buf: Buffer,
}

impl SourceFile {
    /// Memory‑map `path`. Empty files are not mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening source file: {:?}", path);

        let file = File::open(path)?;
        let len = file.metadata()?.len();

        let buf = if len == 0 {
            Buffer::Owned(Vec::new())
        } else {
            // SAFETY: the mapping is read‑only and lives no longer than `self`;
            // concurrent truncation of the file by another process is not
            // something this tool guards against.
            Buffer::Mapped(unsafe { Mmap::map(&file)? })
        };

        info!("Mapped {} bytes from {:?}", len, path);

        Ok(Self {
            name: path.display().to_string(),
            buf,
        })
    }

    pub fn stdin() -> Result<Self> {
        Self::from_reader("<stdin>", io::stdin().lock())
    }

    /// Read everything from `reader` into memory.
    pub fn from_reader<R: Read>(name: &str, mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        let n = reader.read_to_end(&mut bytes)?;

        info!("Read {} bytes from {}", n, name);

        Ok(Self {
            name: name.to_owned(),
            buf: Buffer::Owned(bytes),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        match &self.buf {
            Buffer::Mapped(m) => &m[..],
            Buffer::Owned(v) => v.as_slice(),
        }
    }

    /// The source as text; fails if it is not valid UTF‑8.
    pub fn text(&self) -> Result<&str> {
        Ok(std::str::from_utf8(self.bytes())?)
    }
}

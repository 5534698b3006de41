//! Random-access reads over an fsimage

use crate::error::{FsImageError, Result};
use crate::summary::SectionDescriptor;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Positioned reader over an image
///
/// Works over any `Read + Seek` source. Each read seeks to an absolute
/// offset, so sections are fetched independently rather than by one
/// sequential scan.
pub struct ImageReader<R> {
    inner: R,
    len: u64,
    path: Option<PathBuf>,
}

impl ImageReader<File> {
    /// Open an image file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let len = file.metadata()?.len();

        Ok(ImageReader {
            inner: file,
            len,
            path: Some(path.as_ref().to_path_buf()),
        })
    }
}

impl<R: Read + Seek> ImageReader<R> {
    /// Wrap an in-memory or otherwise seekable source
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        Ok(ImageReader {
            inner,
            len,
            path: None,
        })
    }

    /// Total image length in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Path the image was opened from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Fill `buf` from `offset`
    pub fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(buf)?;
        Ok(())
    }

    /// Read `length` bytes starting at `offset`
    pub fn read_at(&mut self, offset: u64, length: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; length];
        self.read_exact_at(offset, &mut buffer)?;
        Ok(buffer)
    }

    /// Read one section into a buffer sized to its declared length
    pub fn read_section(&mut self, section: &SectionDescriptor) -> Result<Vec<u8>> {
        let out_of_bounds = || FsImageError::SectionOutOfBounds {
            name: section.name.clone(),
            offset: section.offset,
            length: section.length,
            file_length: self.len,
        };

        let end = section
            .offset
            .checked_add(section.length)
            .ok_or_else(out_of_bounds)?;
        if end > self.len {
            return Err(out_of_bounds());
        }
        let length = usize::try_from(section.length).map_err(|_| out_of_bounds())?;

        debug!(
            "Reading section {} ({} bytes at offset {})",
            section.name, section.length, section.offset
        );
        self.read_at(section.offset, length)
    }
}

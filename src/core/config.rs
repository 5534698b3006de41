//! Decode configuration
//!
//! Options can be built in code with the chained setters or loaded from a
//! TOML file:
//!
//! ```toml
//! root_id = 16385
//! max_depth = 1000
//! strict_kinds = false
//! include_empty_dirs = true
//! include_directories = false
//! ```

use crate::error::{FsImageError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Well-known inode id of the namespace root
pub const ROOT_INODE_ID: u64 = 16385;

/// Default bound on namespace depth
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Options controlling one decode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    /// Inode id the tree is rooted at
    pub root_id: u64,

    /// Deepest nesting accepted before the decode fails
    pub max_depth: usize,

    /// Reject unknown inode kind codes instead of warning
    pub strict_kinds: bool,

    /// Emit paths for directories without children
    pub include_empty_dirs: bool,

    /// Also emit paths for directories that have children
    pub include_directories: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            root_id: ROOT_INODE_ID,
            max_depth: DEFAULT_MAX_DEPTH,
            strict_kinds: false,
            include_empty_dirs: true,
            include_directories: false,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FsImageError::Config(e.to_string()))
    }

    /// Load options from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn root_id(mut self, root_id: u64) -> Self {
        self.root_id = root_id;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn strict_kinds(mut self, strict: bool) -> Self {
        self.strict_kinds = strict;
        self
    }

    pub fn include_empty_dirs(mut self, include: bool) -> Self {
        self.include_empty_dirs = include;
        self
    }

    pub fn include_directories(mut self, include: bool) -> Self {
        self.include_directories = include;
        self
    }
}

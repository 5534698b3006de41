//! Decoding pipeline for fsimage checkpoints
//!
//! - [`varint`] - LEB128 length prefixes
//! - [`record`] - Length-delimited record streams
//! - [`proto`] - Record schemas
//! - [`io`] - Random-access image reads
//! - [`summary`] - Trailer and section directory
//! - [`namespace`] - INODE and INODE_DIR section parsers
//! - [`tree`] - Namespace tree reconstruction
//! - [`paths`] - Absolute path materialization
//! - [`stats`] - Name and fan-out rankings

pub mod config;
pub mod error;
pub mod integration_tests;
pub mod io;
pub mod namespace;
pub mod paths;
pub mod proto;
pub mod record;
pub mod stats;
pub mod summary;
pub mod tree;
pub mod varint;

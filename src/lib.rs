//! TinyFS: a small, self-contained block-based filesystem living entirely
//! on top of a fixed-size, in-memory block device backed by a single host
//! file.
//!
//! The public surface is [`Filesystem`] and [`Error`]; everything else is
//! an implementation module composed by `Filesystem`. There is no
//! hierarchical directory structure, no permissions, and no concurrent
//! access from multiple clients.

pub mod bitmap;
pub mod disk;
pub mod error;
pub mod fs;
pub mod inode;
pub mod layout;
pub mod logging;
pub mod namespace;
pub mod open_file;

pub use error::Error;
pub use fs::Filesystem;

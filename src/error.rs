//! The error taxonomy returned by every public filesystem operation.

use std::fmt;
use std::io;

/// An error produced by a filesystem operation.
///
/// Variants are deliberately non-overlapping: each public operation in
/// [`crate::Filesystem`] documents exactly which of these it can return.
#[derive(Debug)]
pub enum Error {
	/// The underlying device or host-file I/O failed, or a loaded image is
	/// not a TinyFS image.
	DiskError(Option<io::Error>),
	/// `File_Create` collided with an existing name (also used for an
	/// empty-name create, which is rejected the same way).
	FileExists,
	/// `File_Open` or `File_Delete` was given an unknown name.
	NoSuchFile,
	/// The inode bitmap is full on create, or the data bitmap is full on
	/// write.
	NoSpace,
	/// The open-file table is full.
	TooManyOpenFiles,
	/// The descriptor is out of range or its slot is not in use.
	BadFd,
	/// `File_Delete` was called on a name with at least one open handle.
	FileInUse,
	/// A write would cross the direct-pointer capacity of a file.
	FileTooBig,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::DiskError(Some(e)) => write!(f, "disk error: {e}"),
			Self::DiskError(None) => write!(f, "disk error"),
			Self::FileExists => write!(f, "file already exists"),
			Self::NoSuchFile => write!(f, "no such file"),
			Self::NoSpace => write!(f, "no space left"),
			Self::TooManyOpenFiles => write!(f, "too many open files"),
			Self::BadFd => write!(f, "bad file descriptor"),
			Self::FileInUse => write!(f, "file is in use"),
			Self::FileTooBig => write!(f, "file too big"),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::DiskError(Some(e)) => Some(e),
			_ => None,
		}
	}
}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Self {
		Self::DiskError(Some(e))
	}
}

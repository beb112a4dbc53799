//! The open-file table: a fixed-size array of handle slots mapping
//! user-facing descriptors to `(inode, byte cursor)`.
//!
//! This is pure in-memory state with no persisted form. Closing a handle,
//! or the process exiting, simply drops it.

use crate::error::Error;
use crate::layout::{FD_OFFSET, OPEN_FILE_TABLE_SIZE};

#[derive(Clone, Copy)]
struct Slot {
	used: bool,
	inode_index: usize,
	file_pointer: usize,
}

impl Slot {
	const fn empty() -> Self {
		Self {
			used: false,
			inode_index: 0,
			file_pointer: 0,
		}
	}
}

/// The fixed-size table of open-file slots.
pub struct OpenFileTable {
	slots: [Slot; OPEN_FILE_TABLE_SIZE],
}

impl OpenFileTable {
	/// A table with every slot free.
	pub fn new() -> Self {
		Self {
			slots: [Slot::empty(); OPEN_FILE_TABLE_SIZE],
		}
	}

	/// Finds a free slot, populates it at cursor 0, and returns the
	/// user-facing descriptor (`slot + FD_OFFSET`).
	pub fn open(&mut self, inode_index: usize) -> Result<i32, Error> {
		let idx = self
			.slots
			.iter()
			.position(|s| !s.used)
			.ok_or(Error::TooManyOpenFiles)?;
		self.slots[idx] = Slot {
			used: true,
			inode_index,
			file_pointer: 0,
		};
		Ok(idx as i32 + FD_OFFSET)
	}

	/// Translates a descriptor to a slot index, validating it refers to a
	/// slot currently in use.
	fn index_for(&self, fd: i32) -> Result<usize, Error> {
		let idx = fd - FD_OFFSET;
		if idx < 0 || idx as usize >= OPEN_FILE_TABLE_SIZE {
			return Err(Error::BadFd);
		}
		let idx = idx as usize;
		if !self.slots[idx].used {
			return Err(Error::BadFd);
		}
		Ok(idx)
	}

	/// The inode a descriptor refers to.
	pub fn inode_of(&self, fd: i32) -> Result<usize, Error> {
		Ok(self.slots[self.index_for(fd)?].inode_index)
	}

	/// The current byte cursor of a descriptor.
	pub fn cursor_of(&self, fd: i32) -> Result<usize, Error> {
		Ok(self.slots[self.index_for(fd)?].file_pointer)
	}

	/// Persists a new byte cursor for a descriptor.
	pub fn set_cursor(&mut self, fd: i32, cursor: usize) -> Result<(), Error> {
		let idx = self.index_for(fd)?;
		self.slots[idx].file_pointer = cursor;
		Ok(())
	}

	/// Frees a slot.
	pub fn close(&mut self, fd: i32) -> Result<(), Error> {
		let idx = self.index_for(fd)?;
		self.slots[idx] = Slot::empty();
		Ok(())
	}

	/// Whether any slot currently references `inode_index`.
	pub fn is_open(&self, inode_index: usize) -> bool {
		self.slots
			.iter()
			.any(|s| s.used && s.inode_index == inode_index)
	}
}

impl Default for OpenFileTable {
	fn default() -> Self {
		Self::new()
	}
}

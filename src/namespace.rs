//! Filename resolution: a linear scan over live inodes.
//!
//! Linearity is acceptable given the small [`crate::layout::MAX_FILES`].

use crate::bitmap::Bitmap;
use crate::disk::Disk;
use crate::error::Error;
use crate::inode::read_inode;
use crate::layout::MAX_FILES;

/// Walks every inode whose bitmap bit is set and returns the index of the
/// first one whose filename matches `name`, or `None` if no live inode
/// matches.
pub fn lookup_file(disk: &Disk, inode_bitmap: &Bitmap, name: &str) -> Result<Option<usize>, Error> {
	for i in 0..MAX_FILES {
		if !inode_bitmap.is_used(i) {
			continue;
		}
		let inode = read_inode(disk, i)?;
		if inode.filename() == name {
			return Ok(Some(i));
		}
	}
	Ok(None)
}

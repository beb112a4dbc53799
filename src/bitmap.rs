//! The inode and data bitmaps: loaded into memory at boot, written back to
//! their home block on every mutation (write-through).
//!
//! Write-through exists because the filesystem has no explicit fsync point
//! for a single operation (only the whole-image [`crate::Filesystem::sync`]),
//! and invariant I8 (in-memory bitmaps equal the on-device copy at rest)
//! must hold at every operation boundary so a later save produces a
//! recoverable image.

use crate::disk::Disk;
use crate::error::Error;
use crate::layout::BLOCK_SIZE;

/// One bitmap: a logical array of booleans, encoded one 4-byte integer per
/// entry (low bit is the used flag, upper bits zero) and mirrored to
/// `home_block`.
pub struct Bitmap {
	entries: Vec<bool>,
	home_block: usize,
}

impl Bitmap {
	/// Creates a bitmap of `len` entries, all free, and writes it through to
	/// `home_block`.
	pub fn format(disk: &mut Disk, home_block: usize, len: usize) -> Result<Self, Error> {
		let bitmap = Self {
			entries: vec![false; len],
			home_block,
		};
		bitmap.write_through(disk)?;
		Ok(bitmap)
	}

	/// Loads a bitmap of `len` entries from `home_block`.
	pub fn load(disk: &Disk, home_block: usize, len: usize) -> Result<Self, Error> {
		let mut block = [0u8; BLOCK_SIZE];
		disk.read(home_block, &mut block)?;

		let mut entries = Vec::with_capacity(len);
		for i in 0..len {
			let off = i * 4;
			let used = block[off] & 1 != 0;
			entries.push(used);
		}
		Ok(Self { entries, home_block })
	}

	fn write_through(&self, disk: &mut Disk) -> Result<(), Error> {
		let mut block = [0u8; BLOCK_SIZE];
		for (i, used) in self.entries.iter().enumerate() {
			block[i * 4] = *used as u8;
		}
		disk.write(self.home_block, &block)
	}

	/// Scans from `start` for the first free entry, marks it used, and
	/// writes the bitmap through. Returns [`Error::NoSpace`] if none is
	/// free.
	pub fn alloc(&mut self, disk: &mut Disk, start: usize) -> Result<usize, Error> {
		let idx = self.entries[start..]
			.iter()
			.position(|used| !used)
			.map(|i| i + start)
			.ok_or(Error::NoSpace)?;
		self.entries[idx] = true;
		self.write_through(disk)?;
		Ok(idx)
	}

	/// Frees `idx`. Out-of-range indices are a silent no-op.
	pub fn free(&mut self, disk: &mut Disk, idx: usize) -> Result<(), Error> {
		if idx >= self.entries.len() {
			return Ok(());
		}
		self.entries[idx] = false;
		self.write_through(disk)
	}

	/// Whether `idx` is currently marked used.
	pub fn is_used(&self, idx: usize) -> bool {
		self.entries.get(idx).copied().unwrap_or(false)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::layout::{DATA_BITMAP_INDEX, NUM_BLOCKS};

	#[test]
	fn alloc_scans_from_start_and_marks_used() {
		let mut disk = Disk::init();
		let mut bm = Bitmap::format(&mut disk, DATA_BITMAP_INDEX, NUM_BLOCKS).unwrap();

		let a = bm.alloc(&mut disk, 3).unwrap();
		assert_eq!(a, 3);
		assert!(bm.is_used(3));

		let b = bm.alloc(&mut disk, 3).unwrap();
		assert_eq!(b, 4);
	}

	#[test]
	fn free_then_realloc_reuses_slot() {
		let mut disk = Disk::init();
		let mut bm = Bitmap::format(&mut disk, DATA_BITMAP_INDEX, NUM_BLOCKS).unwrap();

		let a = bm.alloc(&mut disk, 0).unwrap();
		bm.free(&mut disk, a).unwrap();
		let b = bm.alloc(&mut disk, 0).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn full_bitmap_returns_no_space() {
		let mut disk = Disk::init();
		let mut bm = Bitmap::format(&mut disk, DATA_BITMAP_INDEX, 4).unwrap();
		for _ in 0..4 {
			bm.alloc(&mut disk, 0).unwrap();
		}
		assert!(matches!(bm.alloc(&mut disk, 0), Err(Error::NoSpace)));
	}

	#[test]
	fn free_out_of_range_is_noop() {
		let mut disk = Disk::init();
		let mut bm = Bitmap::format(&mut disk, DATA_BITMAP_INDEX, NUM_BLOCKS).unwrap();
		assert!(bm.free(&mut disk, 999).is_ok());
	}

	#[test]
	fn write_through_is_visible_after_load() {
		let mut disk = Disk::init();
		let mut bm = Bitmap::format(&mut disk, DATA_BITMAP_INDEX, NUM_BLOCKS).unwrap();
		bm.alloc(&mut disk, 0).unwrap();

		let reloaded = Bitmap::load(&disk, DATA_BITMAP_INDEX, NUM_BLOCKS).unwrap();
		assert!(reloaded.is_used(0));
	}
}

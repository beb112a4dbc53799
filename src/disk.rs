//! The block device: a fixed array of blocks held in process memory, backed
//! by a single host file for persistence.
//!
//! There is no caching layer here: a successful [`Disk::write`] is
//! immediately visible to subsequent [`Disk::read`]s but is not persisted to
//! the host file until [`Disk::save`] runs.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::Error;
use crate::layout::{BLOCK_SIZE, NUM_BLOCKS};

/// One block's worth of bytes.
pub type Block = [u8; BLOCK_SIZE];

/// The in-memory block array.
pub struct Disk {
	blocks: Vec<Block>,
}

impl Disk {
	/// Produces a zeroed device of exactly [`NUM_BLOCKS`] blocks.
	pub fn init() -> Self {
		Self {
			blocks: vec![[0u8; BLOCK_SIZE]; NUM_BLOCKS],
		}
	}

	/// Copies one block's worth of bytes into `out`.
	pub fn read(&self, block: usize, out: &mut Block) -> Result<(), Error> {
		let src = self.blocks.get(block).ok_or(Error::DiskError(None))?;
		out.copy_from_slice(src);
		Ok(())
	}

	/// Copies one block's worth of bytes from `data` into the device.
	pub fn write(&mut self, block: usize, data: &Block) -> Result<(), Error> {
		let dst = self.blocks.get_mut(block).ok_or(Error::DiskError(None))?;
		dst.copy_from_slice(data);
		Ok(())
	}

	/// Writes all blocks, in index order, to the host path.
	pub fn save(&self, path: &Path) -> Result<(), Error> {
		let mut file = File::create(path)?;
		for block in &self.blocks {
			file.write_all(block)?;
		}
		Ok(())
	}

	/// Reads `NUM_BLOCKS` blocks back from the host path, in index order.
	///
	/// Fails unless exactly `NUM_BLOCKS` full blocks are read.
	pub fn load(path: &Path) -> Result<Self, Error> {
		let mut file = File::open(path)?;
		let mut blocks = vec![[0u8; BLOCK_SIZE]; NUM_BLOCKS];
		for block in &mut blocks {
			file.read_exact(block)?;
		}
		// A short read (extra trailing bytes) is not detectable via
		// read_exact alone; confirm there is nothing left.
		let mut probe = [0u8; 1];
		if file.read(&mut probe)? != 0 {
			return Err(Error::DiskError(None));
		}
		Ok(Self { blocks })
	}
}

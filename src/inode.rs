//! The on-disk inode record and the inode table's indexed read/write.
//!
//! The record is encoded and decoded at explicit byte offsets rather than
//! cast from a `#[repr(C, packed)]` struct, so the layout has no implicit
//! padding and is independent of the host's struct layout rules.

use crate::disk::Disk;
use crate::error::Error;
use crate::layout::{
	BLOCK_SIZE, INODES_PER_BLOCK, INODE_RECORD_SIZE, INODE_TABLE_START, MAX_FILENAME_LENGTH,
	NUM_DIRECT_POINTERS,
};

/// Sentinel used in a direct pointer slot to mean "unallocated".
pub const UNALLOCATED: i32 = -1;

/// A single inode record: filename, size, and direct block pointers.
#[derive(Clone)]
pub struct Inode {
	filename: [u8; MAX_FILENAME_LENGTH],
	pub size: u32,
	pub data_blocks: [i32; NUM_DIRECT_POINTERS],
}

impl Inode {
	/// A fresh, empty inode: no name, zero size, every pointer unallocated.
	pub fn empty() -> Self {
		Self {
			filename: [0; MAX_FILENAME_LENGTH],
			size: 0,
			data_blocks: [UNALLOCATED; NUM_DIRECT_POINTERS],
		}
	}

	/// Sets the filename, truncating and NUL-terminating it to fit.
	pub fn set_filename(&mut self, name: &str) {
		self.filename = [0; MAX_FILENAME_LENGTH];
		let bytes = name.as_bytes();
		let n = bytes.len().min(MAX_FILENAME_LENGTH - 1);
		self.filename[..n].copy_from_slice(&bytes[..n]);
	}

	/// The filename as a lossy UTF-8 string, up to the first NUL byte.
	pub fn filename(&self) -> String {
		let end = self.filename.iter().position(|&b| b == 0).unwrap_or(0);
		String::from_utf8_lossy(&self.filename[..end]).into_owned()
	}

	/// An inode is live iff its filename is a non-empty, NUL-terminated
	/// string (invariant I2).
	pub fn is_live(&self) -> bool {
		self.filename[0] != 0
	}

	fn encode(&self) -> [u8; INODE_RECORD_SIZE] {
		let mut buf = [0u8; INODE_RECORD_SIZE];
		buf[..MAX_FILENAME_LENGTH].copy_from_slice(&self.filename);
		let mut off = MAX_FILENAME_LENGTH;
		buf[off..off + 4].copy_from_slice(&self.size.to_ne_bytes());
		off += 4;
		for ptr in &self.data_blocks {
			buf[off..off + 4].copy_from_slice(&ptr.to_ne_bytes());
			off += 4;
		}
		buf
	}

	fn decode(buf: &[u8]) -> Self {
		let mut filename = [0u8; MAX_FILENAME_LENGTH];
		filename.copy_from_slice(&buf[..MAX_FILENAME_LENGTH]);
		let mut off = MAX_FILENAME_LENGTH;
		let size = u32::from_ne_bytes(buf[off..off + 4].try_into().unwrap());
		off += 4;
		let mut data_blocks = [0i32; NUM_DIRECT_POINTERS];
		for ptr in &mut data_blocks {
			*ptr = i32::from_ne_bytes(buf[off..off + 4].try_into().unwrap());
			off += 4;
		}
		Self {
			filename,
			size,
			data_blocks,
		}
	}
}

/// Computes the block and in-block byte offset holding inode `index`.
fn location(index: usize) -> (usize, usize) {
	let block = INODE_TABLE_START + index / INODES_PER_BLOCK;
	let offset = (index % INODES_PER_BLOCK) * INODE_RECORD_SIZE;
	(block, offset)
}

/// Reads inode `index` from its block.
pub fn read_inode(disk: &Disk, index: usize) -> Result<Inode, Error> {
	let (block, offset) = location(index);
	let mut buf = [0u8; BLOCK_SIZE];
	disk.read(block, &mut buf)?;
	Ok(Inode::decode(&buf[offset..offset + INODE_RECORD_SIZE]))
}

/// Writes inode `index` back to its block.
///
/// The device only supports whole-block writes, so this is always a
/// read-modify-write.
pub fn write_inode(disk: &mut Disk, index: usize, inode: &Inode) -> Result<(), Error> {
	let (block, offset) = location(index);
	let mut buf = [0u8; BLOCK_SIZE];
	disk.read(block, &mut buf)?;
	buf[offset..offset + INODE_RECORD_SIZE].copy_from_slice(&inode.encode());
	disk.write(block, &buf)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn encode_decode_roundtrip() {
		let mut ino = Inode::empty();
		ino.set_filename("alpha.txt");
		ino.size = 12;
		ino.data_blocks[0] = 7;

		let decoded = Inode::decode(&ino.encode());
		assert_eq!(decoded.filename(), "alpha.txt");
		assert_eq!(decoded.size, 12);
		assert_eq!(decoded.data_blocks[0], 7);
		assert!(decoded.is_live());
	}

	#[test]
	fn long_filename_is_truncated_and_terminated() {
		let mut ino = Inode::empty();
		let long = "a".repeat(MAX_FILENAME_LENGTH + 10);
		ino.set_filename(&long);
		assert_eq!(ino.filename().len(), MAX_FILENAME_LENGTH - 1);
	}

	#[test]
	fn empty_inode_is_not_live() {
		assert!(!Inode::empty().is_live());
	}

	#[test]
	fn read_write_inode_through_disk() {
		let mut disk = Disk::init();
		let mut ino = Inode::empty();
		ino.set_filename("beta.txt");
		ino.size = 3;
		write_inode(&mut disk, 0, &ino).unwrap();
		write_inode(&mut disk, 1, &Inode::empty()).unwrap();

		let back = read_inode(&disk, 0).unwrap();
		assert_eq!(back.filename(), "beta.txt");
		assert_eq!(back.size, 3);

		// Writing inode 1 must not have clobbered inode 0's block slot.
		let other = read_inode(&disk, 1).unwrap();
		assert!(!other.is_live());
	}
}

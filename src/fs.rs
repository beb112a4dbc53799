//! `Filesystem`: the single value that owns the block device, both
//! bitmaps, and the open-file table, constructed by [`Filesystem::boot`]
//! and threaded explicitly through every operation.

use std::path::{Path, PathBuf};

use crate::bitmap::Bitmap;
use crate::disk::Disk;
use crate::error::Error;
use crate::inode::{self, Inode};
use crate::layout::{
	BLOCK_SIZE, DATA_BITMAP_INDEX, DATA_BLOCK_START, INODE_BITMAP_INDEX, MAGIC_NUMBER, MAX_FILES,
	NUM_BLOCKS, NUM_DIRECT_POINTERS, SUPERBLOCK_INDEX,
};
use crate::namespace::lookup_file;
use crate::open_file::OpenFileTable;

/// The whole filesystem: block device, both bitmaps, the inode-table
/// geometry (fixed at compile time, see [`crate::layout`]), and the
/// in-memory open-file table.
pub struct Filesystem {
	disk: Disk,
	inode_bitmap: Bitmap,
	data_bitmap: Bitmap,
	oft: OpenFileTable,
	path: Option<PathBuf>,
}

impl Filesystem {
	/// Loads the image at `path`. On a successful load with a valid magic
	/// number, rehydrates both bitmaps and resets the open-file table. On
	/// any load failure (missing file, short read), formats a fresh image
	/// and writes it to `path`. A successfully loaded image whose magic
	/// number does not match is reported as [`Error::DiskError`], not
	/// reformatted.
	pub fn boot<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
		let path = path.as_ref().to_path_buf();
		match Disk::load(&path) {
			Ok(disk) => {
				log::info!("loaded existing image at {}", path.display());
				Self::mount_existing(disk, path)
			}
			Err(e) => {
				log::info!("no usable image at {} ({e}), formatting", path.display());
				Self::format_fresh(path)
			}
		}
	}

	fn mount_existing(disk: Disk, path: PathBuf) -> Result<Self, Error> {
		let mut block = [0u8; BLOCK_SIZE];
		disk.read(SUPERBLOCK_INDEX, &mut block)?;
		let magic = u32::from_ne_bytes(block[..4].try_into().unwrap());
		if magic != MAGIC_NUMBER {
			log::warn!("{}: bad magic, refusing to mount", path.display());
			return Err(Error::DiskError(None));
		}
		let inode_bitmap = Bitmap::load(&disk, INODE_BITMAP_INDEX, MAX_FILES)?;
		let data_bitmap = Bitmap::load(&disk, DATA_BITMAP_INDEX, NUM_BLOCKS)?;
		Ok(Self {
			disk,
			inode_bitmap,
			data_bitmap,
			oft: OpenFileTable::new(),
			path: Some(path),
		})
	}

	fn format_fresh(path: PathBuf) -> Result<Self, Error> {
		let mut disk = Disk::init();
		let mut superblock = [0u8; BLOCK_SIZE];
		superblock[..4].copy_from_slice(&MAGIC_NUMBER.to_ne_bytes());
		disk.write(SUPERBLOCK_INDEX, &superblock)?;

		let inode_bitmap = Bitmap::format(&mut disk, INODE_BITMAP_INDEX, MAX_FILES)?;
		let data_bitmap = Bitmap::format(&mut disk, DATA_BITMAP_INDEX, NUM_BLOCKS)?;

		let fs = Self {
			disk,
			inode_bitmap,
			data_bitmap,
			oft: OpenFileTable::new(),
			path: Some(path),
		};
		fs.disk.save(fs.path.as_ref().expect("path set above"))?;
		Ok(fs)
	}

	/// Saves the current in-memory disk to the path it was booted from.
	pub fn sync(&self) -> Result<(), Error> {
		let path = self.path.as_deref().ok_or(Error::DiskError(None))?;
		self.disk.save(path)
	}

	/// Creates a new, empty file named `name`.
	pub fn create_file(&mut self, name: &str) -> Result<(), Error> {
		if name.is_empty() {
			return Err(Error::FileExists);
		}
		if lookup_file(&self.disk, &self.inode_bitmap, name)?.is_some() {
			return Err(Error::FileExists);
		}
		let index = self.inode_bitmap.alloc(&mut self.disk, 0)?;

		let mut inode = Inode::empty();
		inode.set_filename(name);
		inode::write_inode(&mut self.disk, index, &inode)?;
		log::debug!("created {name} at inode {index}");
		Ok(())
	}

	/// Opens `name`, returning a descriptor with its cursor at 0.
	pub fn open_file(&mut self, name: &str) -> Result<i32, Error> {
		let index = lookup_file(&self.disk, &self.inode_bitmap, name)?.ok_or(Error::NoSuchFile)?;
		self.oft.open(index)
	}

	/// Reads up to `buf.len()` bytes from `fd`'s current cursor, advancing
	/// it by the number of bytes copied. Returns 0 at end of file. An empty
	/// `buf` returns 0 without even validating `fd`, a permissive contract
	/// that lets callers probe with a zero-length buffer on a descriptor
	/// they haven't opened yet.
	pub fn read(&mut self, fd: i32, buf: &mut [u8]) -> Result<usize, Error> {
		if buf.is_empty() {
			return Ok(0);
		}
		let index = self.oft.inode_of(fd)?;
		let mut cursor = self.oft.cursor_of(fd)?;
		let inode = inode::read_inode(&self.disk, index)?;

		if cursor >= inode.size as usize {
			return Ok(0);
		}
		let bytes_to_read = buf.len().min(inode.size as usize - cursor);

		let mut copied = 0;
		while copied < bytes_to_read {
			let block_index = cursor / BLOCK_SIZE;
			if block_index >= NUM_DIRECT_POINTERS {
				break;
			}
			let disk_block = inode.data_blocks[block_index];
			if disk_block < 0 {
				break;
			}

			let mut block_buf = [0u8; BLOCK_SIZE];
			self.disk.read(disk_block as usize, &mut block_buf)?;

			let block_offset = cursor % BLOCK_SIZE;
			let chunk = (BLOCK_SIZE - block_offset).min(bytes_to_read - copied);
			buf[copied..copied + chunk].copy_from_slice(&block_buf[block_offset..block_offset + chunk]);

			cursor += chunk;
			copied += chunk;
		}

		self.oft.set_cursor(fd, cursor)?;
		Ok(copied)
	}

	/// Writes `buf` at `fd`'s current cursor, allocating data blocks lazily
	/// and growing the file's size as needed. An empty `buf` returns 0
	/// without validating `fd`, mirroring [`Filesystem::read`]'s permissive
	/// contract.
	///
	/// If a block allocation fails partway through, already-allocated
	/// blocks and the bytes already written to them are **not** rolled
	/// back; the inode and cursor updates for this call are simply never
	/// committed, since both only happen once the whole call has
	/// succeeded.
	pub fn write(&mut self, fd: i32, buf: &[u8]) -> Result<usize, Error> {
		if buf.is_empty() {
			return Ok(0);
		}
		let index = self.oft.inode_of(fd)?;
		let mut cursor = self.oft.cursor_of(fd)?;
		let mut inode = inode::read_inode(&self.disk, index)?;

		let mut written = 0;
		while written < buf.len() {
			let block_index = cursor / BLOCK_SIZE;
			if block_index >= NUM_DIRECT_POINTERS {
				return Err(Error::FileTooBig);
			}

			if inode.data_blocks[block_index] == inode::UNALLOCATED {
				let new_block = self.data_bitmap.alloc(&mut self.disk, DATA_BLOCK_START)?;
				self.disk.write(new_block, &[0u8; BLOCK_SIZE])?;
				inode.data_blocks[block_index] = new_block as i32;
			}
			let disk_block = inode.data_blocks[block_index] as usize;

			let mut block_buf = [0u8; BLOCK_SIZE];
			self.disk.read(disk_block, &mut block_buf)?;

			let block_offset = cursor % BLOCK_SIZE;
			let chunk = (BLOCK_SIZE - block_offset).min(buf.len() - written);
			block_buf[block_offset..block_offset + chunk].copy_from_slice(&buf[written..written + chunk]);
			self.disk.write(disk_block, &block_buf)?;

			cursor += chunk;
			written += chunk;
		}

		if cursor > inode.size as usize {
			inode.size = cursor as u32;
		}
		inode::write_inode(&mut self.disk, index, &inode)?;
		self.oft.set_cursor(fd, cursor)?;
		Ok(written)
	}

	/// Releases a descriptor. No flush is required: writes are already
	/// persistent at the device level.
	pub fn close(&mut self, fd: i32) -> Result<(), Error> {
		self.oft.close(fd)
	}

	/// Deletes `name`, freeing its data blocks and inode. Refuses if any
	/// open handle still references it.
	pub fn delete_file(&mut self, name: &str) -> Result<(), Error> {
		let index = lookup_file(&self.disk, &self.inode_bitmap, name)?.ok_or(Error::NoSuchFile)?;
		if self.oft.is_open(index) {
			return Err(Error::FileInUse);
		}

		let inode = inode::read_inode(&self.disk, index)?;
		for &ptr in &inode.data_blocks {
			if ptr >= 0 {
				self.data_bitmap.free(&mut self.disk, ptr as usize)?;
			}
		}
		inode::write_inode(&mut self.disk, index, &Inode::empty())?;
		self.inode_bitmap.free(&mut self.disk, index)?;
		log::debug!("deleted {name} (was inode {index})");
		Ok(())
	}
}

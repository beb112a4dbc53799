//! Compile-time layout constants for the on-disk format and the derived
//! geometry computed from them.

/// Bytes per block. Must be a power of two and at least 64.
pub const BLOCK_SIZE: usize = 256;
/// Total number of blocks on the device.
pub const NUM_BLOCKS: usize = 20;
/// Maximum number of inodes, and thus the upper bound on live files.
pub const MAX_FILES: usize = 16;
/// Maximum number of bytes (including the NUL terminator) of a filename.
pub const MAX_FILENAME_LENGTH: usize = 28;
/// Direct block pointers stored in each inode.
pub const NUM_DIRECT_POINTERS: usize = 5;
/// Maximum number of simultaneously open file handles.
pub const OPEN_FILE_TABLE_SIZE: usize = 5;
/// Added to a slot index to produce the user-facing file descriptor.
///
/// Chosen to avoid collision with the usual stdin/stdout/stderr convention.
pub const FD_OFFSET: i32 = 3;
/// Identifies a formatted image, stored in the first 4 bytes of block 0.
pub const MAGIC_NUMBER: u32 = 0x1234_5678;

/// Block index of the superblock.
pub const SUPERBLOCK_INDEX: usize = 0;
/// Block index of the inode bitmap.
pub const INODE_BITMAP_INDEX: usize = 1;
/// Block index of the data bitmap.
pub const DATA_BITMAP_INDEX: usize = 2;

/// Size in bytes of one packed inode record on disk: filename, size, then
/// the direct pointers.
pub const INODE_RECORD_SIZE: usize = MAX_FILENAME_LENGTH + 4 + NUM_DIRECT_POINTERS * 4;

/// How many inode records fit in one block.
pub const INODES_PER_BLOCK: usize = BLOCK_SIZE / INODE_RECORD_SIZE;

/// How many blocks the inode table spans.
pub const INODE_TABLE_BLOCKS: usize = MAX_FILES.div_ceil(INODES_PER_BLOCK);

/// First block of the inode table.
pub const INODE_TABLE_START: usize = 3;

/// First block available for data allocation.
pub const DATA_BLOCK_START: usize = INODE_TABLE_START + INODE_TABLE_BLOCKS;

/// Largest size, in bytes, a file can reach with only direct pointers.
pub const MAX_FILE_SIZE: usize = NUM_DIRECT_POINTERS * BLOCK_SIZE;

const _: () = assert!(BLOCK_SIZE.is_power_of_two());
const _: () = assert!(BLOCK_SIZE >= 64);
const _: () = assert!(INODES_PER_BLOCK > 0, "a block must fit at least one inode");
const _: () = assert!(DATA_BLOCK_START < NUM_BLOCKS, "no room left for data blocks");

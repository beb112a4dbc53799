//! End-to-end scenarios driving the public API, covering the seed
//! scenarios and the quantified invariants (P1–P6) from the
//! specification.

use std::env;
use std::path::PathBuf;

use tinyfs::bitmap::Bitmap;
use tinyfs::disk::Disk;
use tinyfs::error::Error;
use tinyfs::layout::{DATA_BITMAP_INDEX, MAX_FILE_SIZE, NUM_BLOCKS, OPEN_FILE_TABLE_SIZE};
use tinyfs::Filesystem;

fn temp_path(name: &str) -> PathBuf {
	env::temp_dir().join(format!(
		"tinyfs-integration-{name}-{}-{:?}",
		std::process::id(),
		std::thread::current().id()
	))
}

/// P1: after any sequence of create/write/delete, every bit set in the raw
/// data bitmap block corresponds to exactly one data block referenced by a
/// live file, and vice versa.
#[test]
fn p1_data_bitmap_matches_union_of_live_pointers() {
	let path = temp_path("p1");
	let mut fs = Filesystem::boot(&path).unwrap();

	fs.create_file("a.txt").unwrap();
	let fd_a = fs.open_file("a.txt").unwrap();
	fs.write(fd_a, b"some bytes").unwrap();
	fs.close(fd_a).unwrap();

	fs.create_file("b.txt").unwrap();
	let fd_b = fs.open_file("b.txt").unwrap();
	fs.write(fd_b, &vec![9u8; 600]).unwrap();
	fs.close(fd_b).unwrap();

	fs.delete_file("a.txt").unwrap();
	fs.sync().unwrap();

	// Reload from the freshly saved image and recompute the expected
	// pointer set independently of the bitmap, then compare.
	let disk = Disk::load(&path).unwrap();
	let on_disk_bitmap = Bitmap::load(&disk, DATA_BITMAP_INDEX, NUM_BLOCKS).unwrap();

	let mut fs2 = Filesystem::boot(&path).unwrap();
	let fd_b2 = fs2.open_file("b.txt").unwrap();
	let mut buf = vec![0u8; 600];
	assert_eq!(fs2.read(fd_b2, &mut buf).unwrap(), 600);
	assert_eq!(buf, vec![9u8; 600]);

	// b.txt needs ceil(600/256) = 3 blocks; a.txt's block must be free.
	let used_count = (0..NUM_BLOCKS).filter(|&i| on_disk_bitmap.is_used(i)).count();
	assert_eq!(used_count, 3);

	std::fs::remove_file(&path).ok();
}

/// P2: reading back [0, size) from a freshly opened handle yields exactly
/// the bytes written, in order, across several separate write calls.
#[test]
fn p2_sequential_writes_read_back_in_order() {
	let path = temp_path("p2");
	let mut fs = Filesystem::boot(&path).unwrap();
	fs.create_file("log.txt").unwrap();

	let fd = fs.open_file("log.txt").unwrap();
	let chunks: &[&[u8]] = &[b"alpha-", b"beta-", b"gamma-", b"delta"];
	let mut total = 0;
	for chunk in chunks {
		total += fs.write(fd, chunk).unwrap();
	}
	fs.close(fd).unwrap();

	let fd = fs.open_file("log.txt").unwrap();
	let mut buf = vec![0u8; total];
	assert_eq!(fs.read(fd, &mut buf).unwrap(), total);
	assert_eq!(buf, b"alpha-beta-gamma-delta");

	std::fs::remove_file(&path).ok();
}

/// P3: saving and rebooting from the same path preserves every live
/// file's name, size, and content.
#[test]
fn p3_reboot_preserves_files() {
	let path = temp_path("p3");
	{
		let mut fs = Filesystem::boot(&path).unwrap();
		fs.create_file("one.txt").unwrap();
		let fd = fs.open_file("one.txt").unwrap();
		fs.write(fd, b"first file").unwrap();
		fs.close(fd).unwrap();

		fs.create_file("two.txt").unwrap();
		let fd = fs.open_file("two.txt").unwrap();
		fs.write(fd, b"second").unwrap();
		fs.close(fd).unwrap();

		fs.sync().unwrap();
	}

	let mut fs = Filesystem::boot(&path).unwrap();
	let fd = fs.open_file("one.txt").unwrap();
	let mut buf = [0u8; 32];
	let n = fs.read(fd, &mut buf).unwrap();
	assert_eq!(&buf[..n], b"first file");

	let fd = fs.open_file("two.txt").unwrap();
	let mut buf = [0u8; 32];
	let n = fs.read(fd, &mut buf).unwrap();
	assert_eq!(&buf[..n], b"second");

	std::fs::remove_file(&path).ok();
}

/// P4: after deletion, the name is gone and its data is unreachable
/// because the blocks are reused by a later file with different content.
#[test]
fn p4_delete_makes_name_and_bytes_unreachable() {
	let path = temp_path("p4");
	let mut fs = Filesystem::boot(&path).unwrap();

	fs.create_file("gone.txt").unwrap();
	let fd = fs.open_file("gone.txt").unwrap();
	fs.write(fd, b"secret payload").unwrap();
	fs.close(fd).unwrap();
	fs.delete_file("gone.txt").unwrap();

	assert!(matches!(fs.open_file("gone.txt"), Err(Error::NoSuchFile)));

	fs.create_file("fresh.txt").unwrap();
	let fd = fs.open_file("fresh.txt").unwrap();
	fs.write(fd, b"new data").unwrap();
	let mut buf = [0u8; 32];
	let n = fs.read(fd, &mut buf).unwrap();
	assert_eq!(&buf[..n], b"new data");

	std::fs::remove_file(&path).ok();
}

/// P5: opening past the table's capacity fails; closing one handle makes
/// room for exactly one more.
#[test]
fn p5_open_file_table_capacity() {
	let path = temp_path("p5");
	let mut fs = Filesystem::boot(&path).unwrap();

	let mut fds = Vec::new();
	for i in 0..OPEN_FILE_TABLE_SIZE {
		let name = format!("f{i}.txt");
		fs.create_file(&name).unwrap();
		fds.push(fs.open_file(&name).unwrap());
	}

	fs.create_file("overflow.txt").unwrap();
	assert!(matches!(
		fs.open_file("overflow.txt"),
		Err(Error::TooManyOpenFiles)
	));

	fs.close(fds[0]).unwrap();
	assert!(fs.open_file("overflow.txt").is_ok());

	std::fs::remove_file(&path).ok();
}

/// P6: writing exactly the direct-pointer capacity succeeds; one byte
/// more fails with file-too-big.
#[test]
fn p6_max_file_size_boundary() {
	let path = temp_path("p6");
	let mut fs = Filesystem::boot(&path).unwrap();

	fs.create_file("exact.txt").unwrap();
	let fd = fs.open_file("exact.txt").unwrap();
	assert_eq!(
		fs.write(fd, &vec![b'z'; MAX_FILE_SIZE]).unwrap(),
		MAX_FILE_SIZE
	);

	fs.create_file("over.txt").unwrap();
	let fd = fs.open_file("over.txt").unwrap();
	assert!(matches!(
		fs.write(fd, &vec![b'z'; MAX_FILE_SIZE + 1]),
		Err(Error::FileTooBig)
	));

	std::fs::remove_file(&path).ok();
}

/// Seed scenario 1: boot, create, duplicate create.
#[test]
fn seed_scenario_boot_and_duplicate_create() {
	let path = temp_path("seed1");
	let mut fs = Filesystem::boot(&path).unwrap();
	fs.create_file("alpha.txt").unwrap();
	assert!(matches!(fs.create_file("alpha.txt"), Err(Error::FileExists)));
	std::fs::remove_file(&path).ok();
}

/// Seed scenario 5: every operation on an out-of-range descriptor fails
/// with bad-fd.
#[test]
fn seed_scenario_bad_fd_everywhere() {
	let path = temp_path("seed5");
	let mut fs = Filesystem::boot(&path).unwrap();
	let mut buf = [0u8; 10];
	assert!(matches!(fs.read(999, &mut buf), Err(Error::BadFd)));
	assert!(matches!(fs.write(999, b"x"), Err(Error::BadFd)));
	assert!(matches!(fs.close(999), Err(Error::BadFd)));
	std::fs::remove_file(&path).ok();
}

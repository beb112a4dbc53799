//! Interactive test driver for TinyFS.
//!
//! Boots an image from a path given on the command line (or
//! `filesystem.img` if none is given), then reads commands from stdin
//! until `quit`/`exit` or EOF. Modeled on `mkfs`/`fdisk`'s
//! `parse_args`-over-`env::args_os()` pattern, minus the CLI flags this
//! tool doesn't need.

use std::env;
use std::io::{self, BufRead, Write};
use std::process::exit;

use tinyfs::Filesystem;

fn print_help() {
	println!("commands:");
	println!("  boot <path>            save the current image, then boot a different one");
	println!("  create <name>          create an empty file");
	println!("  open <name>            open a file, prints its fd");
	println!("  read <fd> <n>          read up to n bytes from fd");
	println!("  write <fd> <text...>   write text to fd");
	println!("  close <fd>             close fd");
	println!("  delete <name>          delete a file");
	println!("  sync                   save the image to disk");
	println!("  help                   print this message");
	println!("  quit | exit            leave the driver");
}

fn run_command(fs: &mut Filesystem, line: &str) {
	let mut parts = line.split_whitespace();
	let Some(cmd) = parts.next() else {
		return;
	};
	match cmd {
		"help" => print_help(),
		"boot" => match parts.next() {
			Some(path) => {
				if let Err(e) = fs.sync() {
					println!("error: {e}");
					return;
				}
				match Filesystem::boot(path) {
					Ok(new_fs) => {
						*fs = new_fs;
						println!("booted {path}");
					}
					Err(e) => println!("error: {e}"),
				}
			}
			None => println!("usage: boot <path>"),
		},
		"create" => match parts.next() {
			Some(name) => match fs.create_file(name) {
				Ok(()) => println!("created {name}"),
				Err(e) => println!("error: {e}"),
			},
			None => println!("usage: create <name>"),
		},
		"open" => match parts.next() {
			Some(name) => match fs.open_file(name) {
				Ok(fd) => println!("opened fd={fd}"),
				Err(e) => println!("error: {e}"),
			},
			None => println!("usage: open <name>"),
		},
		"read" => {
			let fd = parts.next().and_then(|s| s.parse::<i32>().ok());
			let n = parts.next().and_then(|s| s.parse::<usize>().ok());
			match (fd, n) {
				(Some(fd), Some(n)) => {
					let mut buf = vec![0u8; n];
					match fs.read(fd, &mut buf) {
						Ok(read) => {
							println!("read {read} bytes: {:?}", String::from_utf8_lossy(&buf[..read]))
						}
						Err(e) => println!("error: {e}"),
					}
				}
				_ => println!("usage: read <fd> <n>"),
			}
		}
		"write" => {
			let fd = parts.next().and_then(|s| s.parse::<i32>().ok());
			let text = parts.collect::<Vec<_>>().join(" ");
			match fd {
				Some(fd) if !text.is_empty() => match fs.write(fd, text.as_bytes()) {
					Ok(written) => println!("wrote {written} bytes"),
					Err(e) => println!("error: {e}"),
				},
				_ => println!("usage: write <fd> <text...>"),
			}
		}
		"close" => match parts.next().and_then(|s| s.parse::<i32>().ok()) {
			Some(fd) => match fs.close(fd) {
				Ok(()) => println!("closed fd={fd}"),
				Err(e) => println!("error: {e}"),
			},
			None => println!("usage: close <fd>"),
		},
		"delete" => match parts.next() {
			Some(name) => match fs.delete_file(name) {
				Ok(()) => println!("deleted {name}"),
				Err(e) => println!("error: {e}"),
			},
			None => println!("usage: delete <name>"),
		},
		"sync" => match fs.sync() {
			Ok(()) => println!("synced"),
			Err(e) => println!("error: {e}"),
		},
		other => println!("unknown command: {other} (try 'help')"),
	}
}

fn main() {
	tinyfs::logging::init();

	let image_path = env::args().nth(1).unwrap_or_else(|| "filesystem.img".to_owned());
	let mut fs = Filesystem::boot(&image_path).unwrap_or_else(|e| {
		eprintln!("tinyfs: {image_path}: {e}");
		exit(1);
	});
	println!("tinyfs: booted {image_path}, type 'help' for commands");

	let stdin = io::stdin();
	loop {
		print!("tinyfs> ");
		let _ = io::stdout().flush();

		let mut line = String::new();
		if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
			break;
		}
		let line = line.trim();
		if line == "quit" || line == "exit" {
			break;
		}
		if !line.is_empty() {
			run_command(&mut fs, line);
		}
	}
}

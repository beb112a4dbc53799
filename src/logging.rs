//! Thin logging setup shared by the binary and, in tests, the library.
//!
//! The library itself never prints to stdout/stderr or exits the process,
//! only the CLI driver does that (see `src/bin/tinyfs.rs`). Library code
//! reports diagnostics exclusively through the [`log`] facade so a caller
//! embedding [`crate::Filesystem`] controls where those diagnostics go.

/// Installs an [`env_logger`] subscriber reading `RUST_LOG`, defaulting to
/// `info` when unset. Safe to call more than once; later calls are no-ops.
pub fn init() {
	let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
		.try_init();
}

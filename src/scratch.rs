//! Throwaway directories for filesystem tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT: AtomicUsize = AtomicUsize::new(0);

pub struct Scratch {
	root: PathBuf,
}

impl Scratch {
	pub fn new(name: &str) -> Self {
		let n = NEXT.fetch_add(1, Ordering::Relaxed);
		let root = std::env::temp_dir().join(format!("eml-send-{}-{name}-{n}", std::process::id()));
		// leftovers from an earlier run with the same pid
		let _ = std::fs::remove_dir_all(&root);
		std::fs::create_dir_all(&root).unwrap();
		Self { root }
	}

	pub fn path(&self) -> &Path {
		&self.root
	}
}

impl Drop for Scratch {
	fn drop(&mut self) {
		let _ = std::fs::remove_dir_all(&self.root);
	}
}

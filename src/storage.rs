use std::fs::{self, File};
use std::io::{self, Write as _};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context as _;

use crate::message::Message;

pub const EXTENSION: &str = "eml";

/// Make sure `dir` exists as a directory, creating missing ancestors.
///
/// Calling this on an existing directory does nothing.
pub fn ensure_storage_directory(dir: &Path) -> io::Result<()> {
	if dir.is_dir() {
		return Ok(());
	}
	fs::create_dir_all(dir)?;
	tracing::info!(dir = %dir.display(), "created storage directory");
	Ok(())
}

pub fn message_path(dir: &Path, message: &Message) -> PathBuf {
	dir.join(message.file_stem()).with_extension(EXTENSION)
}

/// Create or truncate `path` and write `content` to it.
///
/// The file is synced and closed before this returns.
pub fn write_message_file(path: &Path, content: &str) -> io::Result<()> {
	let mut file = File::create(path)?;
	file.write_all(content.as_bytes())?;
	file.sync_all()?;
	drop(file);
	tracing::debug!(path = %path.display(), bytes = content.len(), "wrote message file");
	Ok(())
}

pub struct StoredMessage {
	pub name: String,
	pub size: u64,
	pub modified: SystemTime,
}

/// Stored `.eml` files in `dir`, newest first.
pub fn list_messages(dir: &Path) -> anyhow::Result<Vec<StoredMessage>> {
	let entries = fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;

	let mut messages = Vec::new();
	for entry in entries {
		let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
		let path = entry.path();
		if path.extension().map_or(true, |ext| ext != EXTENSION) {
			continue;
		}
		let metadata = entry
			.metadata()
			.with_context(|| format!("reading metadata of {}", path.display()))?;
		if !metadata.is_file() {
			continue;
		}
		messages.push(StoredMessage {
			name: entry.file_name().to_string_lossy().into_owned(),
			size: metadata.len(),
			modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
		});
	}

	messages.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| b.name.cmp(&a.name)));
	Ok(messages)
}

/// Contents of the stored message `name`, which must be a bare file name.
pub fn read_message(dir: &Path, name: &str) -> anyhow::Result<String> {
	let mut components = Path::new(name).components();
	anyhow::ensure!(
		matches!(
			(components.next(), components.next()),
			(Some(Component::Normal(_)), None)
		),
		"{name:?} is not a plain file name"
	);

	let path = dir.join(name);
	fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::mail::Dispatcher;
use crate::message::Message;
use crate::storage;

#[derive(Debug, thiserror::Error)]
pub enum SendError {
	#[error("creating storage directory {}", .dir.display())]
	CreateDir {
		dir: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("writing {}", .path.display())]
	Write {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("dispatching failed, message saved to {}", .path.display())]
	Dispatch {
		path: PathBuf,
		#[source]
		source: anyhow::Error,
	},
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// Written to disk and accepted by the dispatcher.
	Sent { path: PathBuf, message_id: String },
	/// Written to disk; dispatching is turned off.
	Stored { path: PathBuf, message_id: String },
}

pub struct EmailSender<D> {
	pub storage_dir: PathBuf,
	pub from: String,
	pub domain: String,
	/// Whether to run `dispatcher` after the file is written.
	pub dispatch: bool,
	pub dispatcher: D,
}

impl<D: Dispatcher> EmailSender<D> {
	/// Compose the message, store it, then hand it to the dispatcher.
	///
	/// The stored file is kept whatever the dispatcher does.
	pub fn send_email(
		&self,
		to: &str,
		subject: &str,
		body: &str,
		now: DateTime<Local>,
	) -> Result<Outcome, SendError> {
		let message = Message::new(&self.from, to, subject, body, now, &self.domain);

		storage::ensure_storage_directory(&self.storage_dir).map_err(|source| {
			SendError::CreateDir {
				dir: self.storage_dir.clone(),
				source,
			}
		})?;

		let path = storage::message_path(&self.storage_dir, &message);
		storage::write_message_file(&path, &message.compose()).map_err(|source| SendError::Write {
			path: path.clone(),
			source,
		})?;

		let message_id = message.message_id().to_owned();
		if !self.dispatch {
			tracing::info!(path = %path.display(), "dispatch disabled, message stored only");
			return Ok(Outcome::Stored { path, message_id });
		}

		match self.dispatcher.dispatch(&path) {
			Ok(()) => Ok(Outcome::Sent { path, message_id }),
			Err(source) => Err(SendError::Dispatch { path, source }),
		}
	}
}

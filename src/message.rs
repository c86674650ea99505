use chrono::{DateTime, Local};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_STEM_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// A plain-text message as it is written to disk and handed to the mailer.
///
/// The date and message id are fixed when the message is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
	pub from: String,
	pub to: String,
	pub subject: String,
	pub body: String,
	date: DateTime<Local>,
	message_id: String,
}

impl Message {
	pub fn new(
		from: &str,
		to: &str,
		subject: &str,
		body: &str,
		now: DateTime<Local>,
		domain: &str,
	) -> Self {
		Self {
			from: from.to_owned(),
			to: to.to_owned(),
			subject: subject.to_owned(),
			body: body.to_owned(),
			date: now,
			message_id: message_id(now, domain),
		}
	}

	pub fn message_id(&self) -> &str {
		&self.message_id
	}

	/// Name of the file this message is stored under, without the extension.
	pub fn file_stem(&self) -> String {
		self.date.format(FILE_STEM_FORMAT).to_string()
	}

	/// Render the headers, a blank line and the body.
	///
	/// Header values are written as given; nothing is escaped or folded.
	pub fn compose(&self) -> String {
		format!(
			"\
			From: {}\n\
			To: {}\n\
			Subject: {}\n\
			Date: {}\n\
			Message-ID: {}\n\
			\n\
			{}\n",
			self.from,
			self.to,
			self.subject,
			self.date.format(DATE_FORMAT),
			self.message_id,
			self.body,
		)
	}
}

pub fn message_id(now: DateTime<Local>, domain: &str) -> String {
	format!("<{}@{domain}>", now.timestamp())
}

/// Host name used as the message id domain, or `localhost` if it can't be read.
pub fn default_domain() -> String {
	match nix::unistd::gethostname() {
		Ok(name) => match name.into_string() {
			Ok(name) if !name.is_empty() => name,
			_ => "localhost".to_owned(),
		},
		Err(error) => {
			tracing::debug!(%error, "gethostname failed");
			"localhost".to_owned()
		}
	}
}

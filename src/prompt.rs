use std::io::{BufRead, Write};

use anyhow::Context as _;

/// Line that ends the body.
pub const BODY_TERMINATOR: &str = ".";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Draft {
	pub to: String,
	pub subject: String,
	pub body: String,
}

fn read_line(input: &mut impl BufRead) -> anyhow::Result<Option<String>> {
	let mut line = String::new();
	if input.read_line(&mut line).context("reading stdin")? == 0 {
		return Ok(None);
	}
	if line.ends_with('\n') {
		line.pop();
		if line.ends_with('\r') {
			line.pop();
		}
	}
	Ok(Some(line))
}

fn ask(output: &mut impl Write, prompt: &str) -> anyhow::Result<()> {
	write!(output, "{prompt}")?;
	output.flush()?;
	Ok(())
}

/// Prompt for recipient, subject and body.
///
/// Every body line is kept with a trailing `\n`. The body ends at a line
/// holding only `.`, or at end of input.
pub fn read_draft(mut input: impl BufRead, mut output: impl Write) -> anyhow::Result<Draft> {
	ask(&mut output, "To: ")?;
	let to = read_line(&mut input)?.context("input ended before a recipient was entered")?;

	ask(&mut output, "Subject: ")?;
	let subject = read_line(&mut input)?.unwrap_or_default();

	ask(&mut output, "Body (end with a line containing only a period):\n")?;
	let mut body = String::new();
	while let Some(line) = read_line(&mut input)? {
		if line == BODY_TERMINATOR {
			break;
		}
		body.push_str(&line);
		body.push('\n');
	}

	Ok(Draft { to, subject, body })
}

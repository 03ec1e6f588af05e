//! `FTMSG/1.0` framing used on the wire by the queue proxies.
//!
//! ```text
//! FTMSG/1.0
//! Message-Id: fc429b46-2500-4fe7-88bb-fd507fbaf00c
//! X-Request-Id: tid_t9happe59y
//!
//! {"uuid":"..."}
//! ```

use super::Message;
use std::collections::HashMap;
use std::fmt::Write as _;

pub const FTMSG_VERSION_LINE: &str = "FTMSG/1.0";
const FTMSG_PREFIX: &str = "FTMSG/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("message does not start with an FTMSG version line")]
    MissingVersion,
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),
    #[error("header {0:?} contains a line break")]
    LineBreakInHeader(String),
}

/// Render a message in `FTMSG/1.0` framing. Headers are sorted by name.
///
/// A CR or LF inside a header would shift the frame, so such messages are
/// refused instead of encoded.
pub fn encode(message: &Message) -> Result<String, CodecError> {
    let mut names: Vec<&String> = message.headers.keys().collect();
    names.sort();

    if let Some(name) = names
        .iter()
        .find(|name| has_line_break(name) || has_line_break(&message.headers[**name]))
    {
        return Err(CodecError::LineBreakInHeader((*name).clone()));
    }

    let mut out = String::with_capacity(message.body.len() + 64 * names.len() + 16);
    out.push_str(FTMSG_VERSION_LINE);
    out.push('\n');
    for name in names {
        let _ = writeln!(out, "{name}: {}", message.headers[name]);
    }
    out.push('\n');
    out.push_str(&message.body);
    Ok(out)
}

/// Parse an `FTMSG` framed payload back into a [`Message`].
pub fn decode(raw: &str) -> Result<Message, CodecError> {
    let (head, body) = split_head_and_body(raw);

    let mut lines = head.lines();
    let version = lines.next().map(str::trim).unwrap_or_default();
    if !version.starts_with(FTMSG_PREFIX) {
        return Err(CodecError::MissingVersion);
    }

    let mut headers = HashMap::new();
    for line in lines {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| CodecError::MalformedHeader(line.to_string()))?;
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }

    Ok(Message::new(headers, body))
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\r', '\n'])
}

fn split_head_and_body(raw: &str) -> (&str, &str) {
    let crlf = raw.find("\r\n\r\n").map(|idx| (idx, 4));
    let lf = raw.find("\n\n").map(|idx| (idx, 2));
    let split = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };
    match split {
        Some((idx, sep)) => (&raw[..idx], &raw[idx + sep..]),
        None => (raw, ""),
    }
}

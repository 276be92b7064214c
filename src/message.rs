// message.rs - Whole message parsing, header helpers and serialization

use crate::config::{default_config, ParserConfig};
use crate::headers::{parse_headers_with, Header, HeaderSource};
use crate::scan::trim_sip;
use crate::start_line::{parse_start_line, StartLine};
use crate::uri::{parse_uri_with, Uri};
use crate::{Result, SipParseError};
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Names under which the sequence number header is looked up.
const CSEQ_NAMES: [&str; 2] = ["CSeq", "s"];
const CONTENT_TYPE_NAMES: [&str; 2] = ["Content-Type", "c"];
const CONTENT_LENGTH_NAMES: [&str; 2] = ["Content-Length", "l"];

/// Message body
///
/// `length` is the byte length of `content`; any `Content-Length` header in
/// the source text is not consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub content: String,
    pub length: usize,
    pub content_type: Option<String>,
}

impl Body {
    pub fn new(content: &str, content_type: Option<&str>) -> Self {
        Self {
            content: content.to_string(),
            length: content.len(),
            content_type: content_type.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub raw: String,
    pub start_line: StartLine,
    /// Parsed request target; `None` for responses
    pub request_uri: Option<Uri>,
    pub headers: Vec<Header>,
    pub body: Body,
}

impl Message {
    pub fn new(start_line: StartLine, headers: Vec<Header>, body: Body) -> Self {
        Self {
            raw: String::new(),
            start_line,
            request_uri: None,
            headers,
            body,
        }
    }

    /// Body of the first header named exactly `name`.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.body.as_str())
    }

    /// Replaces the body of the first header named `name`, or appends a new
    /// header when there is none. The body is trimmed.
    pub fn set_header(&mut self, name: &str, body: &str) {
        match self.headers.iter_mut().find(|h| h.name == name) {
            Some(header) => header.body = trim_sip(body).to_string(),
            None => self.headers.push(Header::new(name, body)),
        }
    }

    /// Adds `delta` to the number in the `CSeq` header (or its compact
    /// form `s`), keeping the method token.
    pub fn update_sequence_number(&mut self, delta: i64) -> Result<()> {
        let header = self
            .headers
            .iter_mut()
            .find(|h| CSEQ_NAMES.contains(&h.name.as_str()))
            .ok_or_else(|| SipParseError::MissingHeader("CSeq".to_string()))?;

        let (number, method) = header
            .body
            .split_once(' ')
            .ok_or_else(|| SipParseError::MalformedHeader(format!("CSeq: {}", header.body)))?;
        let updated = number
            .parse::<i64>()
            .ok()
            .and_then(|n| n.checked_add(delta))
            .filter(|n| *n >= 0)
            .ok_or_else(|| SipParseError::MalformedHeader(format!("CSeq: {}", header.body)))?;

        header.body = format!("{} {}", updated, method);
        Ok(())
    }

    /// Writes `Content-Length` (and `Content-Type` when known) for a
    /// non-empty body. An existing header in compact form (`l`, `c`) is
    /// updated under its own name.
    pub fn sync_body_headers(&mut self) {
        if self.body.length == 0 {
            return;
        }
        let length = self.body.length.to_string();
        self.set_header_any(&CONTENT_LENGTH_NAMES, &length);
        if let Some(content_type) = self.body.content_type.clone() {
            if !content_type.is_empty() {
                self.set_header_any(&CONTENT_TYPE_NAMES, &content_type);
            }
        }
    }

    // `names[0]` is used when none of the names is present
    fn set_header_any(&mut self, names: &[&str; 2], body: &str) {
        let name = names
            .iter()
            .copied()
            .find(|name| self.headers.iter().any(|h| h.name == *name))
            .unwrap_or(names[0]);
        self.set_header(name, body);
    }

    /// Parsed request URI, only present for requests.
    pub fn request_uri(&self) -> Option<&Uri> {
        self.request_uri.as_ref()
    }
}

/// Splits off the body at the first blank line (`\r\n\r\n`, else `\n\n`).
pub fn parse_body(text: &str) -> Result<Body> {
    let (_, content) = text
        .split_once("\r\n\r\n")
        .or_else(|| text.split_once("\n\n"))
        .ok_or(SipParseError::MissingBodySeparator)?;
    Ok(Body::new(content, None))
}

pub fn parse_message(text: &str) -> Result<Message> {
    parse_message_with(text, default_config())
}

/// Parses a complete message: start line, request URI, headers, body.
///
/// The first failing step aborts the parse. A missing blank line before
/// the body only fails when `config.strict_body` is set; otherwise the body
/// is left empty.
pub fn parse_message_with(text: &str, config: &ParserConfig) -> Result<Message> {
    if text.len() > config.max_message_length {
        warn!(
            "Rejecting message of {} bytes (max: {})",
            text.len(),
            config.max_message_length
        );
        return Err(SipParseError::MessageTooLarge(text.len(), config.max_message_length));
    }

    let start_line = parse_start_line(text)?;
    let request_uri = if start_line.is_request() {
        Some(parse_uri_with(&start_line.request_uri, config)?)
    } else {
        None
    };
    let headers = parse_headers_with(text, HeaderSource::FullMessage, config)?;

    let mut body = match parse_body(text) {
        Ok(body) => body,
        Err(e) if !config.strict_body => {
            warn!("Ignoring body: {}", e);
            Body::default()
        }
        Err(e) => return Err(e),
    };
    body.content_type = headers
        .iter()
        .find(|h| CONTENT_TYPE_NAMES.contains(&h.name.as_str()))
        .map(|h| h.body.clone());

    debug!(
        "Parsed SIP message: {} headers, {} byte body",
        headers.len(),
        body.length
    );

    Ok(Message {
        raw: text.to_string(),
        start_line,
        request_uri,
        headers,
        body,
    })
}

/// Parses a message from raw bytes, checking size and UTF-8 first.
pub fn parse_message_bytes(input: &[u8]) -> Result<Message> {
    let config = default_config();
    if input.len() > config.max_message_length {
        return Err(SipParseError::MessageTooLarge(input.len(), config.max_message_length));
    }
    let text = std::str::from_utf8(input).map_err(|_| SipParseError::InvalidUtf8)?;
    parse_message_with(text, config)
}

/// Renders `message` as wire text.
///
/// The message itself is left untouched; `Content-Length` and
/// `Content-Type` are written into the output when the body is non-empty.
pub fn serialize_message(message: &Message) -> Result<String> {
    let bytes = serialize_message_bytes(message)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn serialize_message_bytes(message: &Message) -> Result<Bytes> {
    if message.start_line.raw.is_empty() || message.headers.is_empty() {
        return Err(SipParseError::EmptyMessage);
    }

    let mut out = message.clone();
    out.sync_body_headers();

    let mut buf = BytesMut::with_capacity(out.raw.len().max(256) + out.body.length);
    buf.put_slice(out.start_line.raw.as_bytes());
    buf.put_slice(b"\r\n");
    for header in &out.headers {
        buf.put_slice(header.name.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(header.body.as_bytes());
        buf.put_slice(b"\r\n");
    }
    buf.put_slice(b"\r\n");
    if out.body.length > 0 {
        buf.put_slice(out.body.content.as_bytes());
    }

    debug!("Serialized SIP message: {} bytes", buf.len());
    Ok(buf.freeze())
}

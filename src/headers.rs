// headers.rs - Header block parsing with line folding

use crate::config::{default_config, ParserConfig};
use crate::scan::trim_sip;
use crate::{Result, SipParseError};
use nom::{
    bytes::complete::take_while,
    character::complete::satisfy,
    combinator::{all_consuming, recognize},
    sequence::pair,
    IResult,
};
use serde::{Deserialize, Serialize};

/// One `Name: body` header. Folded bodies are joined into one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub body: String,
}

impl Header {
    pub fn new(name: &str, body: &str) -> Self {
        Self {
            name: trim_sip(name).to_string(),
            body: trim_sip(body).to_string(),
        }
    }
}

/// Where the header block starts in the text handed to `parse_headers`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSource {
    /// A full message; the start line is skipped
    FullMessage,
    /// Only headers, possibly preceded by blank space
    HeadersOnly,
}

// ALPHA *( ALPHA / DIGIT / "-" )
fn header_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic()),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '-'),
    ))(input)
}

pub fn is_valid_header_name(name: &str) -> bool {
    all_consuming(header_name)(name).is_ok()
}

fn is_end_of_headers(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with('\r') || rest.starts_with('\n')
}

fn is_continuation(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

pub fn parse_headers(text: &str, source: HeaderSource) -> Result<Vec<Header>> {
    parse_headers_with(text, source, default_config())
}

/// Splits a header block into ordered `Header` values.
///
/// An empty block is an error. Every header line, including the last one,
/// must be terminated by a newline. Lines starting with a space or tab
/// continue the previous header.
pub fn parse_headers_with(
    text: &str,
    source: HeaderSource,
    config: &ParserConfig,
) -> Result<Vec<Header>> {
    let mut rest = match source {
        HeaderSource::FullMessage => text
            .split_once('\n')
            .map(|(_, headers)| headers)
            .ok_or(SipParseError::NoHeaders)?,
        HeaderSource::HeadersOnly => {
            text.trim_start_matches(|c: char| c == ' ' || c == '\t' || c == '\r' || c == '\n')
        }
    };
    if is_end_of_headers(rest) {
        return Err(SipParseError::NoHeaders);
    }

    let mut headers = Vec::new();
    loop {
        let (name, after) = rest
            .split_once(':')
            .ok_or_else(|| SipParseError::MalformedHeader(first_line(rest).to_string()))?;
        if name.is_empty() || after.is_empty() || !is_valid_header_name(name) {
            return Err(SipParseError::MalformedHeader(first_line(rest).to_string()));
        }

        let mut body = String::new();
        let mut remaining = after;
        loop {
            let (segment, next) = remaining
                .split_once('\n')
                .ok_or_else(|| SipParseError::MalformedHeader(format!("unterminated {}", name)))?;
            body.push_str(segment.strip_suffix('\r').unwrap_or(segment));
            remaining = next;
            if next.is_empty() || !is_continuation(next) {
                break;
            }
        }

        headers.push(Header {
            name: name.to_string(),
            body: trim_sip(&body).to_string(),
        });
        if headers.len() > config.max_headers {
            return Err(SipParseError::TooManyHeaders(headers.len(), config.max_headers));
        }

        rest = remaining;
        if is_end_of_headers(rest) {
            break;
        }
    }

    Ok(headers)
}

fn first_line(text: &str) -> &str {
    trim_sip(text.split('\n').next().unwrap_or_default())
}

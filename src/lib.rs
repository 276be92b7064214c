// lib.rs - Textual parser and serializer for SIP wire elements
//
// Turns socket address specifiers, URIs, start lines, header blocks and bodies
// into structured values and back. There is no I/O in this crate: every entry
// point is a pure function of its input text (and, for the `*_with` variants,
// a `ParserConfig`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod address;
pub mod config;
pub mod headers;
pub mod message;
pub mod param;
mod scan;
pub mod start_line;
pub mod uri;

pub use address::{
    classify_address, classify_address_bracket_aware, parse_socket_address,
    parse_socket_address_with, AddressKind, SocketAddress, Transport,
};
pub use config::{default_config, ConfigError, ParserConfig};
pub use headers::{is_valid_header_name, parse_headers, parse_headers_with, Header, HeaderSource};
pub use message::{
    parse_body, parse_message, parse_message_bytes, parse_message_with, serialize_message,
    serialize_message_bytes, Body, Message,
};
pub use param::{extract_parameter, parse_digest_auth_params, ParamMode, Parameter};
pub use start_line::{parse_start_line, MessageKind, StartLine};
pub use uri::{
    parse_uri, parse_uri_with, socket_address_to_uri, uri_to_socket_address,
    uri_to_socket_address_with, Scheme, TransportMode, Uri,
};

// Security limits based on RFC recommendations and common attack vectors
pub const MAX_HEADER_LENGTH: usize = 8192;
pub const MAX_HEADERS: usize = 256;
pub const MAX_URI_LENGTH: usize = 2048;
pub const MAX_BODY_LENGTH: usize = 65536;

/// Protocol token carried by every start line.
pub const SIP_VERSION: &str = "SIP/2.0";

pub type Result<T> = std::result::Result<T, SipParseError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SipParseError {
    #[error("Invalid socket address: {0}")]
    InvalidSocketAddress(String),

    #[error("Invalid IPv6 literal: {0}")]
    InvalidIpv6(String),

    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Unknown transport: {0}")]
    InvalidTransport(String),

    #[error("Invalid URI scheme: {0}")]
    InvalidScheme(String),

    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("URI too long: {0} bytes (max: {1})")]
    UriTooLong(usize, usize),

    #[error("Start line too short")]
    StartLineTooShort,

    #[error("Malformed start line: {0}")]
    StartLineFormat(String),

    #[error("Status line too short: {0}")]
    ResponseLineTooShort(String),

    #[error("Malformed status line: {0}")]
    ResponseLineFormat(String),

    #[error("Invalid status code: {0}")]
    InvalidStatusCode(String),

    #[error("Malformed request line: {0}")]
    RequestLineFormat(String),

    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    #[error("Quoted value not allowed for parameter: {0}")]
    ParamFormat(String),

    #[error("No headers present")]
    NoHeaders,

    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    #[error("Too many headers: {0} (max: {1})")]
    TooManyHeaders(usize, usize),

    #[error("Missing header: {0}")]
    MissingHeader(String),

    #[error("Missing blank line between headers and body")]
    MissingBodySeparator,

    #[error("Message has no start line or no headers")]
    EmptyMessage,

    #[error("Message too large: {0} bytes (max: {1})")]
    MessageTooLarge(usize, usize),

    #[error("Invalid UTF-8")]
    InvalidUtf8,
}

impl SipParseError {
    /// Numeric result code shared with existing SIP tooling.
    ///
    /// `-1` is the generic failure, `-2` a failed lookup, the `-1xx` range
    /// covers start-line problems and `-150` a parameter format error.
    pub fn code(&self) -> i32 {
        match self {
            SipParseError::MissingHeader(_) => -2,
            SipParseError::StartLineTooShort => -100,
            SipParseError::StartLineFormat(_) => -101,
            SipParseError::ResponseLineTooShort(_) => -102,
            SipParseError::ResponseLineFormat(_) => -103,
            SipParseError::InvalidStatusCode(_) => -104,
            SipParseError::RequestLineFormat(_) => -120,
            SipParseError::ParamFormat(_) => -150,
            _ => -1,
        }
    }

    /// True for lookups that found nothing, as opposed to malformed input.
    pub fn is_not_found(&self) -> bool {
        self.code() == -2
    }
}

/// Request method of a start line. Unknown tokens are kept upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SipMethod {
    Register,
    Invite,
    Ack,
    Bye,
    Cancel,
    Options,
    Info,
    Update,
    Prack,
    Subscribe,
    Notify,
    Refer,
    Message,
    Publish,
    Other(String),
}

impl SipMethod {
    const KNOWN: [SipMethod; 14] = [
        SipMethod::Register,
        SipMethod::Invite,
        SipMethod::Ack,
        SipMethod::Bye,
        SipMethod::Cancel,
        SipMethod::Options,
        SipMethod::Info,
        SipMethod::Update,
        SipMethod::Prack,
        SipMethod::Subscribe,
        SipMethod::Notify,
        SipMethod::Refer,
        SipMethod::Message,
        SipMethod::Publish,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            SipMethod::Register => "REGISTER",
            SipMethod::Invite => "INVITE",
            SipMethod::Ack => "ACK",
            SipMethod::Bye => "BYE",
            SipMethod::Cancel => "CANCEL",
            SipMethod::Options => "OPTIONS",
            SipMethod::Info => "INFO",
            SipMethod::Update => "UPDATE",
            SipMethod::Prack => "PRACK",
            SipMethod::Subscribe => "SUBSCRIBE",
            SipMethod::Notify => "NOTIFY",
            SipMethod::Refer => "REFER",
            SipMethod::Message => "MESSAGE",
            SipMethod::Publish => "PUBLISH",
            SipMethod::Other(token) => token,
        }
    }
}

impl FromStr for SipMethod {
    type Err = SipParseError;

    /// Matches case-insensitively. The token must be 1 to 32 ASCII
    /// alphanumerics.
    fn from_str(s: &str) -> Result<Self> {
        let valid = (1..=32).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphanumeric());
        if !valid {
            return Err(SipParseError::InvalidMethod(s.to_string()));
        }

        let method = Self::KNOWN
            .iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(s))
            .cloned()
            .unwrap_or_else(|| SipMethod::Other(s.to_ascii_uppercase()));
        Ok(method)
    }
}

impl fmt::Display for SipMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str() {
        assert_eq!("INVITE".parse::<SipMethod>().unwrap(), SipMethod::Invite);
        assert_eq!("register".parse::<SipMethod>().unwrap(), SipMethod::Register);
        assert_eq!(
            "KICK".parse::<SipMethod>().unwrap(),
            SipMethod::Other("KICK".to_string())
        );
        assert!("IN VITE".parse::<SipMethod>().is_err());
        assert!("".parse::<SipMethod>().is_err());
        assert!("A".repeat(33).parse::<SipMethod>().is_err());
        assert_eq!(
            "kick".parse::<SipMethod>().unwrap(),
            SipMethod::Other("KICK".to_string())
        );
    }

    #[test]
    fn test_method_display() {
        assert_eq!(SipMethod::Options.to_string(), "OPTIONS");
        assert_eq!(SipMethod::Other("KICK".to_string()).to_string(), "KICK");
        assert_eq!(SipMethod::Subscribe.as_str(), "SUBSCRIBE");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SipParseError::InvalidUri("x".into()).code(), -1);
        assert_eq!(SipParseError::MissingHeader("CSeq".into()).code(), -2);
        assert!(SipParseError::MissingHeader("CSeq".into()).is_not_found());
        assert_eq!(SipParseError::StartLineTooShort.code(), -100);
        assert_eq!(SipParseError::StartLineFormat("x".into()).code(), -101);
        assert_eq!(SipParseError::ResponseLineTooShort("x".into()).code(), -102);
        assert_eq!(SipParseError::ResponseLineFormat("x".into()).code(), -103);
        assert_eq!(SipParseError::InvalidStatusCode("099".into()).code(), -104);
        assert_eq!(SipParseError::RequestLineFormat("x".into()).code(), -120);
        assert_eq!(SipParseError::ParamFormat("foo".into()).code(), -150);
    }
}

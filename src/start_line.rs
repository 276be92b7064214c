// start_line.rs - Request line and status line parsing

use crate::scan::trim_sip;
use crate::{Result, SipMethod, SipParseError, SIP_VERSION};
use serde::{Deserialize, Serialize};
use std::fmt;

const RESPONSE_PREFIX: &str = "SIP/2.0 ";
const REQUEST_SUFFIX: &str = " SIP/2.0";
const MIN_LINE_LENGTH: usize = 8;
const MIN_STATUS_LENGTH: usize = 5;
const MIN_METHOD_LENGTH: usize = 3;
const MIN_REQUEST_URI_LENGTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Request,
    Response,
}

/// First line of a SIP message
///
/// Request fields are empty for responses and the status fields are zero or
/// empty for requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartLine {
    /// The trimmed line as it appeared on the wire
    pub raw: String,
    pub kind: MessageKind,
    pub protocol: String,
    pub method: String,
    pub request_uri: String,
    pub status_code: u16,
    /// Exact three character source token of the status code
    pub status_token: String,
    pub reason_phrase: String,
}

impl StartLine {
    pub fn is_request(&self) -> bool {
        self.kind == MessageKind::Request
    }

    pub fn is_response(&self) -> bool {
        self.kind == MessageKind::Response
    }

    /// Method of a request line as a `SipMethod`.
    pub fn method_kind(&self) -> Result<SipMethod> {
        self.method.parse()
    }

    /// Provisional (1xx) response
    pub fn is_provisional(&self) -> bool {
        self.is_response() && (100..200).contains(&self.status_code)
    }

    /// Final (2xx and above) response
    pub fn is_final(&self) -> bool {
        self.is_response() && self.status_code >= 200
    }
}

impl fmt::Display for StartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parses the first line of `text` as a request or status line.
pub fn parse_start_line(text: &str) -> Result<StartLine> {
    let line = trim_sip(text.split('\n').next().unwrap_or_default());
    if line.len() < MIN_LINE_LENGTH {
        return Err(SipParseError::StartLineTooShort);
    }

    if let Some(status) = line.strip_prefix(RESPONSE_PREFIX) {
        parse_status_line(line, status)
    } else if let Some(method_uri) = line.strip_suffix(REQUEST_SUFFIX) {
        parse_request_line(line, method_uri)
    } else {
        Err(SipParseError::StartLineFormat(line.to_string()))
    }
}

fn parse_status_line(line: &str, status: &str) -> Result<StartLine> {
    if status.len() < MIN_STATUS_LENGTH {
        return Err(SipParseError::ResponseLineTooShort(line.to_string()));
    }
    let (token, reason) = status
        .split_once(' ')
        .ok_or_else(|| SipParseError::ResponseLineFormat(line.to_string()))?;
    if token.len() != 3 {
        return Err(SipParseError::ResponseLineFormat(line.to_string()));
    }
    let status_code = match token.parse::<u16>() {
        Ok(code) if (100..=999).contains(&code) => code,
        _ => return Err(SipParseError::InvalidStatusCode(token.to_string())),
    };

    Ok(StartLine {
        raw: line.to_string(),
        kind: MessageKind::Response,
        protocol: SIP_VERSION.to_string(),
        method: String::new(),
        request_uri: String::new(),
        status_code,
        status_token: token.to_string(),
        reason_phrase: trim_sip(reason).to_string(),
    })
}

fn parse_request_line(line: &str, method_uri: &str) -> Result<StartLine> {
    let (method, uri) = method_uri
        .split_once(' ')
        .ok_or_else(|| SipParseError::RequestLineFormat(line.to_string()))?;
    if method.len() < MIN_METHOD_LENGTH || uri.len() < MIN_REQUEST_URI_LENGTH {
        return Err(SipParseError::RequestLineFormat(line.to_string()));
    }

    Ok(StartLine {
        raw: line.to_string(),
        kind: MessageKind::Request,
        protocol: SIP_VERSION.to_string(),
        method: trim_sip(method).to_string(),
        request_uri: trim_sip(uri).to_string(),
        status_code: 0,
        status_token: String::new(),
        reason_phrase: String::new(),
    })
}

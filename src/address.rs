// address.rs - Address classification and socket address parsing

use crate::config::{default_config, ParserConfig};
use crate::{Result, SipParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use tracing::trace;

/// Kind of host found in an address string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    None,
    Ipv4,
    Ipv6,
    Hostname,
}

/// Connection type of a SIP endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Udp,
    Tcp,
    Tls,
    Sctp,
    Ws,
    Wss,
}

impl Transport {
    /// Matches a transport keyword case-insensitively.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let transport = match keyword.to_ascii_lowercase().as_str() {
            "udp" => Transport::Udp,
            "tcp" => Transport::Tcp,
            "tls" => Transport::Tls,
            "sctp" => Transport::Sctp,
            "ws" => Transport::Ws,
            "wss" => Transport::Wss,
            _ => return None,
        };
        Some(transport)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Udp => "udp",
            Transport::Tcp => "tcp",
            Transport::Tls => "tls",
            Transport::Sctp => "sctp",
            Transport::Ws => "ws",
            Transport::Wss => "wss",
        }
    }
}

impl FromStr for Transport {
    type Err = SipParseError;

    fn from_str(s: &str) -> Result<Self> {
        Transport::from_keyword(s).ok_or_else(|| SipParseError::InvalidTransport(s.to_string()))
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed `[transport:]address[:port]` specifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketAddress {
    pub raw: String,
    pub transport: Transport,
    pub host: String,
    pub port: String,
    pub port_number: u16,
    pub address_kind: AddressKind,
}

impl SocketAddress {
    fn with_defaults(raw: &str, host: &str, address_kind: AddressKind, config: &ParserConfig) -> Self {
        Self {
            raw: raw.to_string(),
            transport: config.default_transport,
            host: host.to_string(),
            port: config.default_port_str(),
            port_number: config.default_port,
            address_kind,
        }
    }
}

impl fmt::Display for SocketAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for SocketAddress {
    type Err = SipParseError;

    fn from_str(s: &str) -> Result<Self> {
        parse_socket_address(s)
    }
}

/// Classifies an unbracketed address as IPv4, IPv6 or hostname.
///
/// Anything that is not an IP literal is a hostname; no further validation
/// of the hostname is done.
pub fn classify_address(text: &str) -> AddressKind {
    match text.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => AddressKind::Ipv4,
        Ok(IpAddr::V6(_)) => AddressKind::Ipv6,
        Err(_) => AddressKind::Hostname,
    }
}

/// Like [`classify_address`], but a leading `[` requires a well formed
/// bracketed IPv6 literal. Returns `AddressKind::None` otherwise.
pub fn classify_address_bracket_aware(text: &str) -> AddressKind {
    if text.is_empty() {
        return AddressKind::None;
    }
    match text.strip_prefix('[') {
        Some(rest) => match rest.strip_suffix(']') {
            Some(inner) if classify_address(inner) == AddressKind::Ipv6 => AddressKind::Ipv6,
            _ => AddressKind::None,
        },
        None => classify_address(text),
    }
}

/// Parses a port token. Zero and values past 65535 are rejected.
pub(crate) fn parse_port(token: &str) -> Result<u16> {
    match token.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(SipParseError::InvalidPort(token.to_string())),
    }
}

pub fn parse_socket_address(text: &str) -> Result<SocketAddress> {
    parse_socket_address_with(text, default_config())
}

/// Parses `[transport:]address[:port]` or a bare bracketed IPv6 literal.
///
/// A first token that is not a transport keyword is not an error: the whole
/// string is then read as `address[:port]`. Brackets must enclose an IPv6
/// literal; a lone `[` or `]` fails with `InvalidIpv6`.
pub fn parse_socket_address_with(text: &str, config: &ParserConfig) -> Result<SocketAddress> {
    if text.is_empty() {
        return Err(SipParseError::InvalidSocketAddress(text.to_string()));
    }

    if text.len() >= 2 && text.starts_with('[') && text.ends_with(']') {
        if classify_address_bracket_aware(text) != AddressKind::Ipv6 {
            return Err(SipParseError::InvalidIpv6(text.to_string()));
        }
        return Ok(SocketAddress::with_defaults(text, text, AddressKind::Ipv6, config));
    }

    let Some((first, rest)) = text.split_once(':') else {
        if text.contains(['[', ']']) {
            return Err(SipParseError::InvalidIpv6(text.to_string()));
        }
        return Ok(SocketAddress::with_defaults(
            text,
            text,
            classify_address(text),
            config,
        ));
    };

    let (transport, addr_port, prefixed) = match Transport::from_keyword(first) {
        Some(transport) => (transport, rest, true),
        None => {
            trace!("No transport prefix in {}, reading as address:port", text);
            (config.default_transport, text, false)
        }
    };

    let (host, port, port_number, address_kind) = if addr_port.starts_with('[') {
        let (inner, after) = addr_port
            .split_once(']')
            .ok_or_else(|| SipParseError::InvalidIpv6(addr_port.to_string()))?;
        let host = format!("{}]", inner);
        let (port, port_number) = match after.strip_prefix(':') {
            Some(port) => (port.to_string(), parse_port(port)?),
            // a bare literal without transport was handled above
            None if after.is_empty() && prefixed => {
                (config.default_port_str(), config.default_port)
            }
            None => return Err(SipParseError::InvalidSocketAddress(text.to_string())),
        };
        if classify_address_bracket_aware(&host) != AddressKind::Ipv6 {
            return Err(SipParseError::InvalidIpv6(host));
        }
        (host, port, port_number, AddressKind::Ipv6)
    } else {
        let (host, port, port_number) = match addr_port.split_once(':') {
            Some((host, port)) => (host, port.to_string(), parse_port(port)?),
            None => (addr_port, config.default_port_str(), config.default_port),
        };
        if host.is_empty() {
            return Err(SipParseError::InvalidSocketAddress(text.to_string()));
        }
        if host.contains(['[', ']']) {
            return Err(SipParseError::InvalidIpv6(host.to_string()));
        }
        (host.to_string(), port, port_number, classify_address(host))
    };

    Ok(SocketAddress {
        raw: text.to_string(),
        transport,
        host,
        port,
        port_number,
        address_kind,
    })
}

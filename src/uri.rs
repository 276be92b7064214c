// uri.rs - SIP/SIPS/TEL URI parsing and conversion to socket addresses

use crate::address::{
    classify_address, classify_address_bracket_aware, parse_port, AddressKind, SocketAddress,
    Transport,
};
use crate::config::{default_config, ParserConfig};
use crate::scan::{next_delimiter, Delimiter, Delimiters};
use crate::{Result, SipParseError, MAX_URI_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Sip,
    Sips,
    Tel,
}

impl Scheme {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "sip" => Some(Scheme::Sip),
            "sips" => Some(Scheme::Sips),
            "tel" => Some(Scheme::Tel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Sip => "sip",
            Scheme::Sips => "sips",
            Scheme::Tel => "tel",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `socket_address_to_uri` writes the `;transport=` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    /// Leave out `;transport=udp`; other transports are still written
    OmitUdp,
    #[default]
    Always,
}

/// Parsed `scheme:[user[;user-params]@]host[:port][;params]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uri {
    pub raw: String,
    pub scheme: Scheme,
    /// User part. When user parameters follow, the `;` separator stays at
    /// the end of the user name (`alice;` for `alice;x=1@host`).
    pub user: Option<String>,
    pub user_params: Option<String>,
    /// Host; IPv6 literals keep their brackets
    pub host: String,
    pub port: String,
    pub port_number: u16,
    pub address_kind: AddressKind,
    /// URI parameters, without the leading `;`
    pub params: Option<String>,
    pub transport: Transport,
}

impl Uri {
    fn bare(
        raw: &str,
        scheme: Scheme,
        host: &str,
        address_kind: AddressKind,
        config: &ParserConfig,
    ) -> Self {
        Self {
            raw: raw.to_string(),
            scheme,
            user: None,
            user_params: None,
            host: host.to_string(),
            port: config.default_port_str(),
            port_number: config.default_port,
            address_kind,
            params: None,
            transport: config.default_transport,
        }
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Uri {
    type Err = SipParseError;

    fn from_str(s: &str) -> Result<Self> {
        parse_uri(s)
    }
}

pub fn parse_uri(text: &str) -> Result<Uri> {
    parse_uri_with(text, default_config())
}

/// Parses a SIP, SIPS or TEL URI.
///
/// Missing port and transport are filled from `config`. Parameters are kept
/// verbatim; only `transport=` is interpreted, and an unknown transport
/// fails the whole parse.
pub fn parse_uri_with(text: &str, config: &ParserConfig) -> Result<Uri> {
    if text.len() > MAX_URI_LENGTH {
        return Err(SipParseError::UriTooLong(text.len(), MAX_URI_LENGTH));
    }

    let (scheme_token, rest) = text
        .split_once(':')
        .ok_or_else(|| SipParseError::InvalidUri(text.to_string()))?;
    let scheme = Scheme::from_keyword(scheme_token)
        .ok_or_else(|| SipParseError::InvalidScheme(scheme_token.to_string()))?;

    let delimiters = Delimiters::scan(rest);
    if delimiters.at == Some(0) {
        return Err(SipParseError::InvalidUri(format!("empty user part: {}", text)));
    }
    if delimiters.is_empty() {
        return bare_host(text, scheme, rest, config);
    }

    let (user, user_params, host_part) = match delimiters.at {
        Some(at) => {
            let user_part = &rest[..at];
            let (user, user_params) = match user_part.find(';') {
                Some(0) => {
                    return Err(SipParseError::InvalidUri(format!("empty user part: {}", text)))
                }
                Some(pos) => (&user_part[..=pos], Some(user_part[pos + 1..].to_string())),
                None => (user_part, None),
            };
            (Some(user.to_string()), user_params, &rest[at + 1..])
        }
        None => (None, None, rest),
    };

    if Delimiters::scan(host_part).is_bare_host() {
        let mut uri = bare_host(text, scheme, host_part, config)?;
        uri.user = user;
        uri.user_params = user_params;
        return Ok(uri);
    }

    let (host, address_kind, port_params) = if host_part.starts_with('[') {
        if host_part.ends_with(']') {
            if classify_address_bracket_aware(host_part) != AddressKind::Ipv6 {
                return Err(SipParseError::InvalidIpv6(host_part.to_string()));
            }
            let mut uri = Uri::bare(text, scheme, host_part, AddressKind::Ipv6, config);
            uri.user = user;
            uri.user_params = user_params;
            return Ok(uri);
        }
        let (inner, after) = host_part
            .split_once(']')
            .ok_or_else(|| SipParseError::InvalidIpv6(host_part.to_string()))?;
        let host = format!("{}]", inner);
        if classify_address_bracket_aware(&host) != AddressKind::Ipv6 {
            return Err(SipParseError::InvalidIpv6(host));
        }
        (host, AddressKind::Ipv6, after)
    } else {
        let Some((pos, _)) = next_delimiter(host_part, &[Delimiter::Colon, Delimiter::Semicolon])
        else {
            return Err(SipParseError::InvalidUri(text.to_string()));
        };
        let host = &host_part[..pos];
        if host.is_empty() {
            return Err(SipParseError::InvalidUri(format!("empty host: {}", text)));
        }
        (host.to_string(), classify_address(host), &host_part[pos..])
    };

    let mut uri = Uri {
        raw: text.to_string(),
        scheme,
        user,
        user_params,
        host,
        port: config.default_port_str(),
        port_number: config.default_port,
        address_kind,
        params: None,
        transport: config.default_transport,
    };

    let params = if let Some(port_rest) = port_params.strip_prefix(':') {
        let (port, params) = match port_rest.find(';') {
            Some(pos) => (&port_rest[..pos], Some(&port_rest[pos..])),
            None => (port_rest, None),
        };
        uri.port_number = parse_port(port)?;
        uri.port = port.to_string();
        match params {
            Some(params) => params,
            None => return Ok(uri),
        }
    } else if port_params.starts_with(';') {
        port_params
    } else {
        return Err(SipParseError::InvalidUri(text.to_string()));
    };

    // params starts with ';'
    uri.params = Some(params[1..].to_string());
    if let Some(pos) = params.find(";transport=") {
        let value = &params[pos + ";transport=".len()..];
        let keyword = value.split(';').next().unwrap_or_default();
        uri.transport = keyword.parse()?;
    }

    Ok(uri)
}

fn bare_host(text: &str, scheme: Scheme, host: &str, config: &ParserConfig) -> Result<Uri> {
    if host.is_empty() {
        return Err(SipParseError::InvalidUri(format!("empty host: {}", text)));
    }
    Ok(Uri::bare(text, scheme, host, classify_address(host), config))
}

pub fn uri_to_socket_address(uri: &Uri) -> SocketAddress {
    uri_to_socket_address_with(uri, default_config())
}

/// Target address of a URI, rendered as `transport:host:port`.
pub fn uri_to_socket_address_with(uri: &Uri, config: &ParserConfig) -> SocketAddress {
    let host = if uri.host.is_empty() {
        config.default_host.clone()
    } else {
        uri.host.clone()
    };
    let (port, port_number) = if uri.port.is_empty() {
        (config.default_port_str(), config.default_port)
    } else {
        (uri.port.clone(), uri.port_number)
    };

    SocketAddress {
        raw: format!("{}:{}:{}", uri.transport, host, port),
        transport: uri.transport,
        address_kind: classify_address_bracket_aware(&host),
        host,
        port,
        port_number,
    }
}

/// Builds a `sip:` URI pointing at `address`, with an optional user part.
pub fn socket_address_to_uri(address: &SocketAddress, user: Option<&str>, mode: TransportMode) -> Uri {
    let config = default_config();
    let user = user.filter(|u| !u.is_empty());
    let host = if address.host.is_empty() {
        config.default_host.clone()
    } else {
        address.host.clone()
    };
    let (port, port_number) = if address.port.is_empty() {
        (config.default_port_str(), config.default_port)
    } else {
        (address.port.clone(), address.port_number)
    };

    let user_part = user.map(|u| format!("{}@", u)).unwrap_or_default();
    let mut raw = format!("{}:{}{}:{}", Scheme::Sip, user_part, host, port);
    let params = if mode == TransportMode::OmitUdp && address.transport == Transport::Udp {
        None
    } else {
        let param = format!("transport={}", address.transport);
        raw.push(';');
        raw.push_str(&param);
        Some(param)
    };

    Uri {
        raw,
        scheme: Scheme::Sip,
        user: user.map(str::to_string),
        user_params: None,
        address_kind: classify_address_bracket_aware(&host),
        host,
        port,
        port_number,
        params,
        transport: address.transport,
    }
}

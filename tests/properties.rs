use proptest::prelude::*;
use sip_wire::{
    parse_socket_address, parse_start_line, parse_uri, socket_address_to_uri,
    uri_to_socket_address, AddressKind, MessageKind, Transport, TransportMode,
};

fn transport_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["udp", "tcp", "tls", "sctp", "ws", "wss"])
}

proptest! {
    /// Addresses without transport prefix and port get the defaults.
    #[test]
    fn socket_address_defaults(
        host_type in 0u8..3,
        label in "[a-z][a-z0-9\\-]{0,10}",
        octet in 1u8..255,
    ) {
        let host = match host_type {
            0 => format!("{}.example.com", label),
            1 => format!("10.0.0.{}", octet),
            _ => format!("[2001:db8::{:x}]", octet),
        };

        let addr = parse_socket_address(&host).unwrap();
        prop_assert_eq!(addr.transport, Transport::Udp);
        prop_assert_eq!(addr.port.as_str(), "5060");
        prop_assert_eq!(addr.port_number, 5060);
        prop_assert_eq!(addr.host.as_str(), host.as_str());
    }

    /// Explicit transport and port survive the URI -> address -> URI trip.
    #[test]
    fn uri_socket_address_round_trip(
        user in proptest::option::of("[a-z0-9]{1,8}"),
        host in "[a-z][a-z0-9]{0,10}\\.(com|net|org)",
        port in 1u16..65535,
        transport in transport_strategy(),
    ) {
        let user_part = user.as_ref().map(|u| format!("{}@", u)).unwrap_or_default();
        let text = format!("sip:{}{}:{};transport={}", user_part, host, port, transport);

        let uri = parse_uri(&text).unwrap();
        let addr = uri_to_socket_address(&uri);
        let rebuilt = socket_address_to_uri(&addr, None, TransportMode::Always);
        let reparsed = parse_uri(&rebuilt.raw).unwrap();

        prop_assert_eq!(&reparsed.host, &uri.host);
        prop_assert_eq!(reparsed.port_number, port);
        prop_assert_eq!(reparsed.transport, uri.transport);
        prop_assert_eq!(reparsed.transport.as_str(), transport);
        prop_assert_eq!(addr.address_kind, AddressKind::Hostname);
    }

    /// Every three digit code in range parses and keeps its source token.
    #[test]
    fn status_codes_in_range(code in 100u16..=999, reason in "[A-Za-z]{1,12}") {
        let line = parse_start_line(&format!("SIP/2.0 {} {}\r\n", code, reason)).unwrap();
        prop_assert_eq!(line.kind, MessageKind::Response);
        prop_assert_eq!(line.status_code, code);
        prop_assert_eq!(line.status_token, code.to_string());
        prop_assert_eq!(line.reason_phrase, reason);
    }

    /// Parsers never panic on arbitrary input.
    #[test]
    fn parsers_do_not_panic(input in "\\PC{0,64}") {
        let _ = parse_socket_address(&input);
        let _ = parse_uri(&input);
        let _ = parse_start_line(&input);
        let _ = sip_wire::parse_headers(&input, sip_wire::HeaderSource::HeadersOnly);
        let _ = sip_wire::extract_parameter(&input, "transport", true);
        let _ = sip_wire::parse_digest_auth_params(&input);
        let _ = sip_wire::parse_message(&input);
    }
}

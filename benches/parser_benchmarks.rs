// benches/parser_benchmarks.rs - Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sip_wire::*;

fn create_simple_request() -> Vec<u8> {
    b"OPTIONS sip:server.com SIP/2.0\r\n\
      Via: SIP/2.0/UDP client.com;branch=z9hG4bK776asdhds\r\n\
      From: <sip:client@client.com>;tag=1928301774\r\n\
      To: <sip:server@server.com>\r\n\
      Call-ID: a84b4c76e66710@client.com\r\n\
      CSeq: 63104 OPTIONS\r\n\
      Max-Forwards: 70\r\n\
      Content-Length: 0\r\n\
      \r\n".to_vec()
}

fn create_complex_request() -> Vec<u8> {
    b"INVITE sip:bob@biloxi.com:5060;transport=tcp SIP/2.0\r\n\
      Via: SIP/2.0/TCP pc33.atlanta.com;branch=z9hG4bK776asdhds\r\n\
      Via: SIP/2.0/TCP bigbox3.site3.atlanta.com\r\n\
      Max-Forwards: 70\r\n\
      From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
      To: Bob <sip:bob@biloxi.com>\r\n\
      Call-ID: a84b4c76e66710@pc33.atlanta.com\r\n\
      CSeq: 314159 INVITE\r\n\
      Contact: <sip:alice@pc33.atlanta.com>\r\n\
      Authorization: Digest username=\"alice\", realm=\"atlanta.com\",\r\n \
        nonce=\"84a4cc6f3082121f32b42a2187831a9e\",\r\n \
        response=\"7587245234b3434cc3412213e5f113a5432\"\r\n\
      Content-Type: application/sdp\r\n\
      Content-Length: 142\r\n\
      \r\n\
      v=0\r\n\
      o=alice 2890844526 2890844526 IN IP4 pc33.atlanta.com\r\n\
      s=Session Description\r\n\
      c=IN IP4 pc33.atlanta.com\r\n\
      t=0 0\r\n\
      m=audio 49170 RTP/AVP 0\r\n\
      a=rtpmap:0 PCMU/8000\r\n".to_vec()
}

fn create_response() -> Vec<u8> {
    b"SIP/2.0 200 OK\r\n\
      Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds;received=192.0.2.1\r\n\
      From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
      To: Bob <sip:bob@biloxi.com>;tag=a6c85cf\r\n\
      Call-ID: a84b4c76e66710@pc33.atlanta.com\r\n\
      CSeq: 314159 INVITE\r\n\
      Contact: <sip:bob@192.0.2.4>\r\n\
      Content-Type: application/sdp\r\n\
      Content-Length: 131\r\n\
      \r\n\
      v=0\r\n\
      o=bob 2890844527 2890844527 IN IP4 biloxi.com\r\n\
      s=Session Description\r\n\
      c=IN IP4 biloxi.com\r\n\
      t=0 0\r\n\
      m=audio 3456 RTP/AVP 0\r\n\
      a=rtpmap:0 PCMU/8000\r\n".to_vec()
}

fn benchmark_parse_messages(c: &mut Criterion) {
    let cases = [
        ("simple_request", create_simple_request()),
        ("complex_request", create_complex_request()),
        ("response", create_response()),
    ];

    for (name, message) in &cases {
        let mut group = c.benchmark_group(format!("parse_{}", name));
        group.throughput(Throughput::Bytes(message.len() as u64));

        group.bench_function("parse", |b| {
            b.iter(|| {
                let result = parse_message_bytes(black_box(message));
                assert!(result.is_ok());
            })
        });

        group.finish();
    }
}

fn benchmark_serialize(c: &mut Criterion) {
    let message = parse_message_bytes(&create_complex_request()).unwrap();

    c.bench_function("serialize_message", |b| {
        b.iter(|| {
            let bytes = serialize_message_bytes(black_box(&message)).unwrap();
            assert!(!bytes.is_empty());
        })
    });
}

fn benchmark_uri_parsing(c: &mut Criterion) {
    let uris = vec![
        "sip:alice@atlanta.com",
        "sips:bob@biloxi.com:5061",
        "sip:carol@chicago.com:5060;transport=tcp",
        "sip:dave@denver.com;user=phone",
        "sip:+13125551212@gateway.com;user=phone",
        "sip:erin@[2001:db8::10]:5062;transport=tls",
    ];

    c.bench_function("uri_parsing", |b| {
        b.iter(|| {
            for uri in &uris {
                parse_uri(black_box(uri)).unwrap();
            }
        })
    });
}

fn benchmark_socket_addresses(c: &mut Criterion) {
    let addresses = vec![
        "10.0.0.1",
        "tcp:10.0.0.1:5070",
        "tls:proxy.example.com:5061",
        "[2001:db8::1]",
        "wss:[2001:db8::1]:443",
    ];

    c.bench_function("socket_address_parsing", |b| {
        b.iter(|| {
            for addr in &addresses {
                parse_socket_address(black_box(addr)).unwrap();
            }
        })
    });
}

fn benchmark_header_operations(c: &mut Criterion) {
    let mut message = parse_message_bytes(&create_complex_request()).unwrap();

    let mut group = c.benchmark_group("header_operations");

    group.bench_function("get_header", |b| {
        b.iter(|| {
            let _ = black_box(&message).get_header("From");
            let _ = black_box(&message).get_header("To");
            let _ = black_box(&message).get_header("Call-ID");
        })
    });

    group.bench_function("set_header", |b| {
        b.iter(|| {
            black_box(&mut message).set_header("X-Custom", "value");
        })
    });

    group.bench_function("update_sequence_number", |b| {
        b.iter(|| {
            black_box(&mut message).update_sequence_number(1).unwrap();
        })
    });

    group.bench_function("extract_parameter", |b| {
        let params = ";branch=z9hG4bK776asdhds;received=192.0.2.1;rport";
        b.iter(|| {
            let _ = extract_parameter(black_box(params), "received", false);
        })
    });

    group.bench_function("digest_auth_params", |b| {
        let body = "Digest realm=\"atlanta.com\", nonce=\"84a4cc6f3082121f32b42a2187831a9e\", algorithm=MD5";
        b.iter(|| {
            let _ = parse_digest_auth_params(black_box(body));
        })
    });

    group.finish();
}

fn benchmark_parallel_parsing(c: &mut Criterion) {
    use std::sync::Arc;
    use std::thread;

    let requests: Vec<Arc<Vec<u8>>> = vec![
        Arc::new(create_simple_request()),
        Arc::new(create_complex_request()),
        Arc::new(create_response()),
    ];

    c.bench_function("parallel_parsing_4_threads", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let request = requests[i % requests.len()].clone();
                    thread::spawn(move || {
                        for _ in 0..100 {
                            let _ = parse_message_bytes(black_box(&request));
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        })
    });
}

criterion_group!(
    benches,
    benchmark_parse_messages,
    benchmark_serialize,
    benchmark_uri_parsing,
    benchmark_socket_addresses,
    benchmark_header_operations,
    benchmark_parallel_parsing
);
criterion_main!(benches);

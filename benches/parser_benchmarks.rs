// benches/parser_benchmarks.rs - Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sip_message_parser::*;

const SDP: &str = "v=0\r\n\
    o=alice 2890844526 2890844526 IN IP4 pc33.atlanta.com\r\n\
    s=Session Description\r\n\
    c=IN IP4 pc33.atlanta.com\r\n\
    t=0 0\r\n\
    m=audio 49170 RTP/AVP 0\r\n\
    a=rtpmap:0 PCMU/8000\r\n";

fn create_simple_request() -> Vec<u8> {
    b"OPTIONS sip:server.com SIP/2.0\r\n\
      Via: SIP/2.0/UDP client.com;branch=z9hG4bK776asdhds\r\n\
      From: <sip:client@client.com>;tag=1928301774\r\n\
      To: <sip:server@server.com>\r\n\
      Call-ID: a84b4c76e66710@client.com\r\n\
      CSeq: 63104 OPTIONS\r\n\
      Max-Forwards: 70\r\n\
      Content-Length: 0\r\n\
      \r\n"
        .to_vec()
}

fn create_complex_request() -> Vec<u8> {
    format!(
        "INVITE sip:bob@biloxi.com;user=phone SIP/2.0\r\n\
         Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds\r\n\
         Via: SIP/2.0/UDP bigbox3.site3.atlanta.com;branch=z9hG4bK77ef4c2312983.1\r\n\
         Max-Forwards: 70\r\n\
         From: \"Alice\" <sip:alice@atlanta.com>;tag=1928301774\r\n\
         To: Bob <sip:bob@biloxi.com>\r\n\
         Call-ID: a84b4c76e66710@pc33.atlanta.com\r\n\
         CSeq: 314159 INVITE\r\n\
         Contact: <sip:alice@pc33.atlanta.com>\r\n\
         Record-Route: <sip:p1.example.com;lr>, <sip:p2.example.com;lr>\r\n\
         Remote-Party-ID: \"Alice\" <sip:5551000@atlanta.com>;party=calling;screen=yes;privacy=off\r\n\
         P-Asserted-Identity: <sip:5551000@atlanta.com>\r\n\
         Authorization: Digest username=\"alice\", realm=\"atlanta.com\",\r\n \
         nonce=\"84a4cc6f3082121f32b42a2187831a9e\",\r\n \
         response=\"7587245234b3434cc3412213e5f113a5432\"\r\n\
         Allow: INVITE, ACK, CANCEL, OPTIONS, BYE\r\n\
         Supported: 100rel, timer\r\n\
         Content-Type: application/sdp\r\n\
         Content-Length: {}\r\n\
         \r\n\
         {}",
        SDP.len(),
        SDP
    )
    .into_bytes()
}

fn create_response() -> Vec<u8> {
    format!(
        "SIP/2.0 200 OK\r\n\
         Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds;received=192.0.2.1\r\n\
         From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
         To: Bob <sip:bob@biloxi.com>;tag=a6c85cf\r\n\
         Call-ID: a84b4c76e66710@pc33.atlanta.com\r\n\
         CSeq: 314159 INVITE\r\n\
         Contact: <sip:bob@192.0.2.4>\r\n\
         Content-Type: application/sdp\r\n\
         Content-Length: {}\r\n\
         \r\n\
         {}",
        SDP.len(),
        SDP
    )
    .into_bytes()
}

fn benchmark_parse_simple_request(c: &mut Criterion) {
    let request = create_simple_request();
    let mut group = c.benchmark_group("parse_simple_request");
    group.throughput(Throughput::Bytes(request.len() as u64));

    group.bench_function("parse", |b| {
        b.iter(|| {
            let result = parse_message(black_box(&request));
            assert!(result.is_ok());
        })
    });

    group.finish();
}

fn benchmark_parse_complex_request(c: &mut Criterion) {
    let request = create_complex_request();
    let mut group = c.benchmark_group("parse_complex_request");
    group.throughput(Throughput::Bytes(request.len() as u64));

    group.bench_function("parse", |b| {
        b.iter(|| {
            let result = parse_message(black_box(&request));
            assert!(result.is_ok());
        })
    });

    group.bench_function("parse_legacy_folding", |b| {
        let config = ParserConfig::legacy();
        b.iter(|| {
            let result = Message::parse_bytes_with(black_box(&request), &config);
            assert!(result.is_ok());
        })
    });

    group.finish();
}

fn benchmark_parse_response(c: &mut Criterion) {
    let response = create_response();
    let mut group = c.benchmark_group("parse_response");
    group.throughput(Throughput::Bytes(response.len() as u64));

    group.bench_function("parse", |b| {
        b.iter(|| {
            let result = parse_message(black_box(&response));
            assert!(result.is_ok());
        })
    });

    group.finish();
}

fn benchmark_codec_decode(c: &mut Criterion) {
    use bytes::BytesMut;
    use tokio_util::codec::Decoder;

    let request = create_complex_request();
    let mut codec = codec::SipCodec::new();

    c.bench_function("codec_decode", |b| {
        b.iter(|| {
            let mut buf = BytesMut::from(&request[..]);
            let result = codec.decode(&mut buf);
            assert!(result.unwrap().is_some());
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
        "sip:alice@[2001:db8::1]:5060;transport=tcp",
        "tel:+15551234567;phone-context=example.com",
    ];

    c.bench_function("uri_parsing", |b| {
        b.iter(|| {
            for uri in &uris {
                Uri::parse(black_box(uri)).unwrap();
            }
        })
    });
}

fn benchmark_header_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_values");

    group.bench_function("via", |b| {
        let via = "SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds;received=192.0.2.1;rport";
        b.iter(|| Via::parse(black_box(via)).unwrap())
    });

    group.bench_function("name_addr", |b| {
        let from = "\"Unknown\" <sip:5554441000@0.0.0.0;user=phone;noa=national>;tag=dd737a8-co7387-INS002";
        b.iter(|| NameAddr::parse(black_box(from)).unwrap())
    });

    group.bench_function("authorization", |b| {
        let auth = "Digest username=\"Alice\", realm=\"atlanta.com\", nonce=\"84a4cc6f3082121f32b42a2187831a9e\", response=\"7587245234b3434cc3412213e5f113a5432\"";
        b.iter(|| Authorization::parse(black_box(auth)).unwrap())
    });

    group.bench_function("header_lookup", |b| {
        b.iter(|| {
            let _ = HeaderName::lookup(black_box("Content-Length"));
            let _ = HeaderName::lookup(black_box("v"));
            let _ = HeaderName::lookup(black_box("X-Custom"));
        })
    });

    group.finish();
}

fn benchmark_calling_party(c: &mut Criterion) {
    let request = create_complex_request();

    c.bench_function("calling_party_rpid", |b| {
        b.iter(|| {
            // Fresh message each time so the lazy parse is measured
            let message = parse_message(&request).unwrap();
            let party = message.calling_party(black_box(CallingPartyPolicy::Rpid));
            assert!(party.is_ok());
        })
    });
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
                            let _ = parse_message(black_box(&request));
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
    benchmark_parse_simple_request,
    benchmark_parse_complex_request,
    benchmark_parse_response,
    benchmark_codec_decode,
    benchmark_uri_parsing,
    benchmark_header_values,
    benchmark_calling_party,
    benchmark_parallel_parsing
);
criterion_main!(benches);

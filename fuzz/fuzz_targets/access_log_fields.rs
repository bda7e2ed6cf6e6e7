#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use haproxy2pb_core::pipeline::LineScanner;
use haproxy2pb_log_parser::{HaproxyLogParser, ProtobufEncoder, codec};

/// 퍼저용 구조적 입력 -- 필드 단위로 라인을 조립
#[derive(Arbitrary, Debug)]
struct FuzzLine {
    host: String,
    pid: u32,
    client: String,
    port: u16,
    timestamp: String,
    timings: String,
    status: String,
    bytes: String,
    termination: String,
    connections: String,
    queues: String,
    request_headers: Option<String>,
    response_headers: Option<String>,
    uri: String,
}

impl FuzzLine {
    fn render(&self) -> String {
        let mut line = format!(
            "Oct 28 14:30:05 {} haproxy[{}]: {}:{} [{}] fe be/srv {} {} {} - - {} {} {} ",
            self.host,
            self.pid,
            self.client,
            self.port,
            self.timestamp,
            self.timings,
            self.status,
            self.bytes,
            self.termination,
            self.connections,
            self.queues,
        );
        if let Some(h) = &self.request_headers {
            line.push_str(&format!("{{{}}} ", h));
        }
        if let Some(h) = &self.response_headers {
            line.push_str(&format!("{{{}}} ", h));
        }
        line.push_str(&format!("\"GET {} HTTP/1.1\"", self.uri));
        line
    }
}

fuzz_target!(|input: FuzzLine| {
    let line = input.render();
    let parser = HaproxyLogParser::new();

    // 일치한 레코드는 인코딩 후 그대로 복원되어야 한다
    if let Ok(record) = parser.parse(&line) {
        let encoder = ProtobufEncoder::new();
        let mut buf = Vec::new();
        if encoder.encode_raw(&record, &mut buf).is_ok() {
            let mut decoded = codec::decode(&buf).expect("encoded record must decode");
            // IPv4-mapped IPv6 주소는 IPv4로 복원된다
            assert_eq!(decoded.client_ip, record.client_ip.map(|ip| ip.to_canonical()));
            decoded.client_ip = record.client_ip;
            assert_eq!(decoded, record);
        }
    }
});

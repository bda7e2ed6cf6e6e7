//! 레코드 조립기 — 문법 적용 후 필드 디코더를 순서대로 호출
//!
//! # 사용 예시
//! ```ignore
//! use haproxy2pb_core::pipeline::LineScanner;
//! use haproxy2pb_log_parser::HaproxyLogParser;
//!
//! let parser = HaproxyLogParser::new();
//! let record = parser.parse(line)?;
//! assert_eq!(record.status_code, Some(302));
//! ```

use haproxy2pb_core::error::ScanError;
use haproxy2pb_core::pipeline::LineScanner;
use haproxy2pb_core::types::AccessLogRecord;
use tracing::{debug, trace};

use crate::decode;
use crate::grammar::{self, Groups};
use crate::termination;

/// HAProxy HTTP 액세스 로그 스캐너
///
/// 상태가 없으므로 여러 스레드에서 공유해도 안전합니다.
/// 문법 불일치는 [`ScanError::NoMatch`]로, 필드 단위 실패는 `None`으로 처리합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaproxyLogParser;

impl HaproxyLogParser {
    /// 새 스캐너를 생성합니다.
    pub fn new() -> Self {
        Self
    }

    /// 일치한 그룹을 그룹 순서대로 디코딩해 새 레코드를 만듭니다.
    fn assemble(g: &Groups<'_>) -> AccessLogRecord {
        let timings = decode::timings(g.get(11));
        let term = termination::termination(g.get(16));
        let conns = decode::connections(g.get(17));
        let queues = decode::queues(g.get(18));

        AccessLogRecord {
            host: decode::text(g.get(2)),
            process: decode::text(g.get(3)),
            pid: decode::int32(g.get(4)),
            client_ip: decode::ip(g.get(5)),
            client_port: decode::uint32(g.get(6)),
            event_time: decode::event_time(g.get(7)),
            frontend: decode::text(g.get(8)),
            backend: decode::text(g.get(9)),
            server: decode::text(g.get(10)),
            time_queue: timings.queue,
            time_wait: timings.wait,
            time_connect: timings.connect,
            time_respond: timings.respond,
            time_total: timings.total,
            status_code: decode::int32(g.get(12)),
            bytes_read: decode::int32(g.get(13)),
            request_cookie: decode::text(g.get(14)),
            response_cookie: decode::text(g.get(15)),
            termination_reason: term.reason,
            termination_state: term.state,
            termination_cookie: term.cookie,
            termination_cookie_transform: term.cookie_transform,
            active_connections: conns.active,
            frontend_connections: conns.frontend,
            backend_connections: conns.backend,
            server_connections: conns.server,
            retries: conns.retries,
            server_queue: queues.server,
            backend_queue: queues.backend,
            request_headers: decode::headers(g.get(19)),
            response_headers: decode::headers(g.get(20)),
            http_method: decode::text(g.get(21)),
            http_uri: decode::text(g.get(22)),
            http_version: decode::text(g.get(23)),
        }
    }
}

impl LineScanner for HaproxyLogParser {
    fn format_name(&self) -> &str {
        "haproxy-http"
    }

    fn scan(&self, line: &str, record: &mut AccessLogRecord) -> Result<(), ScanError> {
        let line = line.trim_end_matches(['\r', '\n']);

        let Some(groups) = grammar::capture(line) else {
            debug!(len = line.len(), "line does not match access log grammar");
            return Err(ScanError::NoMatch {
                line: line.to_owned(),
            });
        };

        *record = Self::assemble(&groups);
        trace!(
            host = record.host.as_deref().unwrap_or("-"),
            status = record.status_code,
            "scanned access log line"
        );
        Ok(())
    }
}

/// 기본 스캐너로 라인을 스캔합니다.
///
/// 실패 시 `record`는 변경되지 않습니다.
pub fn scan(line: &str, record: &mut AccessLogRecord) -> Result<(), ScanError> {
    HaproxyLogParser.scan(line, record)
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use haproxy2pb_core::types::{CookieState, CookieTransform, ProxyState, TerminationReason};

    use super::*;

    const SAMPLE: &str = r#"Oct 28 14:30:05 ams-mid006.int.s-cloud.net haproxy[10227]: 10.20.3.41:45572 [28/Oct/2011:14:30:05.615] soundcloud soundcloud/ams-app053-8003 0/0/0/18/18 302 677 - - ---- 157/126/126/0/0 0/0 "GET /stream/x HTTP/1.0""#;

    fn sample_with(from: &str, to: &str) -> String {
        assert!(SAMPLE.contains(from), "fixture does not contain {from:?}");
        SAMPLE.replacen(from, to, 1)
    }

    #[test]
    fn format_name() {
        assert_eq!(HaproxyLogParser::new().format_name(), "haproxy-http");
    }

    #[test]
    fn sample_line_populates_every_field() {
        let record = HaproxyLogParser::new().parse(SAMPLE).unwrap();

        assert_eq!(record.host.as_deref(), Some("ams-mid006.int.s-cloud.net"));
        assert_eq!(record.process.as_deref(), Some("haproxy"));
        assert_eq!(record.pid, Some(10227));
        assert_eq!(
            record.client_ip,
            Some(IpAddr::V4(Ipv4Addr::new(10, 20, 3, 41)))
        );
        assert_eq!(record.client_port, Some(45572));

        let t = record.event_time.expect("timestamp decoded");
        assert_eq!((t.year, t.month, t.day), (2011, 10, 28));
        assert_eq!((t.hour, t.minute, t.second), (14, 30, 5));
        assert_eq!(t.nanosecond, 615_000_000);

        assert_eq!(record.frontend.as_deref(), Some("soundcloud"));
        assert_eq!(record.backend.as_deref(), Some("soundcloud"));
        assert_eq!(record.server.as_deref(), Some("ams-app053-8003"));

        assert_eq!(record.time_queue, Some(0));
        assert_eq!(record.time_wait, Some(0));
        assert_eq!(record.time_connect, Some(0));
        assert_eq!(record.time_respond, Some(18));
        assert_eq!(record.time_total, Some(18));

        assert_eq!(record.status_code, Some(302));
        assert_eq!(record.bytes_read, Some(677));
        assert_eq!(record.request_cookie, None);
        assert_eq!(record.response_cookie, None);

        assert_eq!(record.termination_reason, None);
        assert_eq!(record.termination_state, None);
        assert_eq!(record.termination_cookie, None);
        assert_eq!(record.termination_cookie_transform, None);

        assert_eq!(record.active_connections, Some(157));
        assert_eq!(record.frontend_connections, Some(126));
        assert_eq!(record.backend_connections, Some(126));
        assert_eq!(record.server_connections, Some(0));
        assert_eq!(record.retries, Some(0));
        assert_eq!(record.server_queue, Some(0));
        assert_eq!(record.backend_queue, Some(0));

        assert_eq!(record.request_headers, vec![""]);
        assert_eq!(record.response_headers, vec![""]);

        assert_eq!(record.http_method.as_deref(), Some("GET"));
        assert_eq!(record.http_uri.as_deref(), Some("/stream/x"));
        assert_eq!(record.http_version.as_deref(), Some("HTTP/1.0"));
    }

    #[test]
    fn termination_code_is_decoded() {
        let line = sample_with(" ---- ", " cRVD ");
        let record = HaproxyLogParser::new().parse(&line).unwrap();
        assert_eq!(
            record.termination_reason,
            Some(TerminationReason::ClientTimeout)
        );
        assert_eq!(record.termination_state, Some(ProxyState::Request));
        assert_eq!(record.termination_cookie, Some(CookieState::Valid));
        assert_eq!(
            record.termination_cookie_transform,
            Some(CookieTransform::Deleted)
        );
    }

    #[test]
    fn header_groups_are_split() {
        let line = sample_with("0/0 \"GET", "0/0 {med|www.example.com} {7} \"GET");
        let record = HaproxyLogParser::new().parse(&line).unwrap();
        assert_eq!(record.request_headers, vec!["med", "www.example.com"]);
        assert_eq!(record.response_headers, vec!["7"]);
    }

    #[test]
    fn cookies_are_kept_when_present() {
        let line = sample_with("677 - - ----", "677 SRV=app1 SRV=app2 --VN");
        let record = HaproxyLogParser::new().parse(&line).unwrap();
        assert_eq!(record.request_cookie.as_deref(), Some("SRV=app1"));
        assert_eq!(record.response_cookie.as_deref(), Some("SRV=app2"));
        assert_eq!(record.termination_cookie, Some(CookieState::Valid));
        assert_eq!(
            record.termination_cookie_transform,
            Some(CookieTransform::None)
        );
    }

    #[test]
    fn negative_timings_are_absent() {
        let line = sample_with("0/0/0/18/18", "0/0/-1/-1/5000");
        let record = HaproxyLogParser::new().parse(&line).unwrap();
        assert_eq!(record.time_queue, Some(0));
        assert_eq!(record.time_connect, None);
        assert_eq!(record.time_respond, None);
        assert_eq!(record.time_total, Some(5000));
    }

    #[test]
    fn short_timing_group_leaves_timings_absent() {
        let line = sample_with("0/0/0/18/18", "0/0/0");
        let record = HaproxyLogParser::new().parse(&line).unwrap();
        assert_eq!(record.time_queue, None);
        assert_eq!(record.time_total, None);
        assert_eq!(record.status_code, Some(302));
    }

    #[test]
    fn corrupt_fields_degrade_without_error() {
        let line = sample_with("10.20.3.41:45572", "not-an-ip:45572");
        let line = line.replacen("[28/Oct/2011:14:30:05.615]", "[yesterday]", 1);
        let line = line.replacen(" 302 677 ", " abc 99999999999 ", 1);
        let record = HaproxyLogParser::new().parse(&line).unwrap();
        assert_eq!(record.client_ip, None);
        assert_eq!(record.client_port, Some(45572));
        assert_eq!(record.event_time, None);
        assert_eq!(record.status_code, None);
        assert_eq!(record.bytes_read, None);
        assert_eq!(record.host.as_deref(), Some("ams-mid006.int.s-cloud.net"));
    }

    #[test]
    fn ipv6_client_is_decoded() {
        let line = sample_with("10.20.3.41:45572", "2001:db8::7:443");
        let record = HaproxyLogParser::new().parse(&line).unwrap();
        assert_eq!(record.client_ip, Some("2001:db8::7".parse().unwrap()));
        assert_eq!(record.client_port, Some(443));
    }

    #[test]
    fn trailing_newline_is_ignored() {
        let line = format!("{SAMPLE}\r\n");
        assert!(HaproxyLogParser::new().parse(&line).is_ok());
    }

    #[test]
    fn mismatch_reports_line_and_leaves_record_untouched() {
        let mut record = AccessLogRecord {
            host: Some("previous".to_owned()),
            status_code: Some(200),
            ..Default::default()
        };
        let before = record.clone();

        let err = scan("Oct 28 14:30:05 not an access log", &mut record).unwrap_err();

        assert_eq!(
            err,
            ScanError::NoMatch {
                line: "Oct 28 14:30:05 not an access log".to_owned()
            }
        );
        assert_eq!(record, before);
    }

    #[test]
    fn line_missing_response_cookie_is_rejected() {
        let line = sample_with(" 677 - - ---- ", " 677 - ---- ");
        let mut record = AccessLogRecord::default();

        assert!(scan(&line, &mut record).is_err());
        assert_eq!(record.bytes_read, None);
        assert_eq!(record, AccessLogRecord::default());
    }

    #[test]
    fn successful_scan_replaces_record() {
        let mut record = AccessLogRecord {
            request_cookie: Some("stale".to_owned()),
            ..Default::default()
        };
        scan(SAMPLE, &mut record).unwrap();
        assert_eq!(record.request_cookie, None);
        assert_eq!(record.status_code, Some(302));
    }

    #[test]
    fn parser_is_shareable_across_threads() {
        let parser = std::sync::Arc::new(HaproxyLogParser::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let parser = std::sync::Arc::clone(&parser);
                std::thread::spawn(move || parser.parse(SAMPLE).map(|r| r.status_code))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(Some(302)));
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scan_arbitrary_text_does_not_panic(line in ".{0,400}") {
                let mut record = AccessLogRecord::default();
                let _ = scan(&line, &mut record);
            }

            #[test]
            fn failed_scan_never_touches_record(line in "[a-z ]{0,80}") {
                let mut record = AccessLogRecord::default();
                if scan(&line, &mut record).is_err() {
                    prop_assert_eq!(record, AccessLogRecord::default());
                }
            }

            #[test]
            fn any_status_and_bytes_roundtrip(status in 100i32..600, bytes in 0i32..i32::MAX) {
                let line = sample_with(" 302 677 ", &format!(" {status} {bytes} "));
                let record = HaproxyLogParser::new().parse(&line).unwrap();
                prop_assert_eq!(record.status_code, Some(status));
                prop_assert_eq!(record.bytes_read, Some(bytes));
            }

            #[test]
            fn any_port_is_decoded(port in 0u32..=65535) {
                let line = sample_with(":45572 ", &format!(":{port} "));
                let record = HaproxyLogParser::new().parse(&line).unwrap();
                prop_assert_eq!(record.client_port, Some(port));
            }
        }
    }
}

//! Protobuf 코덱 — 레코드 ↔ `RequestMessage`
//!
//! 필드 태그는 레코드 필드 순서대로 1부터 부여되며, 모든 스칼라 필드는
//! proto2 스타일 `optional`입니다. 종료 상태 열거형은 `int32` 태그로 기록됩니다.
//! 클라이언트 주소는 16바이트로 기록되며 IPv4는 IPv4-mapped 형태입니다.

use std::net::{IpAddr, Ipv6Addr};

use bytes::Buf;
use haproxy2pb_core::error::Haproxy2pbError;
use haproxy2pb_core::pipeline::RecordEncoder;
use haproxy2pb_core::types::{
    AccessLogRecord, CookieState, CookieTransform, EventTime, ProxyState, TerminationCode,
    TerminationReason,
};
use prost::Message;

use crate::error::LogParserError;

/// 액세스 로그 한 줄의 와이어 메시지
#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestMessage {
    #[prost(string, optional, tag = "1")]
    pub host: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub process: Option<String>,
    #[prost(int32, optional, tag = "3")]
    pub pid: Option<i32>,
    #[prost(bytes = "vec", optional, tag = "4")]
    pub client_ip: Option<Vec<u8>>,
    #[prost(uint32, optional, tag = "5")]
    pub client_port: Option<u32>,

    #[prost(uint32, optional, tag = "6")]
    pub year: Option<u32>,
    #[prost(uint32, optional, tag = "7")]
    pub month: Option<u32>,
    #[prost(uint32, optional, tag = "8")]
    pub day: Option<u32>,
    #[prost(uint32, optional, tag = "9")]
    pub hour: Option<u32>,
    #[prost(uint32, optional, tag = "10")]
    pub minute: Option<u32>,
    #[prost(uint32, optional, tag = "11")]
    pub second: Option<u32>,
    #[prost(uint32, optional, tag = "12")]
    pub nano_second: Option<u32>,

    #[prost(string, optional, tag = "13")]
    pub frontend: Option<String>,
    #[prost(string, optional, tag = "14")]
    pub backend: Option<String>,
    #[prost(string, optional, tag = "15")]
    pub server: Option<String>,

    #[prost(int32, optional, tag = "16")]
    pub time_queue: Option<i32>,
    #[prost(int32, optional, tag = "17")]
    pub time_wait: Option<i32>,
    #[prost(int32, optional, tag = "18")]
    pub time_connect: Option<i32>,
    #[prost(int32, optional, tag = "19")]
    pub time_respond: Option<i32>,
    #[prost(int32, optional, tag = "20")]
    pub time_total: Option<i32>,

    #[prost(int32, optional, tag = "21")]
    pub status_code: Option<i32>,
    #[prost(int32, optional, tag = "22")]
    pub bytes_read: Option<i32>,
    #[prost(string, optional, tag = "23")]
    pub request_cookie: Option<String>,
    #[prost(string, optional, tag = "24")]
    pub response_cookie: Option<String>,

    #[prost(int32, optional, tag = "25")]
    pub termination_reason: Option<i32>,
    #[prost(int32, optional, tag = "26")]
    pub termination_state: Option<i32>,
    #[prost(int32, optional, tag = "27")]
    pub termination_cookie: Option<i32>,
    #[prost(int32, optional, tag = "28")]
    pub termination_cookie_transform: Option<i32>,

    #[prost(int32, optional, tag = "29")]
    pub active_connections: Option<i32>,
    #[prost(int32, optional, tag = "30")]
    pub frontend_connections: Option<i32>,
    #[prost(int32, optional, tag = "31")]
    pub backend_connections: Option<i32>,
    #[prost(int32, optional, tag = "32")]
    pub server_connections: Option<i32>,
    #[prost(int32, optional, tag = "33")]
    pub retries: Option<i32>,

    #[prost(int32, optional, tag = "34")]
    pub server_queue: Option<i32>,
    #[prost(int32, optional, tag = "35")]
    pub backend_queue: Option<i32>,

    #[prost(string, repeated, tag = "36")]
    pub request_headers: Vec<String>,
    #[prost(string, repeated, tag = "37")]
    pub response_headers: Vec<String>,

    #[prost(string, optional, tag = "38")]
    pub http_method: Option<String>,
    #[prost(string, optional, tag = "39")]
    pub http_uri: Option<String>,
    #[prost(string, optional, tag = "40")]
    pub http_version: Option<String>,
}

fn ip_to_bytes(ip: IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(v4) => v4.to_ipv6_mapped().octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::from(octets))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            let v6 = Ipv6Addr::from(octets);
            Some(match v6.to_ipv4_mapped() {
                Some(v4) => IpAddr::V4(v4),
                None => IpAddr::V6(v6),
            })
        }
        _ => None,
    }
}

impl From<&AccessLogRecord> for RequestMessage {
    fn from(r: &AccessLogRecord) -> Self {
        let t = r.event_time;
        Self {
            host: r.host.clone(),
            process: r.process.clone(),
            pid: r.pid,
            client_ip: r.client_ip.map(ip_to_bytes),
            client_port: r.client_port,
            year: t.map(|t| t.year),
            month: t.map(|t| t.month),
            day: t.map(|t| t.day),
            hour: t.map(|t| t.hour),
            minute: t.map(|t| t.minute),
            second: t.map(|t| t.second),
            nano_second: t.map(|t| t.nanosecond),
            frontend: r.frontend.clone(),
            backend: r.backend.clone(),
            server: r.server.clone(),
            time_queue: r.time_queue,
            time_wait: r.time_wait,
            time_connect: r.time_connect,
            time_respond: r.time_respond,
            time_total: r.time_total,
            status_code: r.status_code,
            bytes_read: r.bytes_read,
            request_cookie: r.request_cookie.clone(),
            response_cookie: r.response_cookie.clone(),
            termination_reason: r.termination_reason.map(|v| v.tag()),
            termination_state: r.termination_state.map(|v| v.tag()),
            termination_cookie: r.termination_cookie.map(|v| v.tag()),
            termination_cookie_transform: r.termination_cookie_transform.map(|v| v.tag()),
            active_connections: r.active_connections,
            frontend_connections: r.frontend_connections,
            backend_connections: r.backend_connections,
            server_connections: r.server_connections,
            retries: r.retries,
            server_queue: r.server_queue,
            backend_queue: r.backend_queue,
            request_headers: r.request_headers.clone(),
            response_headers: r.response_headers.clone(),
            http_method: r.http_method.clone(),
            http_uri: r.http_uri.clone(),
            http_version: r.http_version.clone(),
        }
    }
}

impl From<RequestMessage> for AccessLogRecord {
    fn from(m: RequestMessage) -> Self {
        // 달력 필드는 전부 있을 때만 복원합니다.
        let event_time = match (m.year, m.month, m.day, m.hour, m.minute, m.second, m.nano_second)
        {
            (
                Some(year),
                Some(month),
                Some(day),
                Some(hour),
                Some(minute),
                Some(second),
                Some(nanosecond),
            ) => Some(EventTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
                nanosecond,
            }),
            _ => None,
        };

        Self {
            host: m.host,
            process: m.process,
            pid: m.pid,
            client_ip: m.client_ip.as_deref().and_then(ip_from_bytes),
            client_port: m.client_port,
            event_time,
            frontend: m.frontend,
            backend: m.backend,
            server: m.server,
            time_queue: m.time_queue,
            time_wait: m.time_wait,
            time_connect: m.time_connect,
            time_respond: m.time_respond,
            time_total: m.time_total,
            status_code: m.status_code,
            bytes_read: m.bytes_read,
            request_cookie: m.request_cookie,
            response_cookie: m.response_cookie,
            termination_reason: m.termination_reason.and_then(TerminationReason::from_tag),
            termination_state: m.termination_state.and_then(ProxyState::from_tag),
            termination_cookie: m.termination_cookie.and_then(CookieState::from_tag),
            termination_cookie_transform: m
                .termination_cookie_transform
                .and_then(CookieTransform::from_tag),
            active_connections: m.active_connections,
            frontend_connections: m.frontend_connections,
            backend_connections: m.backend_connections,
            server_connections: m.server_connections,
            retries: m.retries,
            server_queue: m.server_queue,
            backend_queue: m.backend_queue,
            request_headers: m.request_headers,
            response_headers: m.response_headers,
            http_method: m.http_method,
            http_uri: m.http_uri,
            http_version: m.http_version,
        }
    }
}

/// Protobuf 레코드 인코더
///
/// [`RecordEncoder::encode`]는 길이 접두사 없는 메시지를 씁니다.
/// 스트림에는 [`ProtobufEncoder::encode_length_delimited`]를 사용합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufEncoder;

impl ProtobufEncoder {
    /// 새 인코더를 생성합니다.
    pub fn new() -> Self {
        Self
    }

    /// 레코드를 길이 접두사 없이 `buf` 뒤에 인코딩합니다.
    pub fn encode_raw(
        &self,
        record: &AccessLogRecord,
        buf: &mut Vec<u8>,
    ) -> Result<(), LogParserError> {
        RequestMessage::from(record).encode(buf)?;
        Ok(())
    }

    /// varint 길이 접두사와 함께 `buf` 뒤에 인코딩합니다.
    pub fn encode_length_delimited(
        &self,
        record: &AccessLogRecord,
        buf: &mut Vec<u8>,
    ) -> Result<(), LogParserError> {
        RequestMessage::from(record).encode_length_delimited(buf)?;
        Ok(())
    }

    /// 레코드 하나의 인코딩 크기 (접두사 제외)
    pub fn encoded_len(&self, record: &AccessLogRecord) -> usize {
        RequestMessage::from(record).encoded_len()
    }
}

impl RecordEncoder for ProtobufEncoder {
    fn encoding_name(&self) -> &str {
        "protobuf"
    }

    fn encode(&self, record: &AccessLogRecord, buf: &mut Vec<u8>) -> Result<(), Haproxy2pbError> {
        self.encode_raw(record, buf)?;
        Ok(())
    }
}

/// 길이 접두사 없는 단일 메시지를 디코딩합니다.
pub fn decode(buf: &[u8]) -> Result<AccessLogRecord, LogParserError> {
    Ok(RequestMessage::decode(buf)?.into())
}

/// 길이 접두사 스트림 전체를 디코딩합니다.
///
/// 중간에 잘린 메시지가 있으면 그때까지의 레코드를 버리고 에러를 반환합니다.
pub fn decode_length_delimited(mut buf: &[u8]) -> Result<Vec<AccessLogRecord>, LogParserError> {
    let mut records = Vec::new();
    while buf.has_remaining() {
        let message = RequestMessage::decode_length_delimited(&mut buf)?;
        records.push(message.into());
    }
    Ok(records)
}

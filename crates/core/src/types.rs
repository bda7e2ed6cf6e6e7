//! 도메인 타입 — 액세스 로그 레코드와 종료 상태 열거형
//!
//! [`AccessLogRecord`]는 HAProxy 액세스 로그 한 줄을 디코딩한 결과입니다.
//! 모든 필드는 독립적으로 `Option`이며, `None`은 "라인에 없거나 파싱할 수 없음"을 뜻합니다.
//! 0이나 빈 문자열은 유효한 값으로 그대로 보존됩니다.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// 액세스 로그 한 줄의 구조화된 표현
///
/// 라인마다 새로 생성되고, 한 번의 스캔으로 채워진 뒤 호출자에게 넘어갑니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogRecord {
    // --- 식별 정보 ---
    /// 로그를 남긴 호스트
    pub host: Option<String>,
    /// 프로세스 이름 (보통 `haproxy`)
    pub process: Option<String>,
    /// 프로세스 ID
    pub pid: Option<i32>,

    // --- 클라이언트 ---
    /// 클라이언트 IP (v4 또는 v6)
    pub client_ip: Option<IpAddr>,
    /// 클라이언트 포트
    pub client_port: Option<u32>,

    /// 이벤트 시각 (달력 필드, 밀리초 정밀도)
    pub event_time: Option<EventTime>,

    // --- 라우팅 ---
    pub frontend: Option<String>,
    pub backend: Option<String>,
    pub server: Option<String>,

    // --- 타이밍 (밀리초, 음수는 "해당 없음") ---
    /// Tq: 요청 대기 시간
    pub time_queue: Option<i32>,
    /// Tw: 큐 대기 시간
    pub time_wait: Option<i32>,
    /// Tc: 서버 연결 시간
    pub time_connect: Option<i32>,
    /// Tr: 첫 응답 바이트까지의 시간
    pub time_respond: Option<i32>,
    /// Tt: 전체 세션 시간
    pub time_total: Option<i32>,

    // --- 결과 ---
    pub status_code: Option<i32>,
    pub bytes_read: Option<i32>,
    pub request_cookie: Option<String>,
    pub response_cookie: Option<String>,

    // --- 종료 상태 ---
    pub termination_reason: Option<TerminationReason>,
    pub termination_state: Option<ProxyState>,
    pub termination_cookie: Option<CookieState>,
    pub termination_cookie_transform: Option<CookieTransform>,

    // --- 연결 수 ---
    pub active_connections: Option<i32>,
    pub frontend_connections: Option<i32>,
    pub backend_connections: Option<i32>,
    pub server_connections: Option<i32>,
    pub retries: Option<i32>,

    // --- 큐 깊이 ---
    pub server_queue: Option<i32>,
    pub backend_queue: Option<i32>,

    // --- 캡처된 헤더 ---
    /// `|`로 분리된 요청 헤더. 그룹이 비어 있어도 원소 하나(`""`)를 가집니다.
    pub request_headers: Vec<String>,
    /// `|`로 분리된 응답 헤더
    pub response_headers: Vec<String>,

    // --- HTTP 요청 라인 ---
    pub http_method: Option<String>,
    pub http_uri: Option<String>,
    pub http_version: Option<String>,
}

/// 로그 타임스탬프의 달력 필드
///
/// 타임스탬프는 전부 파싱되거나 전부 없습니다 (부분 타임스탬프 없음).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTime {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub nanosecond: u32,
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.nanosecond / 1_000_000
        )
    }
}

/// 이름 ↔ 태그 테이블을 공유하는 종료 상태 열거형 공통 인터페이스
///
/// 태그는 바이너리 인코딩에 쓰이는 정수 값입니다. 모든 태그는 1부터 시작하며,
/// 0은 어떤 멤버에도 할당되지 않습니다.
pub trait TerminationCode: Sized + Copy + 'static {
    /// 모든 멤버 (태그 순)
    const ALL: &'static [Self];

    /// 열거형 이름 (`CLIENT_ABORT` 등)
    fn as_str_name(&self) -> &'static str;

    /// 와이어 태그
    fn tag(&self) -> i32;

    /// 이름으로 멤버를 찾습니다.
    fn from_str_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str_name() == name)
    }

    /// 태그로 멤버를 찾습니다.
    fn from_tag(tag: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.tag() == tag)
    }
}

/// 세션 종료 원인 (종료 코드 첫 번째 문자)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum TerminationReason {
    ClientAbort = 1,
    ServerAbort = 2,
    ProxyAbort = 3,
    ResourceLimit = 4,
    InternalError = 5,
    ClientTimeout = 6,
    ServerTimeout = 7,
}

impl TerminationCode for TerminationReason {
    const ALL: &'static [Self] = &[
        Self::ClientAbort,
        Self::ServerAbort,
        Self::ProxyAbort,
        Self::ResourceLimit,
        Self::InternalError,
        Self::ClientTimeout,
        Self::ServerTimeout,
    ];

    fn as_str_name(&self) -> &'static str {
        match self {
            Self::ClientAbort => "CLIENT_ABORT",
            Self::ServerAbort => "SERVER_ABORT",
            Self::ProxyAbort => "PROXY_ABORT",
            Self::ResourceLimit => "RESOURCE_LIMIT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ClientTimeout => "CLIENT_TIMEOUT",
            Self::ServerTimeout => "SERVER_TIMEOUT",
        }
    }

    fn tag(&self) -> i32 {
        *self as i32
    }
}

/// 세션 종료 시점의 프록시 상태 (종료 코드 두 번째 문자)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum ProxyState {
    Request = 1,
    Queue = 2,
    Connection = 3,
    Headers = 4,
    Data = 5,
    Last = 6,
    Tarpit = 7,
}

impl TerminationCode for ProxyState {
    const ALL: &'static [Self] = &[
        Self::Request,
        Self::Queue,
        Self::Connection,
        Self::Headers,
        Self::Data,
        Self::Last,
        Self::Tarpit,
    ];

    fn as_str_name(&self) -> &'static str {
        match self {
            Self::Request => "REQUEST",
            Self::Queue => "QUEUE",
            Self::Connection => "CONNECTION",
            Self::Headers => "HEADERS",
            Self::Data => "DATA",
            Self::Last => "LAST",
            Self::Tarpit => "TARPIT",
        }
    }

    fn tag(&self) -> i32 {
        *self as i32
    }
}

/// 요청 쿠키 상태 (종료 코드 세 번째 문자)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum CookieState {
    No = 1,
    Invalid = 2,
    Down = 3,
    Valid = 4,
    Expired = 5,
    Old = 6,
}

impl TerminationCode for CookieState {
    const ALL: &'static [Self] = &[
        Self::No,
        Self::Invalid,
        Self::Down,
        Self::Valid,
        Self::Expired,
        Self::Old,
    ];

    fn as_str_name(&self) -> &'static str {
        match self {
            Self::No => "NO",
            Self::Invalid => "INVALID",
            Self::Down => "DOWN",
            Self::Valid => "VALID",
            Self::Expired => "EXPIRED",
            Self::Old => "OLD",
        }
    }

    fn tag(&self) -> i32 {
        *self as i32
    }
}

/// 응답 쿠키 변환 (종료 코드 네 번째 문자)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum CookieTransform {
    None = 1,
    Inserted = 2,
    Updated = 3,
    Provided = 4,
    Rewritten = 5,
    Deleted = 6,
}

impl TerminationCode for CookieTransform {
    const ALL: &'static [Self] = &[
        Self::None,
        Self::Inserted,
        Self::Updated,
        Self::Provided,
        Self::Rewritten,
        Self::Deleted,
    ];

    fn as_str_name(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Inserted => "INSERTED",
            Self::Updated => "UPDATED",
            Self::Provided => "PROVIDED",
            Self::Rewritten => "REWRITTEN",
            Self::Deleted => "DELETED",
        }
    }

    fn tag(&self) -> i32 {
        *self as i32
    }
}

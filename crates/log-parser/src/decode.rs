//! 필드 디코더 — 캡처된 텍스트를 타입 있는 선택 값으로 변환
//!
//! 모든 디코더는 부작용 없는 순수 함수입니다. 파싱 실패는 에러가 아니라
//! `None`으로 표현되며, 레코드 전체를 중단시키지 않습니다.

use std::net::IpAddr;

use chrono::{Datelike, NaiveDateTime, Timelike};
use haproxy2pb_core::types::EventTime;

/// 로그 형식의 "값 없음" 표기
pub const NILVALUE: &str = "-";

/// 이벤트 타임스탬프 형식 (`28/Oct/2011:14:30:05.615`)
pub const EVENT_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S%.3f";

/// 헤더 캡처 구분자
pub const HEADER_DELIMITER: char = '|';

/// `-`이면 `None`, 그 외에는 입력 그대로 반환합니다.
pub fn text(s: &str) -> Option<String> {
    if s == NILVALUE { None } else { Some(s.to_owned()) }
}

/// 10진수 `i32`. 범위를 벗어나거나 숫자가 아니면 `None`.
pub fn int32(s: &str) -> Option<i32> {
    s.parse::<i32>().ok()
}

/// 10진수 `u32`. 범위를 벗어나거나 숫자가 아니면 `None`.
pub fn uint32(s: &str) -> Option<u32> {
    s.parse::<u32>().ok()
}

/// 음수가 아닌 카운트. 음수는 "해당 없음" 표기이므로 `None`.
pub fn count(s: &str) -> Option<i32> {
    int32(s).filter(|v| *v >= 0)
}

/// IPv4 또는 IPv6 주소
pub fn ip(s: &str) -> Option<IpAddr> {
    s.parse::<IpAddr>().ok()
}

/// 고정 형식 타임스탬프를 달력 필드로 분해합니다.
///
/// 실패하면 모든 필드가 없는 것으로 취급합니다 (부분 타임스탬프 없음).
pub fn event_time(s: &str) -> Option<EventTime> {
    // 밀리초는 정확히 3자리여야 합니다.
    let (_, millis) = s.rsplit_once('.')?;
    if millis.len() != 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // 연도는 정확히 4자리여야 합니다.
    let year = s.splitn(3, '/').nth(2)?.split_once(':')?.0;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let dt = NaiveDateTime::parse_from_str(s, EVENT_TIME_FORMAT).ok()?;
    Some(EventTime {
        year: u32::try_from(dt.year()).ok()?,
        month: dt.month(),
        day: dt.day(),
        hour: dt.hour(),
        minute: dt.minute(),
        second: dt.second(),
        nanosecond: dt.nanosecond(),
    })
}

/// `Tq/Tw/Tc/Tr/Tt` 타이밍 그룹
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timings {
    pub queue: Option<i32>,
    pub wait: Option<i32>,
    pub connect: Option<i32>,
    pub respond: Option<i32>,
    pub total: Option<i32>,
}

/// `actconn/feconn/beconn/srv_conn/retries` 연결 그룹
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Connections {
    pub active: Option<i32>,
    pub frontend: Option<i32>,
    pub backend: Option<i32>,
    pub server: Option<i32>,
    pub retries: Option<i32>,
}

/// `srv_queue/backend_queue` 큐 그룹
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Queues {
    pub server: Option<i32>,
    pub backend: Option<i32>,
}

/// `/`로 분할해 최소 `N`개가 있을 때만 앞 `N`개를 카운트로 디코딩합니다.
fn slash_counts<const N: usize>(s: &str) -> Option<[Option<i32>; N]> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() < N {
        return None;
    }
    let mut out = [None; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = count(part);
    }
    Some(out)
}

/// 타이밍 그룹. 5개 미만이면 모든 위치가 `None`.
pub fn timings(s: &str) -> Timings {
    match slash_counts::<5>(s) {
        Some([queue, wait, connect, respond, total]) => Timings {
            queue,
            wait,
            connect,
            respond,
            total,
        },
        None => Timings::default(),
    }
}

/// 연결 그룹. 5개 미만이면 모든 위치가 `None`.
pub fn connections(s: &str) -> Connections {
    match slash_counts::<5>(s) {
        Some([active, frontend, backend, server, retries]) => Connections {
            active,
            frontend,
            backend,
            server,
            retries,
        },
        None => Connections::default(),
    }
}

/// 큐 그룹. 2개 미만이면 모든 위치가 `None`.
pub fn queues(s: &str) -> Queues {
    match slash_counts::<2>(s) {
        Some([server, backend]) => Queues { server, backend },
        None => Queues::default(),
    }
}

/// 헤더 그룹을 `|`로 분할합니다.
///
/// `-`도 특별 취급하지 않으므로 `["-"]`가 되고, 빈 그룹은 `[""]`가 됩니다.
pub fn headers(s: &str) -> Vec<String> {
    s.split(HEADER_DELIMITER).map(str::to_owned).collect()
}

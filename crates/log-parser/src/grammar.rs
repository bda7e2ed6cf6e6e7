//! HAProxy HTTP 액세스 로그 라인 문법
//!
//! 한 줄 전체를 단일 정규식으로 분할합니다. 양 끝이 고정되어 있어
//! 부분 일치는 허용되지 않습니다.
//!
//! # 라인 형식
//! ```text
//! Oct 28 14:30:05 ams-mid006.int.s-cloud.net haproxy[10227]: 10.20.3.41:45572 [28/Oct/2011:14:30:05.615] \
//!   soundcloud soundcloud/ams-app053-8003 0/0/0/18/18 302 677 - - ---- 157/126/126/0/0 0/0 \
//!   {med} {7} "GET /stream/x HTTP/1.0"
//! ```

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// 캡처 그룹 수 (전체 일치 그룹 0 제외)
pub const GROUP_COUNT: usize = 23;

const PATTERN: &str = concat!(
    r"^(\w+ \d+ \S+) ",          // 1: syslog 접두사 (버림)
    r"(\S+) ",                   // 2: host
    r"(\S+)\[(\d+)\]: ",         // 3: process, 4: pid
    r"(\S+):(\d+) ",             // 5: client ip, 6: client port
    r"\[(\S+)\] ",               // 7: 이벤트 타임스탬프
    r"(\S+) ",                   // 8: frontend
    r"(\S+)/(\S+) ",             // 9: backend, 10: server
    r"(\S+) ",                   // 11: Tq/Tw/Tc/Tr/Tt
    r"(\S+) ",                   // 12: status code
    r"(\S+) +",                  // 13: bytes read
    r"(\S+) ",                   // 14: request cookie
    r"(\S+) ",                   // 15: response cookie
    r"(\S{2,4}) ",               // 16: 종료 코드
    r"(\S+) ",                   // 17: actconn/feconn/beconn/srv_conn/retries
    r"(\S+) ",                   // 18: srv_queue/backend_queue
    r"(?:\{([^}]*)\} )?",        // 19: 캡처된 요청 헤더
    r"(?:\{([^}]*)\} )?",        // 20: 캡처된 응답 헤더
    r#""(\S+) ([^"]+) (\S+)" *$"#, // 21: method, 22: uri, 23: version
);

lazy_static! {
    static ref ACCESS_LOG_RE: Regex =
        Regex::new(PATTERN).expect("access log grammar must compile");
}

/// 문법 일치 결과의 위치별 그룹
///
/// 참여하지 않은 선택 그룹(중괄호 그룹)은 빈 문자열로 읽힙니다.
pub struct Groups<'a> {
    caps: Captures<'a>,
}

impl<'a> Groups<'a> {
    /// 1부터 시작하는 그룹 번호로 텍스트를 가져옵니다.
    pub fn get(&self, index: usize) -> &'a str {
        self.caps.get(index).map_or("", |m| m.as_str())
    }

    /// 선택 그룹이 실제로 라인에 있었는지 확인합니다.
    pub fn is_present(&self, index: usize) -> bool {
        self.caps.get(index).is_some()
    }
}

/// 라인에 문법을 적용합니다. 불일치 시 `None`을 반환합니다.
pub fn capture(line: &str) -> Option<Groups<'_>> {
    ACCESS_LOG_RE.captures(line).map(|caps| Groups { caps })
}

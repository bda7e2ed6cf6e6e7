//! 종료 코드 디코더
//!
//! HAProxy는 세션 종료 상태를 2~4자의 코드로 기록합니다 (예: `cD--`, `CRVD`).
//! 각 위치의 문자는 고정된 단축 코드 테이블로 이름이 되고, 이름은
//! 열거형의 이름 → 태그 테이블로 멤버가 됩니다.
//!
//! | 위치 | 의미 | 테이블 |
//! |------|------|--------|
//! | 0 | 종료 원인 | [`REASON_SHORT`] |
//! | 1 | 프록시 상태 | [`PROXY_STATE_SHORT`] |
//! | 2 | 요청 쿠키 상태 | [`COOKIE_SHORT`] |
//! | 3 | 응답 쿠키 변환 | [`COOKIE_TRANSFORM_SHORT`] |

use std::collections::HashMap;

use haproxy2pb_core::types::{
    CookieState, CookieTransform, ProxyState, TerminationCode, TerminationReason,
};
use lazy_static::lazy_static;

lazy_static! {
    /// 종료 원인 단축 코드
    pub static ref REASON_SHORT: HashMap<char, &'static str> = HashMap::from([
        ('C', "CLIENT_ABORT"),
        ('S', "SERVER_ABORT"),
        ('P', "PROXY_ABORT"),
        ('R', "RESOURCE_LIMIT"),
        ('I', "INTERNAL_ERROR"),
        ('c', "CLIENT_TIMEOUT"),
        ('s', "SERVER_TIMEOUT"),
    ]);

    /// 프록시 상태 단축 코드
    pub static ref PROXY_STATE_SHORT: HashMap<char, &'static str> = HashMap::from([
        ('R', "REQUEST"),
        ('Q', "QUEUE"),
        ('C', "CONNECTION"),
        ('H', "HEADERS"),
        ('D', "DATA"),
        ('L', "LAST"),
        ('T', "TARPIT"),
    ]);

    /// 요청 쿠키 상태 단축 코드
    pub static ref COOKIE_SHORT: HashMap<char, &'static str> = HashMap::from([
        ('N', "NO"),
        ('I', "INVALID"),
        ('D', "DOWN"),
        ('V', "VALID"),
        ('E', "EXPIRED"),
        ('O', "OLD"),
    ]);

    /// 응답 쿠키 변환 단축 코드
    pub static ref COOKIE_TRANSFORM_SHORT: HashMap<char, &'static str> = HashMap::from([
        ('N', "NONE"),
        ('I', "INSERTED"),
        ('U', "UPDATED"),
        ('P', "PROVIDED"),
        ('R', "REWRITTEN"),
        ('D', "DELETED"),
    ]);
}

/// 디코딩된 종료 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Termination {
    pub reason: Option<TerminationReason>,
    pub state: Option<ProxyState>,
    pub cookie: Option<CookieState>,
    pub cookie_transform: Option<CookieTransform>,
}

/// 단축 코드 한 글자를 열거형 멤버로 해석합니다.
///
/// 테이블에 없는 문자(`-` 포함)나 열거형에 없는 이름은 `None`입니다.
pub fn resolve<E: TerminationCode>(
    short: Option<char>,
    table: &HashMap<char, &'static str>,
) -> Option<E> {
    let name = table.get(&short?)?;
    E::from_str_name(name)
}

/// 종료 코드 문자열을 디코딩합니다.
///
/// 위치 0과 1은 항상 해석하고, 위치 2와 3은 코드가 2자보다 길 때만 해석합니다.
pub fn termination(code: &str) -> Termination {
    let mut chars = code.chars();
    let reason = resolve(chars.next(), &REASON_SHORT);
    let state = resolve(chars.next(), &PROXY_STATE_SHORT);

    let (cookie, cookie_transform) = if code.chars().count() > 2 {
        (
            resolve(chars.next(), &COOKIE_SHORT),
            resolve(chars.next(), &COOKIE_TRANSFORM_SHORT),
        )
    } else {
        (None, None)
    };

    Termination {
        reason,
        state,
        cookie,
        cookie_transform,
    }
}

//! 에러 타입 — 도메인별 에러 정의

/// haproxy2pb 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum Haproxy2pbError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 라인 스캔 에러
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// 바이너리 인코딩/디코딩 에러
    #[error("codec error: {0}")]
    Codec(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 스캔 에러
///
/// 라인이 문법 전체와 일치하지 않을 때만 발생합니다.
/// 필드 단위 파싱 실패는 에러가 아니라 `None`으로 표현됩니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// 라인이 액세스 로그 문법과 일치하지 않음
    #[error("no match: {line}")]
    NoMatch { line: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_match_carries_line() {
        let err = ScanError::NoMatch {
            line: "garbage line".to_owned(),
        };
        assert_eq!(err.to_string(), "no match: garbage line");
    }

    #[test]
    fn scan_error_converts_to_top_level() {
        let err: Haproxy2pbError = ScanError::NoMatch {
            line: String::new(),
        }
        .into();
        assert!(matches!(err, Haproxy2pbError::Scan(_)));
    }

    #[test]
    fn config_error_display() {
        let err = Haproxy2pbError::from(ConfigError::InvalidValue {
            field: "general.log_level".to_owned(),
            reason: "must be one of: trace, debug".to_owned(),
        });
        let msg = err.to_string();
        assert!(msg.contains("config error"));
        assert!(msg.contains("general.log_level"));
    }
}

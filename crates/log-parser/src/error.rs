//! 로그 파서 에러 타입
//!
//! 스캔 실패는 [`ScanError`](haproxy2pb_core::ScanError)로 표현되고,
//! 여기에는 바이너리 코덱에서 발생하는 에러만 있습니다.
//! `From<LogParserError> for Haproxy2pbError`가 구현되어 있어 `?`로 전파됩니다.

use haproxy2pb_core::error::Haproxy2pbError;

/// 코덱 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogParserError {
    /// 메시지 인코딩 실패 (버퍼 용량 부족)
    #[error("encode error: {0}")]
    Encode(#[from] prost::EncodeError),

    /// 메시지 디코딩 실패 (잘렸거나 손상된 입력)
    #[error("decode error: {0}")]
    Decode(#[from] prost::DecodeError),
}

impl From<LogParserError> for Haproxy2pbError {
    fn from(err: LogParserError) -> Self {
        Haproxy2pbError::Codec(err.to_string())
    }
}

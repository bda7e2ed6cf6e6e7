//! 파이프라인 trait — 스캐너/인코더 확장 포인트 정의

use crate::error::{Haproxy2pbError, ScanError};
use crate::types::AccessLogRecord;

/// 라인 스캐너 trait
///
/// 한 줄의 텍스트를 [`AccessLogRecord`]로 디코딩합니다.
/// 구현체는 호출 간 상태를 갖지 않아야 하며, 여러 스레드에서 동시에 호출될 수 있습니다.
pub trait LineScanner: Send + Sync {
    /// 지원하는 로그 형식 이름
    fn format_name(&self) -> &str;

    /// 라인을 스캔하여 `record`를 채웁니다.
    ///
    /// 문법 불일치 시 에러를 반환하고 `record`는 건드리지 않습니다.
    fn scan(&self, line: &str, record: &mut AccessLogRecord) -> Result<(), ScanError>;

    /// 새 레코드로 라인을 파싱합니다.
    fn parse(&self, line: &str) -> Result<AccessLogRecord, ScanError> {
        let mut record = AccessLogRecord::default();
        self.scan(line, &mut record)?;
        Ok(record)
    }
}

/// 레코드 인코더 trait
///
/// 디코딩된 레코드를 다운스트림 저장/전송용 바이트로 변환합니다.
pub trait RecordEncoder: Send + Sync {
    /// 인코딩 이름
    fn encoding_name(&self) -> &str;

    /// 레코드를 `buf` 뒤에 인코딩합니다.
    fn encode(&self, record: &AccessLogRecord, buf: &mut Vec<u8>) -> Result<(), Haproxy2pbError>;
}

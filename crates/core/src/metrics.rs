//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않으면 모든 호출은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `haproxy2pb_`
//! - 접미어: `_total` (counter), `_bytes_total` (바이트 counter)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (matched, unmatched, skipped)
pub const LABEL_RESULT: &str = "result";

// ─── 스캐너 메트릭 ────────────────────────────────────────────────

/// 읽은 전체 라인 수 (counter, label: result)
pub const SCANNER_LINES_TOTAL: &str = "haproxy2pb_scanner_lines_total";

/// 읽은 입력 바이트 수 (counter)
pub const SCANNER_INPUT_BYTES_TOTAL: &str = "haproxy2pb_scanner_input_bytes_total";

// ─── 인코더 메트릭 ────────────────────────────────────────────────

/// 인코딩된 레코드 수 (counter)
pub const ENCODER_RECORDS_TOTAL: &str = "haproxy2pb_encoder_records_total";

/// 출력 바이트 수 (counter)
pub const ENCODER_OUTPUT_BYTES_TOTAL: &str = "haproxy2pb_encoder_output_bytes_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        SCANNER_LINES_TOTAL,
        "Total number of input lines, labelled by scan result"
    );
    describe_counter!(SCANNER_INPUT_BYTES_TOTAL, "Total bytes of input lines read");
    describe_counter!(
        ENCODER_RECORDS_TOTAL,
        "Total number of records encoded to protobuf"
    );
    describe_counter!(
        ENCODER_OUTPUT_BYTES_TOTAL,
        "Total bytes written by the record encoder"
    );
}

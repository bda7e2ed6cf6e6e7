#![no_main]

use haproxy2pb_core::AccessLogRecord;
use haproxy2pb_log_parser::scan;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let mut record = AccessLogRecord::default();

        // 불일치 시 레코드는 그대로여야 한다
        if scan(line, &mut record).is_err() {
            assert_eq!(record, AccessLogRecord::default());
        }
    }
});

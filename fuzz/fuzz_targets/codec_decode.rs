#![no_main]

use haproxy2pb_log_parser::decode_length_delimited;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // 크래시나 패닉 없이 Ok 또는 Err을 반환해야 한다
    let _ = decode_length_delimited(data);
});

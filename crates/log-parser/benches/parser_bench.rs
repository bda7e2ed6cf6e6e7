//! 액세스 로그 스캐너 / 인코더 벤치마크
//!
//! 한 줄 스캔, 헤더 포함 스캔, 불일치 라인, protobuf 인코딩 처리량을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use haproxy2pb_core::AccessLogRecord;
use haproxy2pb_core::pipeline::{LineScanner, RecordEncoder};
use haproxy2pb_log_parser::{HaproxyLogParser, ProtobufEncoder};

/// 헤더 캡처 없는 짧은 라인
const LINE_SHORT: &str = r#"Oct 28 14:30:05 ams-mid006.int.s-cloud.net haproxy[10227]: 10.20.3.41:45572 [28/Oct/2011:14:30:05.615] soundcloud soundcloud/ams-app053-8003 0/0/0/18/18 302 677 - - ---- 157/126/126/0/0 0/0 "GET /stream/x HTTP/1.0""#;

/// 헤더 캡처와 긴 URI가 있는 라인
const LINE_LONG: &str = r#"Oct 28 14:30:05 ams-mid006.int.s-cloud.net haproxy[10227]: 10.20.3.41:45572 [28/Oct/2011:14:30:05.615] soundcloud soundcloud/ams-app053-8003 0/0/0/18/18 302 677 SRV=app1 - cRVD 157/126/126/0/0 0/0 {med|Mozilla/5.0|api.soundcloud.com} {7|text/html} "GET /stream/pNAFM5DjlcZj?url=http%3A//api.soundcloud.com/users/4641029&auto_play=true&show_artwork=true&color=ff7700 HTTP/1.1""#;

/// 문법과 일치하지 않는 라인
const LINE_GARBAGE: &str = "Oct 28 14:30:05 ams-mid006 haproxy[10227]: Proxy soundcloud started.";

fn bench_scan(c: &mut Criterion) {
    let parser = HaproxyLogParser::new();

    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Elements(1));

    for (name, line) in [("short", LINE_SHORT), ("long_with_headers", LINE_LONG)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            let mut record = AccessLogRecord::default();
            b.iter(|| parser.scan(black_box(line), &mut record).unwrap())
        });
    }

    group.bench_function("no_match", |b| {
        let mut record = AccessLogRecord::default();
        b.iter(|| parser.scan(black_box(LINE_GARBAGE), &mut record).unwrap_err())
    });

    // 1000건 반복 처리량
    group.throughput(Throughput::Elements(1000));
    group.bench_function("throughput_1000", |b| {
        let mut record = AccessLogRecord::default();
        b.iter(|| {
            for _ in 0..1000 {
                parser.scan(black_box(LINE_SHORT), &mut record).unwrap();
            }
        })
    });

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let parser = HaproxyLogParser::new();
    let encoder = ProtobufEncoder::new();
    let record = parser.parse(LINE_LONG).unwrap();

    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Bytes(LINE_LONG.len() as u64));

    group.bench_function("protobuf", |b| {
        let mut buf = Vec::with_capacity(512);
        b.iter(|| {
            buf.clear();
            encoder.encode(black_box(&record), &mut buf).unwrap();
        })
    });

    group.bench_function("scan_and_encode", |b| {
        let mut buf = Vec::with_capacity(512);
        let mut scratch = AccessLogRecord::default();
        b.iter(|| {
            buf.clear();
            parser.scan(black_box(LINE_LONG), &mut scratch).unwrap();
            encoder
                .encode_length_delimited(&scratch, &mut buf)
                .unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_scan, bench_encode);
criterion_main!(benches);

#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`grammar`]: 한 줄을 23개 위치 그룹으로 나누는 정규식 문법
//! - [`decode`]: 그룹 텍스트를 타입 있는 선택 값으로 바꾸는 디코더
//! - [`termination`]: 종료 코드 단축 문자 테이블과 디코더
//! - [`scanner`]: 문법과 디코더를 묶어 레코드를 채우는 스캐너
//! - [`codec`]: 레코드의 Protobuf 인코딩/디코딩
//! - [`error`]: 코덱 에러 타입
//!
//! # 흐름
//!
//! ```text
//! line -> grammar::capture -> decode::* / termination -> AccessLogRecord -> codec -> bytes
//! ```

pub mod codec;
pub mod decode;
pub mod error;
pub mod grammar;
pub mod scanner;
pub mod termination;

// 스캐너
pub use scanner::{HaproxyLogParser, scan};

// 코덱
pub use codec::{ProtobufEncoder, RequestMessage, decode_length_delimited};

// 에러
pub use error::LogParserError;

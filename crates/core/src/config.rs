//! 설정 관리 — haproxy2pb.toml 파싱 및 런타임 설정
//!
//! [`Haproxy2pbConfig`]는 모든 섹션의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`HAPROXY2PB_GENERAL_LOG_LEVEL=debug` 형식)
//! 3. 설정 파일 (`haproxy2pb.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), haproxy2pb_core::error::Haproxy2pbError> {
//! use haproxy2pb_core::config::Haproxy2pbConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = Haproxy2pbConfig::load("haproxy2pb.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = Haproxy2pbConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, Haproxy2pbError};

/// 입력 라인 최대 길이 상한 (16MB)
const MAX_LINE_BYTES_LIMIT: usize = 16 * 1024 * 1024;

/// haproxy2pb 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Haproxy2pbConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 입력 설정
    #[serde(default)]
    pub input: InputConfig,
    /// 출력 설정
    #[serde(default)]
    pub output: OutputConfig,
    /// 스캐너 동작 설정
    #[serde(default)]
    pub scanner: ScannerConfig,
}

impl Haproxy2pbConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, Haproxy2pbError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, Haproxy2pbError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Haproxy2pbError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                Haproxy2pbError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, Haproxy2pbError> {
        toml::from_str(toml_str).map_err(|e| {
            Haproxy2pbError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `HAPROXY2PB_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "HAPROXY2PB_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "HAPROXY2PB_GENERAL_LOG_FORMAT");

        // Input
        override_string(&mut self.input.path, "HAPROXY2PB_INPUT_PATH");
        override_usize(
            &mut self.input.max_line_bytes,
            "HAPROXY2PB_INPUT_MAX_LINE_BYTES",
        );

        // Output
        override_string(&mut self.output.path, "HAPROXY2PB_OUTPUT_PATH");
        if let Ok(val) = std::env::var("HAPROXY2PB_OUTPUT_FRAMING") {
            match Framing::from_name(&val) {
                Some(framing) => self.output.framing = framing,
                None => warn!(
                    env_key = "HAPROXY2PB_OUTPUT_FRAMING",
                    value = val.as_str(),
                    "unknown framing in env var, ignoring"
                ),
            }
        }

        // Scanner
        override_bool(
            &mut self.scanner.stop_on_error,
            "HAPROXY2PB_SCANNER_STOP_ON_ERROR",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), Haproxy2pbError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.input.max_line_bytes == 0 || self.input.max_line_bytes > MAX_LINE_BYTES_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "input.max_line_bytes".to_owned(),
                reason: format!("must be 1-{}", MAX_LINE_BYTES_LIMIT),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 입력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// 입력 파일 경로 (빈 문자열이면 stdin)
    pub path: String,
    /// 허용 최대 라인 길이 (바이트). 초과 라인은 건너뜁니다.
    pub max_line_bytes: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            max_line_bytes: 64 * 1024, // 64KB
        }
    }
}

/// 출력 프레이밍
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    /// varint 길이 접두사 + 메시지 (스트림용, 기본값)
    #[default]
    LengthDelimited,
    /// 접두사 없이 메시지를 이어 붙임
    Raw,
}

impl Framing {
    /// 설정 파일 표기로 프레이밍을 찾습니다.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "length_delimited" => Some(Self::LengthDelimited),
            "raw" => Some(Self::Raw),
            _ => None,
        }
    }
}

/// 출력 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 출력 파일 경로 (빈 문자열이면 stdout)
    pub path: String,
    /// 레코드 프레이밍
    pub framing: Framing,
}

/// 스캐너 동작 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// 첫 번째 불일치 라인에서 실행을 중단할지 여부
    pub stop_on_error: bool,
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

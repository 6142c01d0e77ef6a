//! 설정 관리.
//!
//! 설정은 다음 순서로 겹쳐서 로드됩니다 (뒤가 우선):
//! 1. 내장 기본값
//! 2. 현재 디렉터리의 `akq.toml` (선택)
//! 3. `AKQ_CONFIG` 환경변수가 가리키는 파일 (지정 시 필수)
//! 4. `AKQ__` 접두사 환경변수 (예: `AKQ__PROVIDER__TIMEOUT_SECS=10`)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 기본 시세 API 주소
pub const DEFAULT_PUSH2_URL: &str = "https://push2.eastmoney.com";
/// 기본 과거 시세 API 주소
pub const DEFAULT_PUSH2HIS_URL: &str = "https://push2his.eastmoney.com";
/// 기본 데이터센터 API 주소 (거시경제 지표)
pub const DEFAULT_DATACENTER_URL: &str = "https://datacenter-web.eastmoney.com";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 데이터 Provider 설정
    pub provider: ProviderConfig,
    /// 출력 설정
    pub display: DisplayOptions,
}

/// 데이터 Provider 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// 실시간 시세 API 주소
    pub push2_url: String,
    /// 과거 시세(K선) API 주소
    pub push2his_url: String,
    /// 데이터센터 API 주소
    pub datacenter_url: String,
    /// HTTP 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            push2_url: DEFAULT_PUSH2_URL.to_string(),
            push2his_url: DEFAULT_PUSH2HIS_URL.to_string(),
            datacenter_url: DEFAULT_DATACENTER_URL.to_string(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 표 출력 옵션.
///
/// 실행 시작 시 한 번 로드되고 이후 변경되지 않습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// 셀 최대 표시 폭 (0 = 제한 없음)
    pub max_colwidth: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self { max_colwidth: 30 }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("akq").required(false));

        if let Ok(path) = std::env::var("AKQ_CONFIG") {
            tracing::debug!(path = %path, "Loading config file from AKQ_CONFIG");
            builder = builder.add_source(config::File::with_name(&path));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("AKQ")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.provider.push2his_url, DEFAULT_PUSH2HIS_URL);
        assert_eq!(config.provider.timeout(), Duration::from_secs(30));
        assert_eq!(config.display.max_colwidth, 30);
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("display.max_colwidth", 12)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.display.max_colwidth, 12);
        assert_eq!(config.provider.push2_url, DEFAULT_PUSH2_URL);
    }
}

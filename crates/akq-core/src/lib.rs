//! # AKQ Core
//!
//! akq 전반에서 사용되는 기본 타입을 제공합니다:
//! - CLI 인자 값과 자동 타입 변환
//! - 조회 결과 모델 (표, 시리즈, 단일 값, 텍스트)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod value;

pub use config::{AppConfig, DisplayOptions, ProviderConfig};
pub use error::CoreError;
pub use logging::{init_logging, init_logging_from_env, LogConfig, LogFormat};
pub use result::{Cell, QueryResult, Series, Table};
pub use value::{Argument, Arguments, Value, ValueKind};

//! 조회 함수와 데이터 Provider.
//!
//! 이 crate는 다음을 제공합니다:
//! - 이름 → 조회 함수 디스패치 테이블 ([`FunctionRegistry`])
//! - 파라미터 시그니처 검증과 인자 바인딩
//! - Eastmoney 공개 API 기반 조회 함수

pub mod error;
pub mod functions;
pub mod provider;
pub mod registry;

use std::sync::Arc;

use akq_core::ProviderConfig;

pub use error::{DataError, Result};
pub use functions::{catalog, register_all};
pub use provider::EastmoneyClient;
pub use registry::{BoundArgs, FunctionRegistry, Param, ParamError, ParamKind, QueryFunction, Signature};

/// Eastmoney 클라이언트를 만들고 모든 함수를 등록한 레지스트리를 반환합니다.
///
/// HTTP 클라이언트를 만들 수 없으면 [`DataError::Unavailable`]을 반환합니다.
pub fn eastmoney_registry(config: &ProviderConfig) -> Result<FunctionRegistry> {
    let client = Arc::new(EastmoneyClient::from_config(config)?);
    let mut registry = FunctionRegistry::new();
    register_all(&mut registry, client);

    tracing::debug!(functions = registry.len(), "Function registry ready");
    Ok(registry)
}

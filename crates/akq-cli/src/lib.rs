//! akq CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 명령줄 토큰 → 호출 요청 파싱
//! - 조회 함수 실행과 오류 분류
//! - 표/시리즈 텍스트 출력과 CSV 저장

pub mod commands;
pub mod output;
pub mod request;

pub use commands::*;
pub use request::{InvocationRequest, RequestError};

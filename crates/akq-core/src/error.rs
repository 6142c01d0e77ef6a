//! 핵심 타입 오류.

use thiserror::Error;

/// 결과 모델 관련 오류.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// 행의 셀 수가 컬럼 수와 다름
    #[error("row has {actual} cells but table has {expected} columns")]
    RowWidth { expected: usize, actual: usize },

    /// 중복 컬럼 이름
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

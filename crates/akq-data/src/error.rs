//! 데이터 모듈 오류 타입.

use akq_core::CoreError;
use thiserror::Error;

/// 데이터 함수 실행 중 발생하는 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// HTTP 요청 실패
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 성공이 아닌 HTTP 상태 코드
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// 응답 디코딩 실패
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// 데이터 없음
    #[error("no data returned for {0}")]
    NoData(String),

    /// 함수가 받아들이지 않는 인자 값
    #[error("{0}")]
    InvalidArgument(String),

    /// Provider를 사용할 수 없음 (클라이언트 생성 실패 등)
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// 결과 표 구성 오류
    #[error(transparent)]
    Shape(#[from] CoreError),
}

impl DataError {
    /// 오류 종류 이름 (사용자 메시지용)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "HttpError",
            Self::Status { .. } => "StatusError",
            Self::Decode(_) => "DecodeError",
            Self::NoData(_) => "NoDataError",
            Self::InvalidArgument(_) => "ValueError",
            Self::Unavailable(_) => "UnavailableError",
            Self::Shape(_) => "ShapeError",
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(DataError::NoData("x".into()).kind(), "NoDataError");
        assert_eq!(DataError::InvalidArgument("x".into()).kind(), "ValueError");
        let shape = DataError::from(CoreError::DuplicateColumn("a".into()));
        assert_eq!(shape.kind(), "ShapeError");
    }

    #[test]
    fn test_json_error_becomes_decode() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(DataError::from(err), DataError::Decode(_)));
    }
}

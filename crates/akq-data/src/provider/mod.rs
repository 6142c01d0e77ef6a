//! 데이터 Provider 모듈.
//!
//! ## 동방재부(Eastmoney)
//! - `EastmoneyClient`: push2/push2his/datacenter JSON API 클라이언트
//! - A주, ETF, 지수 K선과 실시간 스냅샷, 거시경제 보고서

pub mod eastmoney;

pub use eastmoney::{secid_for_index, secid_for_security, EastmoneyClient, KlineData, KlineRequest};

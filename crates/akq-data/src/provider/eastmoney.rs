//! 동방재부(Eastmoney) 공개 API 클라이언트.
//!
//! 중국 A주/ETF/지수 시세와 거시경제 지표를 JSON API로 수집합니다.
//!
//! # 엔드포인트
//!
//! - `push2his`: K선(일/주/월봉) 과거 시세 `/api/qt/stock/kline/get`
//! - `push2`: 전종목 실시간 스냅샷 `/api/qt/clist/get`, 개별 종목 `/api/qt/stock/get`
//! - `datacenter-web`: 보고서형 데이터 `/api/data/v1/get` (CPI, PPI 등)
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use akq_core::ProviderConfig;
//! use akq_data::provider::eastmoney::{EastmoneyClient, KlineRequest};
//!
//! let client = EastmoneyClient::from_config(&ProviderConfig::default())?;
//! let bars = client.fetch_klines(&KlineRequest::daily("0.000001")).await?;
//! ```

use akq_core::{Cell, ProviderConfig};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::error::{DataError, Result};

/// 전종목 스냅샷 페이지 크기 (API 상한)
const CLIST_PAGE_SIZE: usize = 100;
/// 보고서 페이지 크기
const REPORT_PAGE_SIZE: usize = 500;
/// 페이지 순회 상한
const MAX_PAGES: usize = 500;

const KLINE_UT: &str = "7eea3edcaed734bea9cbfc24409ed989";
const CLIST_UT: &str = "bd1d9ddb04089700cf9c27f6f7426281";
const QUOTE_UT: &str = "fa5fd1943c7b386f172d6893dbfba10b";

/// JSON 객체 한 행
pub type JsonRow = Map<String, JsonValue>;

/// Eastmoney API 클라이언트.
#[derive(Clone)]
pub struct EastmoneyClient {
    client: Client,
    push2_url: String,
    push2his_url: String,
    datacenter_url: String,
}

/// K선 요청.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineRequest {
    /// `시장.코드` 형식 (예: `1.600519`, `0.000001`)
    pub secid: String,
    /// K선 주기 (101: 일, 102: 주, 103: 월)
    pub klt: u16,
    /// 수정주가 (0: 없음, 1: 전방, 2: 후방)
    pub fqt: u8,
    /// 시작일 (YYYYMMDD)
    pub begin: String,
    /// 종료일 (YYYYMMDD)
    pub end: String,
}

impl KlineRequest {
    /// 전 기간 일봉 요청 (수정주가 없음)
    pub fn daily(secid: impl Into<String>) -> Self {
        Self {
            secid: secid.into(),
            klt: 101,
            fqt: 0,
            begin: "19700101".to_string(),
            end: "20500101".to_string(),
        }
    }
}

/// K선 응답 데이터.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KlineData {
    /// 종목 코드
    #[serde(default)]
    pub code: String,
    /// 종목명
    #[serde(default)]
    pub name: Option<String>,
    /// `날짜,시가,종가,고가,저가,거래량,거래대금,진폭,등락률,등락액,회전율` 문자열 목록
    #[serde(default)]
    pub klines: Vec<String>,
}

/// push2/push2his 공통 응답 래퍼.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct ClistData {
    #[serde(default)]
    total: usize,
    #[serde(default)]
    diff: Vec<JsonRow>,
}

/// datacenter 응답 래퍼.
#[derive(Debug, Deserialize)]
struct ReportEnvelope {
    #[serde(default)]
    result: Option<ReportResult>,
}

#[derive(Debug, Deserialize)]
struct ReportResult {
    #[serde(default)]
    pages: usize,
    #[serde(default)]
    data: Vec<JsonRow>,
}

impl EastmoneyClient {
    /// 설정으로부터 클라이언트 생성.
    ///
    /// HTTP 클라이언트를 만들 수 없으면 [`DataError::Unavailable`]을 반환합니다.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DataError::Unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            push2_url: config.push2_url.trim_end_matches('/').to_string(),
            push2his_url: config.push2his_url.trim_end_matches('/').to_string(),
            datacenter_url: config.datacenter_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET 요청 후 JSON 디코딩.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Result<T> {
        debug!(url = %url, params = ?params, "Eastmoney request");

        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Eastmoney response");

        serde_json::from_str(&body).map_err(|e| DataError::Decode(format!("{}: {}", url, e)))
    }

    /// K선 조회.
    ///
    /// 존재하지 않는 종목이면 `data: null`이 오므로 빈 [`KlineData`]를 반환합니다.
    pub async fn fetch_klines(&self, request: &KlineRequest) -> Result<KlineData> {
        let url = format!("{}/api/qt/stock/kline/get", self.push2his_url);
        let klt = request.klt.to_string();
        let fqt = request.fqt.to_string();

        let params = [
            ("fields1", "f1,f2,f3,f4,f5,f6"),
            ("fields2", "f51,f52,f53,f54,f55,f56,f57,f58,f59,f60,f61"),
            ("ut", KLINE_UT),
            ("klt", klt.as_str()),
            ("fqt", fqt.as_str()),
            ("secid", request.secid.as_str()),
            ("beg", request.begin.as_str()),
            ("end", request.end.as_str()),
        ];

        let envelope: Envelope<KlineData> = self.get_json(&url, &params).await?;
        let data = envelope.data.unwrap_or_default();

        debug!(secid = %request.secid, count = data.klines.len(), "K-lines fetched");
        Ok(data)
    }

    /// 전종목 스냅샷 조회 (페이지 순회).
    ///
    /// # Arguments
    /// * `fs` - 시장 필터 (예: `m:0 t:6,m:1 t:2`)
    /// * `fields` - 요청할 필드 목록 (예: `f2,f3,f12,f14`)
    pub async fn fetch_clist(&self, fs: &str, fields: &str) -> Result<Vec<JsonRow>> {
        let url = format!("{}/api/qt/clist/get", self.push2_url);
        let page_size = CLIST_PAGE_SIZE.to_string();
        let mut rows: Vec<JsonRow> = Vec::new();

        for page in 1..=MAX_PAGES {
            let page_number = page.to_string();
            let params = [
                ("pn", page_number.as_str()),
                ("pz", page_size.as_str()),
                ("po", "1"),
                ("np", "1"),
                ("ut", CLIST_UT),
                ("fltt", "2"),
                ("invt", "2"),
                ("fid", "f12"),
                ("fs", fs),
                ("fields", fields),
            ];

            let envelope: Envelope<ClistData> = self.get_json(&url, &params).await?;
            let Some(data) = envelope.data else {
                break;
            };

            let received = data.diff.len();
            rows.extend(data.diff);

            if received == 0 || rows.len() >= data.total {
                break;
            }
        }

        debug!(fs = %fs, count = rows.len(), "Snapshot fetched");
        Ok(rows)
    }

    /// 개별 종목 시세 필드 조회.
    pub async fn fetch_quote(&self, secid: &str, fields: &str) -> Result<JsonRow> {
        let url = format!("{}/api/qt/stock/get", self.push2_url);
        let params = [
            ("ut", QUOTE_UT),
            ("invt", "2"),
            ("fltt", "2"),
            ("fields", fields),
            ("secid", secid),
        ];

        let envelope: Envelope<JsonRow> = self.get_json(&url, &params).await?;
        envelope
            .data
            .ok_or_else(|| DataError::NoData(secid.to_string()))
    }

    /// datacenter 보고서 조회 (최신순, 페이지 순회).
    pub async fn fetch_report(&self, report_name: &str) -> Result<Vec<JsonRow>> {
        let url = format!("{}/api/data/v1/get", self.datacenter_url);
        let page_size = REPORT_PAGE_SIZE.to_string();
        let mut rows: Vec<JsonRow> = Vec::new();

        for page in 1..=MAX_PAGES {
            let page_number = page.to_string();
            let params = [
                ("columns", "ALL"),
                ("pageNumber", page_number.as_str()),
                ("pageSize", page_size.as_str()),
                ("sortColumns", "REPORT_DATE"),
                ("sortTypes", "-1"),
                ("source", "WEB"),
                ("client", "WEB"),
                ("reportName", report_name),
            ];

            let envelope: ReportEnvelope = self.get_json(&url, &params).await?;
            let Some(result) = envelope.result else {
                break;
            };

            let received = result.data.len();
            rows.extend(result.data);

            if received == 0 || page >= result.pages {
                break;
            }
        }

        debug!(report = %report_name, count = rows.len(), "Report fetched");
        Ok(rows)
    }
}

/// 종목 코드 → `시장.코드` secid 변환.
///
/// - `1.600519`처럼 이미 secid 형식이면 그대로 사용
/// - `sh`/`sz`/`bj` 접두사는 해당 시장으로 매핑
/// - 그 외에는 첫 자리로 판단 (5/6/9: 상해, 나머지: 심천/북경)
pub fn secid_for_security(symbol: &str) -> String {
    let symbol = symbol.trim();
    if symbol.contains('.') {
        return symbol.to_string();
    }

    let lower = symbol.to_ascii_lowercase();
    if let Some(code) = lower.strip_prefix("sh") {
        return format!("1.{}", code);
    }
    if let Some(code) = lower.strip_prefix("sz").or_else(|| lower.strip_prefix("bj")) {
        return format!("0.{}", code);
    }

    match symbol.chars().next() {
        Some('5') | Some('6') | Some('9') => format!("1.{}", symbol),
        _ => format!("0.{}", symbol),
    }
}

/// 지수 코드 → secid 변환 (399로 시작하면 심천, 그 외 상해).
pub fn secid_for_index(symbol: &str) -> String {
    let symbol = symbol.trim();
    if symbol.contains('.') {
        return symbol.to_string();
    }

    let lower = symbol.to_ascii_lowercase();
    if let Some(code) = lower.strip_prefix("sh") {
        return format!("1.{}", code);
    }
    if let Some(code) = lower.strip_prefix("sz") {
        return format!("0.{}", code);
    }

    if symbol.starts_with("399") {
        format!("0.{}", symbol)
    } else {
        format!("1.{}", symbol)
    }
}

/// 숫자 필드를 셀로 변환. `-`나 빈 문자열은 결측.
pub fn number_cell(value: Option<&JsonValue>) -> Cell {
    match value {
        Some(JsonValue::Number(n)) => match n.as_i64() {
            Some(i) => Cell::Int(i),
            None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Null),
        },
        Some(JsonValue::String(s)) => parse_number_text(s),
        _ => Cell::Null,
    }
}

/// 텍스트 필드를 셀로 변환.
pub fn text_cell(value: Option<&JsonValue>) -> Cell {
    match value {
        Some(JsonValue::String(s)) if s.is_empty() || s == "-" => Cell::Null,
        Some(JsonValue::String(s)) => Cell::Text(s.clone()),
        Some(JsonValue::Number(n)) => Cell::Text(n.to_string()),
        Some(JsonValue::Bool(b)) => Cell::Bool(*b),
        _ => Cell::Null,
    }
}

/// 문자열로 온 숫자 파싱. 정수 우선, 실수 다음, 실패 시 결측.
pub fn parse_number_text(text: &str) -> Cell {
    let text = text.trim();
    if text.is_empty() || text == "-" {
        return Cell::Null;
    }
    if let Ok(i) = text.parse::<i64>() {
        return Cell::Int(i);
    }
    text.parse::<f64>().map(Cell::Float).unwrap_or(Cell::Null)
}

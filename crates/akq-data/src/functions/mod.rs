//! 등록 가능한 조회 함수 모음.
//!
//! ## 주식 (`stock`)
//! - `stock_zh_a_hist`: A주 일/주/월봉
//! - `stock_zh_a_spot_em`: A주 전종목 실시간 스냅샷
//! - `stock_individual_info_em`: 개별 종목 기본 정보 (시리즈)
//!
//! ## 펀드 (`fund`)
//! - `fund_etf_spot_em`: ETF 전종목 실시간 스냅샷
//! - `fund_etf_hist_em`: ETF 일/주/월봉
//!
//! ## 지수 (`index`)
//! - `index_zh_a_hist`: 지수 일/주/월봉
//!
//! ## 거시경제 (`macro_china`)
//! - `macro_china_cpi`, `macro_china_ppi`: 월별 물가 지표

pub mod fund;
pub mod index;
pub mod macro_china;
pub mod stock;

use std::sync::Arc;

use akq_core::{Cell, Table};
use chrono::NaiveDate;

use crate::error::{DataError, Result};
use crate::provider::eastmoney::{number_cell, parse_number_text, text_cell, EastmoneyClient, JsonRow};
use crate::registry::{FunctionRegistry, Signature};

/// 모든 함수의 시그니처 (네트워크 없이 도움말 출력용).
pub fn catalog() -> Vec<&'static Signature> {
    let mut signatures = vec![
        &stock::STOCK_ZH_A_HIST,
        &stock::STOCK_ZH_A_SPOT_EM,
        &stock::STOCK_INDIVIDUAL_INFO_EM,
        &fund::FUND_ETF_SPOT_EM,
        &fund::FUND_ETF_HIST_EM,
        &index::INDEX_ZH_A_HIST,
        &macro_china::MACRO_CHINA_CPI,
        &macro_china::MACRO_CHINA_PPI,
    ];
    signatures.sort_by_key(|s| s.name);
    signatures
}

/// Eastmoney 기반 함수를 모두 등록합니다.
pub fn register_all(registry: &mut FunctionRegistry, client: Arc<EastmoneyClient>) {
    registry.register(Arc::new(stock::StockZhAHist::new(client.clone())));
    registry.register(Arc::new(stock::StockZhASpotEm::new(client.clone())));
    registry.register(Arc::new(stock::StockIndividualInfoEm::new(client.clone())));
    registry.register(Arc::new(fund::FundEtfSpotEm::new(client.clone())));
    registry.register(Arc::new(fund::FundEtfHistEm::new(client.clone())));
    registry.register(Arc::new(index::IndexZhAHist::new(client.clone())));
    registry.register(Arc::new(macro_china::MacroChinaCpi::new(client.clone())));
    registry.register(Arc::new(macro_china::MacroChinaPpi::new(client)));
}

/// 주기 이름 → K선 주기 코드.
pub(crate) fn klt_for_period(period: &str) -> Result<u16> {
    match period {
        "daily" => Ok(101),
        "weekly" => Ok(102),
        "monthly" => Ok(103),
        other => Err(DataError::InvalidArgument(format!(
            "period must be one of 'daily', 'weekly', 'monthly', got '{}'",
            other
        ))),
    }
}

/// 수정주가 이름 → 수정 코드.
pub(crate) fn fqt_for_adjust(adjust: &str) -> Result<u8> {
    match adjust {
        "" => Ok(0),
        "qfq" => Ok(1),
        "hfq" => Ok(2),
        other => Err(DataError::InvalidArgument(format!(
            "adjust must be one of '', 'qfq', 'hfq', got '{}'",
            other
        ))),
    }
}

/// 날짜 인자를 `YYYYMMDD`로 정규화 (`YYYY-MM-DD`도 허용).
pub(crate) fn normalize_date(name: &str, text: &str) -> Result<String> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .map(|date| date.format("%Y%m%d").to_string())
        .map_err(|_| {
            DataError::InvalidArgument(format!(
                "{} must be a date like 20240101, got '{}'",
                name, text
            ))
        })
}

/// K선 컬럼 (API 필드 순서와 동일)
pub(crate) const BAR_COLUMNS: [&str; 11] = [
    "日期", "开盘", "收盘", "最高", "最低", "成交量", "成交额", "振幅", "涨跌幅", "涨跌额", "换手率",
];

/// K선 문자열 목록 → 표.
///
/// `code`가 주어지면 `(컬럼명, 값)`을 날짜 다음 컬럼으로 넣습니다.
/// 필드 수가 모자란 행은 건너뜁니다.
pub(crate) fn bars_table(klines: &[String], code: Option<(&str, &str)>) -> Result<Table> {
    let mut columns: Vec<&str> = vec![BAR_COLUMNS[0]];
    if let Some((column, _)) = code {
        columns.push(column);
    }
    columns.extend_from_slice(&BAR_COLUMNS[1..]);

    let mut table = Table::new(columns)?;

    for line in klines {
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < BAR_COLUMNS.len() {
            tracing::warn!(line = %line, "Skipping malformed K-line");
            continue;
        }

        let mut row = Vec::with_capacity(table.column_count());
        row.push(Cell::Text(parts[0].to_string()));
        if let Some((_, value)) = code {
            row.push(Cell::Text(value.to_string()));
        }
        for (i, part) in parts[1..BAR_COLUMNS.len()].iter().enumerate() {
            let cell = parse_number_text(part);
            // 거래량만 정수, 나머지는 실수
            row.push(if i == 4 { cell } else { as_float(cell) });
        }
        table.push_row(row)?;
    }

    Ok(table)
}

fn as_float(cell: Cell) -> Cell {
    match cell {
        Cell::Int(i) => Cell::Float(i as f64),
        other => other,
    }
}

/// JSON 필드 → 컬럼 매핑.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Column {
    pub name: &'static str,
    pub field: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Number,
}

impl Column {
    pub const fn text(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            field,
            kind: FieldKind::Text,
        }
    }

    pub const fn number(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            field,
            kind: FieldKind::Number,
        }
    }

    pub(crate) fn cell(&self, row: &JsonRow) -> Cell {
        match self.kind {
            FieldKind::Text => text_cell(row.get(self.field)),
            FieldKind::Number => number_cell(row.get(self.field)),
        }
    }
}

/// 요청 필드 목록 (`f2,f3,...`, 중복 제거)
pub(crate) fn field_list(columns: &[Column]) -> String {
    let mut fields: Vec<&str> = Vec::with_capacity(columns.len());
    for column in columns {
        if !fields.contains(&column.field) {
            fields.push(column.field);
        }
    }
    fields.join(",")
}

/// JSON 행 목록 → 표. `with_index`이면 1부터 시작하는 `序号` 컬럼을 앞에 둡니다.
pub(crate) fn rows_table(rows: &[JsonRow], columns: &[Column], with_index: bool) -> Result<Table> {
    let mut names: Vec<&str> = Vec::with_capacity(columns.len() + 1);
    if with_index {
        names.push("序号");
    }
    names.extend(columns.iter().map(|c| c.name));

    let mut table = Table::new(names)?;
    for (i, row) in rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(table.column_count());
        if with_index {
            cells.push(Cell::Int(i as i64 + 1));
        }
        cells.extend(columns.iter().map(|c| c.cell(row)));
        table.push_row(cells)?;
    }

    Ok(table)
}

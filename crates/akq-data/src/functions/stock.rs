//! A주 조회 함수.

use std::sync::Arc;

use akq_core::{QueryResult, Series};
use async_trait::async_trait;
use tracing::info;

use super::{bars_table, field_list, fqt_for_adjust, klt_for_period, normalize_date, rows_table, Column};
use crate::error::Result;
use crate::provider::eastmoney::{secid_for_security, EastmoneyClient, KlineRequest};
use crate::registry::{BoundArgs, Param, ParamKind, QueryFunction, Signature};

/// A주 전종목 시장 필터 (심천 주판/창업판, 상해 주판/과창판, 북경)
const A_SHARE_FS: &str = "m:0 t:6,m:0 t:80,m:1 t:2,m:1 t:23,m:0 t:81 s:2048";

pub static STOCK_ZH_A_HIST: Signature = Signature {
    name: "stock_zh_a_hist",
    summary: "A-share daily/weekly/monthly bars",
    params: &[
        Param::required("symbol", ParamKind::Str),
        Param::optional("period", ParamKind::Str, "daily"),
        Param::optional("start_date", ParamKind::Str, "19700101"),
        Param::optional("end_date", ParamKind::Str, "20500101"),
        Param::optional("adjust", ParamKind::Str, ""),
    ],
};

pub static STOCK_ZH_A_SPOT_EM: Signature = Signature {
    name: "stock_zh_a_spot_em",
    summary: "A-share real-time snapshot of all listed stocks",
    params: &[],
};

pub static STOCK_INDIVIDUAL_INFO_EM: Signature = Signature {
    name: "stock_individual_info_em",
    summary: "Basic facts of a single stock (labelled series)",
    params: &[Param::required("symbol", ParamKind::Str)],
};

const SPOT_COLUMNS: &[Column] = &[
    Column::text("代码", "f12"),
    Column::text("名称", "f14"),
    Column::number("最新价", "f2"),
    Column::number("涨跌幅", "f3"),
    Column::number("涨跌额", "f4"),
    Column::number("成交量", "f5"),
    Column::number("成交额", "f6"),
    Column::number("振幅", "f7"),
    Column::number("最高", "f15"),
    Column::number("最低", "f16"),
    Column::number("今开", "f17"),
    Column::number("昨收", "f18"),
    Column::number("量比", "f10"),
    Column::number("换手率", "f8"),
    Column::number("市盈率-动态", "f9"),
    Column::number("市净率", "f23"),
    Column::number("总市值", "f20"),
    Column::number("流通市值", "f21"),
    Column::number("涨速", "f22"),
    Column::number("5分钟涨跌", "f11"),
    Column::number("60日涨跌幅", "f24"),
    Column::number("年初至今涨跌幅", "f25"),
];

const INFO_COLUMNS: &[Column] = &[
    Column::number("最新", "f43"),
    Column::text("股票代码", "f57"),
    Column::text("股票简称", "f58"),
    Column::number("总股本", "f84"),
    Column::number("流通股", "f85"),
    Column::number("总市值", "f116"),
    Column::number("流通市值", "f117"),
    Column::text("行业", "f127"),
    Column::number("上市时间", "f189"),
];

/// `stock_zh_a_hist`: A주 K선.
pub struct StockZhAHist {
    client: Arc<EastmoneyClient>,
}

impl StockZhAHist {
    pub fn new(client: Arc<EastmoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueryFunction for StockZhAHist {
    fn signature(&self) -> &'static Signature {
        &STOCK_ZH_A_HIST
    }

    async fn call(&self, args: &BoundArgs) -> Result<QueryResult> {
        let symbol = args.str("symbol")?;
        let request = KlineRequest {
            secid: secid_for_security(symbol),
            klt: klt_for_period(args.str("period")?)?,
            fqt: fqt_for_adjust(args.str("adjust")?)?,
            begin: normalize_date("start_date", args.str("start_date")?)?,
            end: normalize_date("end_date", args.str("end_date")?)?,
        };

        let data = self.client.fetch_klines(&request).await?;
        let table = bars_table(&data.klines, Some(("股票代码", symbol)))?;

        info!(symbol = %symbol, rows = table.row_count(), "A-share bars fetched");
        Ok(table.into())
    }
}

/// `stock_zh_a_spot_em`: A주 전종목 스냅샷.
pub struct StockZhASpotEm {
    client: Arc<EastmoneyClient>,
}

impl StockZhASpotEm {
    pub fn new(client: Arc<EastmoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueryFunction for StockZhASpotEm {
    fn signature(&self) -> &'static Signature {
        &STOCK_ZH_A_SPOT_EM
    }

    async fn call(&self, _args: &BoundArgs) -> Result<QueryResult> {
        let rows = self
            .client
            .fetch_clist(A_SHARE_FS, &field_list(SPOT_COLUMNS))
            .await?;
        Ok(rows_table(&rows, SPOT_COLUMNS, true)?.into())
    }
}

/// `stock_individual_info_em`: 개별 종목 기본 정보.
pub struct StockIndividualInfoEm {
    client: Arc<EastmoneyClient>,
}

impl StockIndividualInfoEm {
    pub fn new(client: Arc<EastmoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueryFunction for StockIndividualInfoEm {
    fn signature(&self) -> &'static Signature {
        &STOCK_INDIVIDUAL_INFO_EM
    }

    async fn call(&self, args: &BoundArgs) -> Result<QueryResult> {
        let symbol = args.str("symbol")?;
        let quote = self
            .client
            .fetch_quote(&secid_for_security(symbol), &field_list(INFO_COLUMNS))
            .await?;

        let mut series = Series::new(Some(symbol.to_string()));
        for column in INFO_COLUMNS {
            series.push(column.name, column.cell(&quote));
        }

        Ok(series.into())
    }
}

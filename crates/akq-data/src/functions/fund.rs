//! ETF 조회 함수.

use std::sync::Arc;

use akq_core::QueryResult;
use async_trait::async_trait;

use super::{bars_table, field_list, fqt_for_adjust, klt_for_period, normalize_date, rows_table, Column};
use crate::error::Result;
use crate::provider::eastmoney::{secid_for_security, EastmoneyClient, KlineRequest};
use crate::registry::{BoundArgs, Param, ParamKind, QueryFunction, Signature};

/// 상장 ETF 시장 필터
const ETF_FS: &str = "b:MK0021,b:MK0022,b:MK0023,b:MK0024";

pub static FUND_ETF_SPOT_EM: Signature = Signature {
    name: "fund_etf_spot_em",
    summary: "ETF real-time snapshot",
    params: &[],
};

pub static FUND_ETF_HIST_EM: Signature = Signature {
    name: "fund_etf_hist_em",
    summary: "ETF daily/weekly/monthly bars",
    params: &[
        Param::required("symbol", ParamKind::Str),
        Param::optional("period", ParamKind::Str, "daily"),
        Param::optional("start_date", ParamKind::Str, "19700101"),
        Param::optional("end_date", ParamKind::Str, "20500101"),
        Param::optional("adjust", ParamKind::Str, ""),
    ],
};

const ETF_COLUMNS: &[Column] = &[
    Column::text("代码", "f12"),
    Column::text("名称", "f14"),
    Column::number("最新价", "f2"),
    Column::number("涨跌额", "f4"),
    Column::number("涨跌幅", "f3"),
    Column::number("成交量", "f5"),
    Column::number("成交额", "f6"),
    Column::number("开盘价", "f17"),
    Column::number("最高价", "f15"),
    Column::number("最低价", "f16"),
    Column::number("昨收", "f18"),
    Column::number("换手率", "f8"),
    Column::number("量比", "f10"),
    Column::number("流通市值", "f21"),
    Column::number("总市值", "f20"),
];

/// `fund_etf_spot_em`: ETF 전종목 스냅샷.
pub struct FundEtfSpotEm {
    client: Arc<EastmoneyClient>,
}

impl FundEtfSpotEm {
    pub fn new(client: Arc<EastmoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueryFunction for FundEtfSpotEm {
    fn signature(&self) -> &'static Signature {
        &FUND_ETF_SPOT_EM
    }

    async fn call(&self, _args: &BoundArgs) -> Result<QueryResult> {
        let rows = self
            .client
            .fetch_clist(ETF_FS, &field_list(ETF_COLUMNS))
            .await?;
        Ok(rows_table(&rows, ETF_COLUMNS, false)?.into())
    }
}

/// `fund_etf_hist_em`: ETF K선.
pub struct FundEtfHistEm {
    client: Arc<EastmoneyClient>,
}

impl FundEtfHistEm {
    pub fn new(client: Arc<EastmoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueryFunction for FundEtfHistEm {
    fn signature(&self) -> &'static Signature {
        &FUND_ETF_HIST_EM
    }

    async fn call(&self, args: &BoundArgs) -> Result<QueryResult> {
        let request = KlineRequest {
            secid: secid_for_security(args.str("symbol")?),
            klt: klt_for_period(args.str("period")?)?,
            fqt: fqt_for_adjust(args.str("adjust")?)?,
            begin: normalize_date("start_date", args.str("start_date")?)?,
            end: normalize_date("end_date", args.str("end_date")?)?,
        };

        let data = self.client.fetch_klines(&request).await?;
        Ok(bars_table(&data.klines, None)?.into())
    }
}

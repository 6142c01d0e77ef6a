//! 지수 조회 함수.

use std::sync::Arc;

use akq_core::QueryResult;
use async_trait::async_trait;
use tracing::info;

use super::{bars_table, klt_for_period, normalize_date};
use crate::error::Result;
use crate::provider::eastmoney::{secid_for_index, EastmoneyClient, KlineRequest};
use crate::registry::{BoundArgs, Param, ParamKind, QueryFunction, Signature};

pub static INDEX_ZH_A_HIST: Signature = Signature {
    name: "index_zh_a_hist",
    summary: "China index daily/weekly/monthly bars",
    params: &[
        Param::required("symbol", ParamKind::Str),
        Param::optional("period", ParamKind::Str, "daily"),
        Param::optional("start_date", ParamKind::Str, "19700101"),
        Param::optional("end_date", ParamKind::Str, "22220101"),
    ],
};

/// `index_zh_a_hist`: 지수 K선 (수정주가 없음).
pub struct IndexZhAHist {
    client: Arc<EastmoneyClient>,
}

impl IndexZhAHist {
    pub fn new(client: Arc<EastmoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueryFunction for IndexZhAHist {
    fn signature(&self) -> &'static Signature {
        &INDEX_ZH_A_HIST
    }

    async fn call(&self, args: &BoundArgs) -> Result<QueryResult> {
        let symbol = args.str("symbol")?;
        let request = KlineRequest {
            secid: secid_for_index(symbol),
            klt: klt_for_period(args.str("period")?)?,
            fqt: 0,
            begin: normalize_date("start_date", args.str("start_date")?)?,
            end: normalize_date("end_date", args.str("end_date")?)?,
        };

        let data = self.client.fetch_klines(&request).await?;
        let table = bars_table(&data.klines, None)?;

        info!(symbol = %symbol, rows = table.row_count(), "Index bars fetched");
        Ok(table.into())
    }
}

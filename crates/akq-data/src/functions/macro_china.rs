//! 중국 거시경제 지표 조회 함수.

use std::sync::Arc;

use akq_core::QueryResult;
use async_trait::async_trait;

use super::{rows_table, Column};
use crate::error::Result;
use crate::provider::eastmoney::EastmoneyClient;
use crate::registry::{BoundArgs, QueryFunction, Signature};

pub static MACRO_CHINA_CPI: Signature = Signature {
    name: "macro_china_cpi",
    summary: "China monthly consumer price index",
    params: &[],
};

pub static MACRO_CHINA_PPI: Signature = Signature {
    name: "macro_china_ppi",
    summary: "China monthly producer price index",
    params: &[],
};

const CPI_COLUMNS: &[Column] = &[
    Column::text("月份", "TIME"),
    Column::number("全国-当月", "NATIONAL_BASE"),
    Column::number("全国-同比增长", "NATIONAL_SAME"),
    Column::number("全国-环比增长", "NATIONAL_SEQUENTIAL"),
    Column::number("全国-累计", "NATIONAL_ACCUMULATE"),
    Column::number("城市-当月", "CITY_BASE"),
    Column::number("城市-同比增长", "CITY_SAME"),
    Column::number("城市-环比增长", "CITY_SEQUENTIAL"),
    Column::number("城市-累计", "CITY_ACCUMULATE"),
    Column::number("农村-当月", "RURAL_BASE"),
    Column::number("农村-同比增长", "RURAL_SAME"),
    Column::number("农村-环比增长", "RURAL_SEQUENTIAL"),
    Column::number("农村-累计", "RURAL_ACCUMULATE"),
];

const PPI_COLUMNS: &[Column] = &[
    Column::text("月份", "TIME"),
    Column::number("当月", "BASE"),
    Column::number("当月同比增长", "BASE_SAME"),
    Column::number("累计", "BASE_ACCUMULATE"),
];

/// 보고서 하나를 표로 옮기는 조회 함수.
struct ReportQuery {
    client: Arc<EastmoneyClient>,
    report: &'static str,
    columns: &'static [Column],
}

impl ReportQuery {
    async fn run(&self) -> Result<QueryResult> {
        let rows = self.client.fetch_report(self.report).await?;
        Ok(rows_table(&rows, self.columns, false)?.into())
    }
}

/// `macro_china_cpi`: 월별 CPI.
pub struct MacroChinaCpi(ReportQuery);

impl MacroChinaCpi {
    pub fn new(client: Arc<EastmoneyClient>) -> Self {
        Self(ReportQuery {
            client,
            report: "RPT_ECONOMY_CPI",
            columns: CPI_COLUMNS,
        })
    }
}

#[async_trait]
impl QueryFunction for MacroChinaCpi {
    fn signature(&self) -> &'static Signature {
        &MACRO_CHINA_CPI
    }

    async fn call(&self, _args: &BoundArgs) -> Result<QueryResult> {
        self.0.run().await
    }
}

/// `macro_china_ppi`: 월별 PPI.
pub struct MacroChinaPpi(ReportQuery);

impl MacroChinaPpi {
    pub fn new(client: Arc<EastmoneyClient>) -> Self {
        Self(ReportQuery {
            client,
            report: "RPT_ECONOMY_PPI",
            columns: PPI_COLUMNS,
        })
    }
}

#[async_trait]
impl QueryFunction for MacroChinaPpi {
    fn signature(&self) -> &'static Signature {
        &MACRO_CHINA_PPI
    }

    async fn call(&self, _args: &BoundArgs) -> Result<QueryResult> {
        self.0.run().await
    }
}

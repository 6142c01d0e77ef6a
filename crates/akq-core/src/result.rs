//! 조회 결과 모델.
//!
//! 데이터 함수는 다음 중 하나를 반환합니다:
//! - [`Table`]: 이름 있는 컬럼 위의 순서 있는 행
//! - [`Series`]: 라벨이 붙은 1차원 시퀀스
//! - 단일 값 또는 불투명한 텍스트

use std::fmt;

use crate::error::{CoreError, Result};

/// 표의 셀 값.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// 값 없음 (결측)
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NaN"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// 이름 있는 컬럼과 순서 있는 행으로 이루어진 표.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// 빈 표 생성.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for column in columns {
            let column = column.into();
            if names.contains(&column) {
                return Err(CoreError::DuplicateColumn(column));
            }
            names.push(column);
        }

        Ok(Self {
            columns: names,
            rows: Vec::new(),
        })
    }

    /// 행 추가. 셀 수가 컬럼 수와 같아야 합니다.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(CoreError::RowWidth {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 컬럼 인덱스 조회
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// 앞에서 `n`행만 남깁니다.
    ///
    /// 음수이면 뒤에서 `|n|`행을 제외한 나머지를 남깁니다.
    pub fn head(mut self, n: i64) -> Self {
        let keep = keep_count(self.rows.len(), n);
        self.rows.truncate(keep);
        self
    }

    /// 뒤에서 `n`행만 남깁니다.
    ///
    /// 음수이면 앞에서 `|n|`행을 제외한 나머지를 남깁니다.
    pub fn tail(mut self, n: i64) -> Self {
        let keep = keep_count(self.rows.len(), n);
        let skip = self.rows.len() - keep;
        self.rows.drain(..skip);
        self
    }
}

/// head/tail에서 남길 행 수 계산.
fn keep_count(len: usize, n: i64) -> usize {
    let magnitude = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX);
    if n >= 0 {
        magnitude.min(len)
    } else {
        len.saturating_sub(magnitude)
    }
}

/// 라벨이 붙은 1차원 시퀀스.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    /// 시퀀스 이름
    pub name: Option<String>,
    entries: Vec<(String, Cell)>,
}

impl Series {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl Into<Cell>) {
        self.entries.push((label.into(), value.into()));
    }

    pub fn entries(&self) -> &[(String, Cell)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 데이터 함수 호출 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Table(Table),
    Series(Series),
    Scalar(Cell),
    Text(String),
}

impl QueryResult {
    /// 결과 종류 이름 (로그용)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::Series(_) => "series",
            Self::Scalar(_) => "scalar",
            Self::Text(_) => "text",
        }
    }
}

impl From<Table> for QueryResult {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<Series> for QueryResult {
    fn from(series: Series) -> Self {
        Self::Series(series)
    }
}

//! 조회 결과 출력과 CSV 저장.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use akq_core::{Cell, DisplayOptions, QueryResult, Series, Table};
use anyhow::Context;
use unicode_width::UnicodeWidthStr;

/// 실수 표시 최대 소수 자릿수
const FLOAT_PRECISION: usize = 6;

/// Excel 호환용 UTF-8 BOM
const UTF8_BOM: &str = "\u{FEFF}";

/// 결과를 사람이 읽을 수 있는 텍스트로 변환합니다.
pub fn render(result: &QueryResult, options: &DisplayOptions) -> String {
    match result {
        QueryResult::Table(table) => render_table(table, options),
        QueryResult::Series(series) => render_series(series),
        QueryResult::Scalar(cell) => cell.to_string(),
        QueryResult::Text(text) => text.clone(),
    }
}

/// 표를 오른쪽 정렬된 텍스트 컬럼으로 변환 (인덱스 없음).
pub fn render_table(table: &Table, options: &DisplayOptions) -> String {
    if table.is_empty() {
        return format!(
            "Empty DataFrame\nColumns: [{}]\nIndex: []",
            table.columns().join(", ")
        );
    }

    let columns: Vec<Vec<String>> = (0..table.column_count())
        .map(|c| format_column(table, c, options.max_colwidth))
        .collect();

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .zip(&columns)
        .map(|(name, cells)| {
            cells
                .iter()
                .map(|s| s.width())
                .chain(std::iter::once(name.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(table.row_count() + 1);
    lines.push(join_padded(table.columns().iter().map(String::as_str), &widths));
    for r in 0..table.row_count() {
        lines.push(join_padded(columns.iter().map(|cells| cells[r].as_str()), &widths));
    }

    lines.join("\n")
}

/// 시리즈를 `라벨    값` 형태로 변환 (라벨 왼쪽 정렬, 값 오른쪽 정렬).
pub fn render_series(series: &Series) -> String {
    if series.is_empty() {
        return "Series([], )".to_string();
    }

    let values: Vec<String> = series.entries().iter().map(|(_, v)| v.to_string()).collect();
    let label_width = series
        .entries()
        .iter()
        .map(|(label, _)| label.width())
        .max()
        .unwrap_or(0);
    let value_width = values.iter().map(|v| v.width()).max().unwrap_or(0);

    series
        .entries()
        .iter()
        .zip(&values)
        .map(|((label, _), value)| {
            format!(
                "{}{}    {}{}",
                label,
                padding(label, label_width),
                padding(value, value_width),
                value
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 한 컬럼의 셀 문자열 목록.
///
/// 숫자 컬럼에 실수나 결측이 섞여 있으면 모든 값을 같은 소수 자릿수로 맞춥니다.
/// 반올림하면 0이 되는 값이 있으면 컬럼 전체를 지수 표기로 씁니다.
fn format_column(table: &Table, column: usize, max_colwidth: usize) -> Vec<String> {
    let cells: Vec<&Cell> = table.rows().iter().map(|row| &row[column]).collect();

    let numeric = cells
        .iter()
        .all(|c| matches!(c, Cell::Null | Cell::Int(_) | Cell::Float(_)));
    let fractional = cells.iter().any(|c| matches!(c, Cell::Null | Cell::Float(_)));
    let has_number = cells.iter().any(|c| !c.is_null());

    if numeric && fractional && has_number {
        let vanishes = cells
            .iter()
            .filter_map(|c| c.as_f64())
            .any(rounds_to_zero);
        if vanishes {
            return cells
                .iter()
                .map(|c| match c.as_f64() {
                    Some(x) if x.is_nan() => "NaN".to_string(),
                    Some(x) if x.is_finite() => format!("{:e}", x),
                    Some(x) => x.to_string(),
                    None => "NaN".to_string(),
                })
                .collect();
        }

        let decimals = cells
            .iter()
            .filter_map(|c| c.as_f64())
            .map(decimals_needed)
            .max()
            .unwrap_or(1)
            .max(1);
        return cells
            .iter()
            .map(|c| match c.as_f64() {
                Some(x) if x.is_finite() => format!("{:.*}", decimals, x),
                Some(x) if x.is_nan() => "NaN".to_string(),
                Some(x) => x.to_string(),
                None => "NaN".to_string(),
            })
            .collect();
    }

    cells
        .iter()
        .map(|c| truncate_cell(c.to_string(), max_colwidth))
        .collect()
}

/// 소수점 이하 6자리 반올림 후 끝의 0을 뺀 자릿수
fn decimals_needed(x: f64) -> usize {
    if !x.is_finite() {
        return 0;
    }
    let text = format!("{:.*}", FLOAT_PRECISION, x);
    match text.split_once('.') {
        Some((_, fraction)) => fraction.trim_end_matches('0').len(),
        None => 0,
    }
}

/// 0이 아닌 유한값이 소수점 이하 6자리 반올림으로 0이 되는지
fn rounds_to_zero(x: f64) -> bool {
    x.is_finite()
        && x != 0.0
        && format!("{:.*}", FLOAT_PRECISION, x).parse::<f64>() == Ok(0.0)
}

/// 표시 폭이 `max_width`를 넘으면 잘라내고 `...`을 붙입니다. 0이면 제한 없음.
fn truncate_cell(text: String, max_width: usize) -> String {
    if max_width == 0 || text.width() <= max_width {
        return text;
    }

    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut truncated = String::new();
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        truncated.push(ch);
    }
    truncated.push_str("...");
    truncated
}

fn padding(text: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(text.width()))
}

fn join_padded<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{}{}", padding(cell, width), cell))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 표를 CSV로 저장하고 기록한 데이터 행 수를 반환합니다.
///
/// 헤더 포함, 인덱스 없음, UTF-8 BOM, `\n` 줄바꿈. 상위 디렉터리가 없으면 만듭니다.
pub fn save_csv(table: &Table, path: &Path) -> anyhow::Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create directory {}", parent.display()))?;
        }
    }

    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    write!(writer, "{}", UTF8_BOM)?;
    let header: Vec<String> = table.columns().iter().map(|c| escape_csv(c)).collect();
    writeln!(writer, "{}", header.join(","))?;

    for row in table.rows() {
        let fields: Vec<String> = row.iter().map(csv_field).collect();
        writeln!(writer, "{}", fields.join(","))?;
    }

    writer
        .flush()
        .with_context(|| format!("cannot write {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = table.row_count(), "CSV saved");
    Ok(table.row_count())
}

fn csv_field(cell: &Cell) -> String {
    match cell {
        Cell::Null => String::new(),
        Cell::Bool(b) => b.to_string(),
        Cell::Int(n) => n.to_string(),
        Cell::Float(x) if x.is_nan() => String::new(),
        Cell::Float(x) => format!("{:?}", x),
        Cell::Text(s) => escape_csv(s),
    }
}

/// CSV 필드 이스케이프
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars() -> Table {
        let mut table = Table::new(["日期", "收盘", "成交量"]).unwrap();
        table
            .push_row(vec!["2024-01-02".into(), Cell::Float(9.21), Cell::Int(1158366)])
            .unwrap();
        table
            .push_row(vec!["2024-01-03".into(), Cell::Float(9.2), Cell::Int(733610)])
            .unwrap();
        table
    }

    #[test]
    fn test_render_table_right_aligned() {
        let text = render_table(&bars(), &DisplayOptions::default());
        let lines: Vec<&str> = text.lines().collect();

        // "日期"는 표시 폭 4
        assert_eq!(lines[0], "      日期 收盘  成交量");
        assert_eq!(lines[1], "2024-01-02 9.21 1158366");
        assert_eq!(lines[2], "2024-01-03 9.20  733610");
    }

    #[test]
    fn test_float_column_with_nulls() {
        let mut table = Table::new(["x"]).unwrap();
        table.push_row(vec![Cell::Int(1)]).unwrap();
        table.push_row(vec![Cell::Null]).unwrap();
        table.push_row(vec![Cell::Float(0.125)]).unwrap();

        let text = render_table(&table, &DisplayOptions::default());
        assert_eq!(text, "    x\n1.000\n  NaN\n0.125");
    }

    #[test]
    fn test_tiny_values_use_exponent() {
        let mut table = Table::new(["x"]).unwrap();
        table.push_row(vec![Cell::Float(1e-7)]).unwrap();
        table.push_row(vec![Cell::Null]).unwrap();
        table.push_row(vec![Cell::Float(0.25)]).unwrap();

        let text = render_table(&table, &DisplayOptions::default());
        assert_eq!(text, "     x\n  1e-7\n   NaN\n2.5e-1");

        let mut zeros = Table::new(["x"]).unwrap();
        zeros.push_row(vec![Cell::Float(0.0)]).unwrap();
        zeros.push_row(vec![Cell::Float(-0.5)]).unwrap();
        let text = render_table(&zeros, &DisplayOptions::default());
        assert_eq!(text, "   x\n 0.0\n-0.5");
    }

    #[test]
    fn test_long_cells_truncated() {
        let mut table = Table::new(["name"]).unwrap();
        table.push_row(vec!["abcdefghijkl".into()]).unwrap();

        let text = render_table(&table, &DisplayOptions { max_colwidth: 8 });
        assert_eq!(text, "    name\nabcde...");
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new(["a", "b"]).unwrap();
        assert_eq!(
            render_table(&table, &DisplayOptions::default()),
            "Empty DataFrame\nColumns: [a, b]\nIndex: []"
        );
    }

    #[test]
    fn test_render_series() {
        let mut series = Series::new(Some("600519".into()));
        series.push("股票简称", "贵州茅台");
        series.push("总股本", Cell::Int(1256197800));
        series.push("行业", Cell::Null);

        let text = render(&QueryResult::Series(series), &DisplayOptions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "股票简称      贵州茅台");
        assert_eq!(lines[1], "总股本      1256197800");
        assert_eq!(lines[2], "行业               NaN");
    }

    #[test]
    fn test_scalar_and_text() {
        let options = DisplayOptions::default();
        assert_eq!(render(&QueryResult::Scalar(Cell::Float(1.5)), &options), "1.5");
        assert_eq!(render(&QueryResult::Text("ok".into()), &options), "ok");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_save_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");

        let mut table = bars();
        table
            .push_row(vec!["a,b".into(), Cell::Null, Cell::Int(0)])
            .unwrap();

        let rows = save_csv(&table, &path).unwrap();
        assert_eq!(rows, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('\u{FEFF}'));
        let lines: Vec<&str> = content.trim_start_matches('\u{FEFF}').lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "日期,收盘,成交量");
        assert_eq!(lines[1], "2024-01-02,9.21,1158366");
        assert_eq!(lines[3], "\"a,b\",,0");
    }

    #[test]
    fn test_bool_cells_match_display() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.csv");

        let mut table = Table::new(["flag"]).unwrap();
        table.push_row(vec![Cell::Bool(true)]).unwrap();
        table.push_row(vec![Cell::Bool(false)]).unwrap();

        save_csv(&table, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\u{FEFF}flag\ntrue\nfalse\n");

        let text = render_table(&table, &DisplayOptions::default());
        assert_eq!(text, " flag\n true\nfalse");
    }
}

//! 사용법 출력 (설정 로드나 네트워크 없이 동작).

use akq_data::catalog;

const USAGE: &str = "\
akq - query financial data functions from the command line

Usage:
  akq <function_name> [key=value ...] [--save <path>] [--head <N>] [--tail <N>]
  akq -h | --help
  akq --version

Options:
  --save <path>   save a table result as CSV (UTF-8 with BOM)
  --head <N>      keep the first N rows (takes precedence over --tail)
  --tail <N>      keep the last N rows

Values are converted automatically: true/false -> boolean, then integer,
then float, otherwise string. String parameters receive the text as typed,
so symbol=000001 keeps its leading zeros.

Examples:
  akq stock_zh_a_hist symbol=000001 period=daily start_date=20240101 end_date=20241231 adjust=qfq
  akq stock_zh_a_spot_em --head 20
  akq macro_china_cpi --save cpi_data.csv
  akq fund_etf_spot_em --head 10
";

/// 사용법과 함수 목록
pub fn usage_text() -> String {
    let mut text = String::from(USAGE);
    text.push_str("\nFunctions:\n");

    for signature in catalog() {
        text.push_str(&format!("  {}\n      {}\n", signature, signature.summary));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_lists_functions() {
        let text = usage_text();
        assert!(text.starts_with("akq - "));
        assert!(text.contains("--save <path>"));
        assert!(text.contains(
            "stock_zh_a_hist(symbol, period=\"daily\", start_date=\"19700101\", end_date=\"20500101\", adjust=\"\")"
        ));
        assert!(text.contains("  macro_china_cpi()\n"));
    }
}

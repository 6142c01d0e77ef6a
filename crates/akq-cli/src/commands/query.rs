//! 조회 명령: 함수 조회 → 인자 바인딩 → 호출 → 출력/저장.

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use akq_core::{Arguments, DisplayOptions, QueryResult};
use akq_data::{DataError, FunctionRegistry, ParamError, ParamKind, Signature};
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tracing::{debug, warn};

use crate::output::{render, render_table, save_csv};
use crate::request::{InvocationRequest, RequestError};

/// 함수 이름을 찾지 못했을 때 안내
pub const FUNCTION_HINT: &str =
    "hint: check the function name, see https://akshare.akfamily.xyz/data/index.html";

/// CLI 실행 오류. 모두 종료 코드 1로 끝납니다.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("error: {0}")]
    Request(#[from] RequestError),

    #[error("error: provider unavailable: {0}")]
    Unavailable(String),

    #[error("error: function '{0}' not found in provider")]
    UnknownFunction(String),

    #[error("parameter error: {0}")]
    Parameter(#[from] ParamError),

    #[error("query failed: {}: {}", .0.kind(), .0)]
    Invocation(DataError),

    #[error("error: failed to save {path}: {reason}")]
    Save { path: String, reason: String },

    #[error("error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// 오류 메시지 다음에 출력할 안내 문구
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownFunction(_) => Some(FUNCTION_HINT),
            _ => None,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}

/// 조회 명령 실행.
///
/// 결과는 `out`, 진행 메시지와 요약은 `err`에 씁니다.
pub async fn run_query<O: Write, E: Write>(
    registry: &FunctionRegistry,
    request: &InvocationRequest,
    display: &DisplayOptions,
    out: &mut O,
    err: &mut E,
) -> Result<(), CliError> {
    let function = registry
        .resolve(&request.function)
        .ok_or_else(|| CliError::UnknownFunction(request.function.clone()))?;
    let signature = function.signature();

    writeln!(err, "calling: {}", call_echo(signature, &request.args))?;
    let bound = signature.bind(&request.args)?;
    debug!(function = signature.name, args = ?bound, "Invoking query function");

    let spinner = spinner(signature.name);
    let outcome = function.call(&bound).await;
    spinner.finish_and_clear();
    let result = outcome.map_err(CliError::Invocation)?;

    match result {
        QueryResult::Table(table) => {
            let table = request.truncate(table);

            if let Some(path) = &request.save {
                let rows = save_csv(&table, path).map_err(|e| CliError::Save {
                    path: path.display().to_string(),
                    reason: format!("{:#}", e),
                })?;
                writeln!(err, "saved {} rows to {}", rows, path.display())?;
            }

            writeln!(out, "{}", render_table(&table, display))?;
            writeln!(
                err,
                "\n{} rows x {} columns",
                table.row_count(),
                table.column_count()
            )?;
        }
        other => {
            if request.save.is_some() {
                warn!(kind = other.kind(), "Only table results can be saved, skipping --save");
            }
            writeln!(out, "{}", render(&other, display))?;
        }
    }

    Ok(())
}

/// `name(k=v, ...)` 형태의 호출 표시. 문자열 파라미터는 원본 텍스트를 따옴표로 감쌉니다.
fn call_echo(signature: &Signature, args: &Arguments) -> String {
    let rendered: Vec<String> = args
        .iter()
        .map(|(key, argument)| {
            let is_str = signature
                .params
                .iter()
                .any(|p| p.name == key && p.kind == ParamKind::Str);
            if is_str {
                format!("{}={:?}", key, argument.raw)
            } else {
                format!("{}={}", key, argument.value.literal())
            }
        })
        .collect();

    format!("{}({})", signature.name, rendered.join(", "))
}

/// 호출 중 표시할 스피너 (터미널이 아니면 그려지지 않음).
fn spinner(name: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Fetching {}...", name));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use akq_core::{Cell, Series, Table};
    use akq_data::{BoundArgs, Param, QueryFunction};
    use async_trait::async_trait;
    use std::sync::Arc;

    static NUMBERS: Signature = Signature {
        name: "numbers",
        summary: "0..count as a table",
        params: &[
            Param::required("count", ParamKind::Int),
            Param::optional("label", ParamKind::Str, "n"),
        ],
    };

    struct Numbers;

    #[async_trait]
    impl QueryFunction for Numbers {
        fn signature(&self) -> &'static Signature {
            &NUMBERS
        }

        async fn call(&self, args: &BoundArgs) -> akq_data::Result<QueryResult> {
            let count = args.int("count")?;
            if count < 0 {
                return Err(DataError::InvalidArgument("count must not be negative".into()));
            }
            let mut table = Table::new([args.str("label")?])?;
            for i in 0..count {
                table.push_row(vec![Cell::Int(i)])?;
            }
            Ok(table.into())
        }
    }

    static FACTS: Signature = Signature {
        name: "facts",
        summary: "fixed series",
        params: &[],
    };

    struct Facts;

    #[async_trait]
    impl QueryFunction for Facts {
        fn signature(&self) -> &'static Signature {
            &FACTS
        }

        async fn call(&self, _args: &BoundArgs) -> akq_data::Result<QueryResult> {
            let mut series = Series::new(None);
            series.push("a", Cell::Int(1));
            Ok(series.into())
        }
    }

    fn registry() -> FunctionRegistry {
        let mut registry = FunctionRegistry::new();
        registry.register(Arc::new(Numbers));
        registry.register(Arc::new(Facts));
        registry
    }

    async fn run(tokens: &[&str]) -> (Result<(), CliError>, String, String) {
        let (function, rest) = tokens.split_first().unwrap();
        let request = InvocationRequest::parse(*function, rest).unwrap();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = run_query(
            &registry(),
            &request,
            &DisplayOptions::default(),
            &mut out,
            &mut err,
        )
        .await;
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_table_with_head_and_summary() {
        let (result, out, err) = run(&["numbers", "count=10", "--head", "5", "--tail", "3"]).await;
        result.unwrap();

        assert_eq!(out, "n\n0\n1\n2\n3\n4\n");
        assert!(err.starts_with("calling: numbers(count=10)\n"));
        assert!(err.ends_with("\n5 rows x 1 columns\n"));
    }

    #[tokio::test]
    async fn test_string_param_echo_uses_raw_text() {
        let (result, out, err) = run(&["numbers", "count=0", "label=007"]).await;
        result.unwrap();

        assert!(err.contains("calling: numbers(count=0, label=\"007\")"));
        assert_eq!(out, "Empty DataFrame\nColumns: [007]\nIndex: []\n");
    }

    #[tokio::test]
    async fn test_unknown_function() {
        let (result, _, err) = run(&["no_such_function_xyz"]).await;
        let error = result.unwrap_err();

        assert!(matches!(error, CliError::UnknownFunction(ref name) if name == "no_such_function_xyz"));
        assert_eq!(error.hint(), Some(FUNCTION_HINT));
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn test_parameter_error_is_distinct() {
        let (result, _, _) = run(&["numbers", "label=x"]).await;
        let error = result.unwrap_err();
        assert_eq!(
            error.to_string(),
            "parameter error: numbers() missing 1 required argument: 'count'"
        );

        let (result, _, _) = run(&["numbers", "count=abc"]).await;
        assert!(matches!(result.unwrap_err(), CliError::Parameter(ParamError::Type { .. })));
    }

    #[tokio::test]
    async fn test_invocation_error_kind() {
        let (result, out, _) = run(&["numbers", "count=-1"]).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "query failed: ValueError: count must not be negative"
        );
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_save_reports_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let path_text = path.display().to_string();

        let (result, _, err) = run(&["numbers", "count=4", "--tail", "2", "--save", path_text.as_str()]).await;
        result.unwrap();

        assert!(err.contains(&format!("saved 2 rows to {}", path_text)));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\u{FEFF}n\n2\n3\n");
    }

    #[tokio::test]
    async fn test_series_result_ignores_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        let path_text = path.display().to_string();

        let (result, out, _) = run(&["facts", "--save", path_text.as_str()]).await;
        result.unwrap();

        assert_eq!(out, "a    1\n");
        assert!(!path.exists());
    }
}

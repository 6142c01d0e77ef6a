//! 금융 데이터 조회 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 평안은행 일봉 (전방 수정주가)
//! akq stock_zh_a_hist symbol=000001 period=daily start_date=20240101 end_date=20241231 adjust=qfq
//!
//! # A주 전종목 스냅샷 상위 20행
//! akq stock_zh_a_spot_em --head 20
//!
//! # CPI를 CSV로 저장
//! akq macro_china_cpi --save cpi_data.csv
//! ```

use std::io;
use std::process::ExitCode;

use akq_cli::{run_query, usage_text, CliError, InvocationRequest};
use akq_core::{init_logging_from_env, AppConfig};
use akq_data::{eastmoney_registry, DataError};
use clap::Parser;
use tracing::debug;

#[derive(Parser)]
#[command(name = "akq")]
#[command(about = "Query financial data functions by name", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// 조회 함수 이름
    #[arg(allow_hyphen_values = true)]
    function: Option<String>,

    /// `key=value` 인자와 `--save`/`--head`/`--tail`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 도움말/버전 플래그는 함수 자리에서만 인식합니다.
    let function = match cli.function.as_deref() {
        None | Some("-h") | Some("--help") => {
            print!("{}", usage_text());
            return ExitCode::SUCCESS;
        }
        Some("-V") | Some("--version") => {
            println!("akq {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Some(name) => name.to_string(),
    };

    if let Err(e) = init_logging_from_env() {
        eprintln!("warning: failed to initialise logging: {}", e);
    }

    match run(function, &cli.args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = %err, "Invocation failed");
            eprintln!("{}", err);
            if let Some(hint) = err.hint() {
                eprintln!("{}", hint);
            }
            err.exit_code()
        }
    }
}

fn run(function: String, tokens: &[String]) -> Result<(), CliError> {
    let request = InvocationRequest::parse(function, tokens)?;
    debug!(request = ?request, "Parsed invocation");

    let config = AppConfig::load()
        .map_err(|e| CliError::Unavailable(format!("configuration: {}", e)))?;

    let registry = eastmoney_registry(&config.provider).map_err(|e| match e {
        DataError::Unavailable(msg) => CliError::Unavailable(msg),
        other => CliError::Unavailable(other.to_string()),
    })?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Unavailable(format!("async runtime: {}", e)))?;

    runtime.block_on(run_query(
        &registry,
        &request,
        &config.display,
        &mut io::stdout(),
        &mut io::stderr(),
    ))
}

//! 명령줄 토큰 → 호출 요청 변환.
//!
//! 함수 이름 뒤의 토큰은 왼쪽부터 순서대로 처리됩니다:
//! - `--save <path>`: 결과 저장 경로
//! - `--head <N>` / `--tail <N>`: 행 수 제한
//! - `key=value`: 첫 번째 `=` 기준으로 분리한 인자
//! - 그 외 토큰은 무시

use std::path::PathBuf;

use akq_core::{Arguments, Table};
use thiserror::Error;

/// 요청 파싱 오류.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("invalid value for {flag}: '{value}'")]
    InvalidCount { flag: &'static str, value: String },
}

/// 한 번의 실행에 대한 호출 요청. 파싱 후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub function: String,
    pub args: Arguments,
    pub save: Option<PathBuf>,
    pub head: Option<i64>,
    pub tail: Option<i64>,
}

impl InvocationRequest {
    /// 함수 이름과 나머지 토큰으로 요청을 만듭니다.
    ///
    /// 값 없이 끝나는 `--save`/`--head`/`--tail`은 무시됩니다.
    pub fn parse<S: AsRef<str>>(function: impl Into<String>, tokens: &[S]) -> Result<Self, RequestError> {
        let mut request = Self {
            function: function.into(),
            args: Arguments::new(),
            save: None,
            head: None,
            tail: None,
        };

        let mut i = 0;
        while i < tokens.len() {
            let token: &str = tokens[i].as_ref();
            let next: Option<&str> = tokens.get(i + 1).map(|t| t.as_ref());

            match (token, next) {
                ("--save", Some(path)) => {
                    request.save = Some(PathBuf::from(path));
                    i += 2;
                    continue;
                }
                ("--head", Some(value)) => {
                    request.head = Some(parse_count("--head", value)?);
                    i += 2;
                    continue;
                }
                ("--tail", Some(value)) => {
                    request.tail = Some(parse_count("--tail", value)?);
                    i += 2;
                    continue;
                }
                _ => {}
            }

            if let Some((key, raw)) = token.split_once('=') {
                request.args.insert(key, raw);
            } else {
                tracing::debug!(token = %token, "Ignoring unrecognised token");
            }
            i += 1;
        }

        Ok(request)
    }

    /// head/tail 적용. head가 우선이며 0은 지정하지 않은 것으로 봅니다.
    pub fn truncate(&self, table: Table) -> Table {
        match (self.head, self.tail) {
            (Some(n), _) if n != 0 => table.head(n),
            (_, Some(n)) if n != 0 => table.tail(n),
            _ => table,
        }
    }
}

fn parse_count(flag: &'static str, value: &str) -> Result<i64, RequestError> {
    value.trim().parse().map_err(|_| RequestError::InvalidCount {
        flag,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use akq_core::{Cell, Value};

    fn parse(tokens: &[&str]) -> Result<InvocationRequest, RequestError> {
        InvocationRequest::parse("f", tokens)
    }

    fn numbered(n: i64) -> Table {
        let mut table = Table::new(["n"]).unwrap();
        for i in 0..n {
            table.push_row(vec![Cell::Int(i)]).unwrap();
        }
        table
    }

    #[test]
    fn test_key_value_and_flags() {
        let request = parse(&[
            "symbol=000001",
            "adjust=qfq",
            "--save",
            "out/a.csv",
            "--head",
            " 5 ",
            "--tail",
            "-3",
            "noise",
        ])
        .unwrap();

        assert_eq!(request.function, "f");
        assert_eq!(request.args.len(), 2);
        assert_eq!(request.args.get("symbol").unwrap().raw, "000001");
        assert_eq!(request.args.get("symbol").unwrap().value, Value::Int(1));
        assert_eq!(
            request.args.get("adjust").unwrap().value,
            Value::Str("qfq".into())
        );
        assert_eq!(request.save, Some(PathBuf::from("out/a.csv")));
        assert_eq!(request.head, Some(5));
        assert_eq!(request.tail, Some(-3));
    }

    #[test]
    fn test_split_on_first_equals() {
        let request = parse(&["expr=a=b", "empty="]).unwrap();
        assert_eq!(request.args.get("expr").unwrap().raw, "a=b");
        assert_eq!(request.args.get("empty").unwrap().value, Value::Str(String::new()));
    }

    #[test]
    fn test_repeated_key_keeps_first_position() {
        let request = parse(&["a=1", "b=2", "a=3"]).unwrap();
        let keys: Vec<_> = request.args.keys().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(request.args.get("a").unwrap().value, Value::Int(3));
    }

    #[test]
    fn test_trailing_flag_without_value_is_ignored() {
        let request = parse(&["a=1", "--save"]).unwrap();
        assert_eq!(request.save, None);
        assert_eq!(request.args.len(), 1);

        assert_eq!(parse(&["--head"]).unwrap().head, None);
    }

    #[test]
    fn test_flag_consumes_next_token_even_if_key_value() {
        let request = parse(&["--save", "x=y"]).unwrap();
        assert_eq!(request.save, Some(PathBuf::from("x=y")));
        assert!(request.args.is_empty());
    }

    #[test]
    fn test_malformed_count() {
        assert_eq!(
            parse(&["--head", "abc"]).unwrap_err(),
            RequestError::InvalidCount {
                flag: "--head",
                value: "abc".into()
            }
        );
        let err = parse(&["--tail", "1.5"]).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for --tail: '1.5'");
    }

    #[test]
    fn test_head_wins_over_tail() {
        let request = parse(&["--head", "5", "--tail", "3"]).unwrap();
        let table = request.truncate(numbered(10));
        assert_eq!(table.row_count(), 5);
        assert_eq!(table.rows()[0][0], Cell::Int(0));
    }

    #[test]
    fn test_zero_head_falls_through_to_tail() {
        let request = parse(&["--head", "0", "--tail", "2"]).unwrap();
        let table = request.truncate(numbered(10));
        assert_eq!(table.rows(), &[vec![Cell::Int(8)], vec![Cell::Int(9)]]);

        let untouched = parse(&["--tail", "0"]).unwrap().truncate(numbered(4));
        assert_eq!(untouched.row_count(), 4);
    }
}

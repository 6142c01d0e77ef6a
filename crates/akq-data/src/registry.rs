//! 조회 함수 레지스트리.
//!
//! 함수 이름을 실행 가능한 [`QueryFunction`]에 매핑하는 디스패치 테이블입니다.
//! 각 함수는 [`Signature`]로 받을 수 있는 파라미터를 선언하고,
//! 명령줄 인자는 호출 전에 시그니처에 맞춰 검증/바인딩됩니다.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use akq_core::{Arguments, QueryResult, Value, ValueKind};
use async_trait::async_trait;
use thiserror::Error;

use crate::error::{DataError, Result};

/// 파라미터 타입.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// 문자열 (어떤 값이든 원본 텍스트로 받음)
    Str,
    /// 정수
    Int,
    /// 실수 (정수도 허용)
    Float,
    /// 불리언
    Bool,
}

impl ParamKind {
    fn expected(&self) -> ValueKind {
        match self {
            Self::Str => ValueKind::Str,
            Self::Int => ValueKind::Int,
            Self::Float => ValueKind::Float,
            Self::Bool => ValueKind::Bool,
        }
    }
}

/// 파라미터 선언.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    /// 기본값 (명령줄 텍스트 형태). `None`이면 필수 파라미터.
    pub default: Option<&'static str>,
}

impl Param {
    pub const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            default: None,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            default: Some(default),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// 원본 텍스트와 변환된 값을 파라미터 타입에 맞춰 바인딩.
    fn bind(&self, raw: &str, value: &Value) -> Option<Value> {
        match (self.kind, value) {
            (ParamKind::Str, _) => Some(Value::Str(raw.to_string())),
            (ParamKind::Int, Value::Int(n)) => Some(Value::Int(*n)),
            (ParamKind::Float, Value::Int(n)) => Some(Value::Float(*n as f64)),
            (ParamKind::Float, Value::Float(x)) => Some(Value::Float(*x)),
            (ParamKind::Bool, Value::Bool(b)) => Some(Value::Bool(*b)),
            _ => None,
        }
    }
}

/// 함수 시그니처.
#[derive(Debug)]
pub struct Signature {
    pub name: &'static str,
    /// 한 줄 설명
    pub summary: &'static str,
    pub params: &'static [Param],
}

impl Signature {
    /// 명령줄 인자를 시그니처에 맞춰 검증하고 기본값을 채웁니다.
    ///
    /// 검사 순서: 알 수 없는 키워드 → 누락된 필수 인자 → 타입 불일치.
    pub fn bind(&self, args: &Arguments) -> std::result::Result<BoundArgs, ParamError> {
        if let Some(unknown) = args
            .keys()
            .find(|key| !self.params.iter().any(|p| p.name == *key))
        {
            return Err(ParamError::Unexpected {
                function: self.name,
                name: unknown.to_string(),
            });
        }

        let missing: Vec<&'static str> = self
            .params
            .iter()
            .filter(|p| p.is_required() && !args.contains_key(p.name))
            .map(|p| p.name)
            .collect();
        if !missing.is_empty() {
            return Err(ParamError::Missing {
                function: self.name,
                names: missing,
            });
        }

        let mut values = Vec::with_capacity(self.params.len());
        for param in self.params {
            let bound = match (args.get(param.name), param.default) {
                (Some(argument), _) => {
                    param
                        .bind(&argument.raw, &argument.value)
                        .ok_or_else(|| ParamError::Type {
                            function: self.name,
                            name: param.name,
                            expected: param.kind.expected(),
                            actual: argument.value.kind(),
                            raw: argument.raw.clone(),
                        })?
                }
                (None, Some(default)) => {
                    let value = Value::coerce(default);
                    param
                        .bind(default, &value)
                        .unwrap_or_else(|| Value::Str(default.to_string()))
                }
                // 누락 검사에서 이미 걸러짐
                (None, None) => continue,
            };
            values.push((param.name, bound));
        }

        Ok(BoundArgs { values })
    }
}

impl fmt::Display for Signature {
    /// `name(symbol, period="daily")` 형태로 표시
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match (param.default, param.kind) {
                (None, _) => f.write_str(param.name)?,
                (Some(default), ParamKind::Str) => write!(f, "{}={:?}", param.name, default)?,
                (Some(default), _) => write!(f, "{}={}", param.name, default)?,
            }
        }
        f.write_str(")")
    }
}

/// 인자 바인딩 오류 (파라미터 오류).
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{function}() got an unexpected keyword argument '{name}'")]
    Unexpected { function: &'static str, name: String },

    #[error(
        "{function}() missing {} required {}: {}",
        .names.len(),
        argument_word(.names),
        quote_names(.names)
    )]
    Missing {
        function: &'static str,
        names: Vec<&'static str>,
    },

    #[error("{function}() argument '{name}' expects {expected}, got {actual} '{raw}'")]
    Type {
        function: &'static str,
        name: &'static str,
        expected: ValueKind,
        actual: ValueKind,
        raw: String,
    },
}

fn argument_word(names: &[&str]) -> &'static str {
    if names.len() == 1 {
        "argument"
    } else {
        "arguments"
    }
}

fn quote_names(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 시그니처에 맞춰 바인딩된 인자.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    values: Vec<(&'static str, Value)>,
}

impl BoundArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(n, v)| (*n, v))
    }

    /// 문자열 파라미터 조회
    pub fn str(&self, name: &str) -> Result<&str> {
        match self.get(name) {
            Some(Value::Str(s)) => Ok(s),
            other => Err(unbound(name, "string", other)),
        }
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        match self.get(name) {
            Some(Value::Int(n)) => Ok(*n),
            other => Err(unbound(name, "integer", other)),
        }
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(Value::Float(x)) => Ok(*x),
            other => Err(unbound(name, "float", other)),
        }
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            Some(Value::Bool(b)) => Ok(*b),
            other => Err(unbound(name, "boolean", other)),
        }
    }
}

fn unbound(name: &str, expected: &str, found: Option<&Value>) -> DataError {
    DataError::InvalidArgument(match found {
        Some(value) => format!("argument '{}' is not a {}: {}", name, expected, value.literal()),
        None => format!("argument '{}' was not bound", name),
    })
}

/// 이름으로 호출할 수 있는 데이터 조회 함수.
#[async_trait]
pub trait QueryFunction: Send + Sync {
    /// 함수 시그니처
    fn signature(&self) -> &'static Signature;

    /// 바인딩된 인자로 함수를 실행합니다.
    async fn call(&self, args: &BoundArgs) -> Result<QueryResult>;
}

/// 함수 이름 → 구현 디스패치 테이블.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<&'static str, Arc<dyn QueryFunction>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 함수 등록. 같은 이름이 있으면 교체합니다.
    pub fn register(&mut self, function: Arc<dyn QueryFunction>) {
        let name = function.signature().name;
        if self.functions.insert(name, function).is_some() {
            tracing::warn!(function = name, "Query function registered twice, replacing");
        }
    }

    /// 이름으로 함수 조회. 유사 이름 추천은 하지 않습니다.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn QueryFunction>> {
        self.functions.get(name).cloned()
    }

    /// 등록된 함수 시그니처 (이름순)
    pub fn signatures(&self) -> impl Iterator<Item = &'static Signature> + '_ {
        self.functions.values().map(|f| f.signature())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.functions.keys()).finish()
    }
}

//! CLI 인자 값과 자동 타입 변환.
//!
//! `key=value` 형태로 들어온 문자열 값은 고정된 우선순위로 변환됩니다:
//! 불리언(`true`/`false`, 대소문자 무시) → 정수 → 실수 → 원본 문자열.

use std::fmt;

/// 자동 변환된 인자 값.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 불리언
    Bool(bool),
    /// 정수 (i64 범위)
    Int(i64),
    /// 실수
    Float(f64),
    /// 변환되지 않은 문자열
    Str(String),
}

/// 값의 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
}

impl ValueKind {
    /// 사람이 읽을 수 있는 종류 이름.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Str => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// 원본 문자열을 값으로 변환합니다.
    ///
    /// 불리언 검사가 가장 먼저 수행되고, 정수가 실수보다 우선합니다.
    /// i64 범위를 넘는 정수는 실수 규칙으로 넘어갑니다.
    ///
    /// ```
    /// use akq_core::Value;
    ///
    /// assert_eq!(Value::coerce("TRUE"), Value::Bool(true));
    /// assert_eq!(Value::coerce("20240101"), Value::Int(20240101));
    /// assert_eq!(Value::coerce("1.5"), Value::Float(1.5));
    /// assert_eq!(Value::coerce("qfq"), Value::Str("qfq".to_string()));
    /// ```
    pub fn coerce(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }

        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::Int(n);
        }
        if let Ok(x) = trimmed.parse::<f64>() {
            return Self::Float(x);
        }

        Self::Str(raw.to_string())
    }

    /// 값의 종류 반환
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
        }
    }

    /// 호출 에코용 리터럴 표현 (문자열은 따옴표로 감쌈).
    pub fn literal(&self) -> String {
        match self {
            Self::Str(s) => format!("{:?}", s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// 원본 텍스트를 함께 보관하는 인자.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// 명령줄에 입력된 그대로의 값
    pub raw: String,
    /// 변환된 값
    pub value: Value,
}

impl Argument {
    /// 원본 문자열로부터 인자를 만듭니다.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let value = Value::coerce(&raw);
        Self { raw, value }
    }
}

/// 순서가 유지되는 인자 맵.
///
/// 같은 키가 다시 들어오면 값은 덮어쓰고 위치는 처음 위치를 유지합니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<(String, Argument)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// 원본 값을 변환하여 추가합니다.
    pub fn insert(&mut self, key: impl Into<String>, raw: impl Into<String>) {
        let key = key.into();
        let argument = Argument::parse(raw);

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = argument,
            None => self.entries.push((key, argument)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Argument> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, argument)| argument)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Argument)> {
        self.entries.iter().map(|(k, a)| (k.as_str(), a))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (key, raw) in iter {
            args.insert(key, raw);
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_coerce_booleans() {
        assert_eq!(Value::coerce("true"), Value::Bool(true));
        assert_eq!(Value::coerce("TRUE"), Value::Bool(true));
        assert_eq!(Value::coerce("True"), Value::Bool(true));
        assert_eq!(Value::coerce("false"), Value::Bool(false));
        assert_eq!(Value::coerce("FALSE"), Value::Bool(false));
    }

    #[test]
    fn test_coerce_integer_wins_over_float() {
        assert_eq!(Value::coerce("20240101"), Value::Int(20240101));
        assert_eq!(Value::coerce("-7"), Value::Int(-7));
        assert_eq!(Value::coerce("+7"), Value::Int(7));
        assert_eq!(Value::coerce(" 42 "), Value::Int(42));
        // 앞자리 0은 정수 변환 시 사라짐 (원본은 Argument::raw에 남음)
        assert_eq!(Value::coerce("000001"), Value::Int(1));
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(Value::coerce("1.5"), Value::Float(1.5));
        assert_eq!(Value::coerce("1e3"), Value::Float(1000.0));
        assert_eq!(Value::coerce("99999999999999999999"), Value::Float(1e20));
        assert!(matches!(Value::coerce("nan"), Value::Float(x) if x.is_nan()));
    }

    #[test]
    fn test_coerce_string_unchanged() {
        assert_eq!(Value::coerce("qfq"), Value::Str("qfq".to_string()));
        assert_eq!(Value::coerce(""), Value::Str(String::new()));
        assert_eq!(Value::coerce(" yes "), Value::Str(" yes ".to_string()));
        assert_eq!(Value::coerce("2024-01-01"), Value::Str("2024-01-01".to_string()));
    }

    #[test]
    fn test_literal() {
        assert_eq!(Value::Str("qfq".into()).literal(), "\"qfq\"");
        assert_eq!(Value::Int(5).literal(), "5");
        assert_eq!(Value::Bool(false).literal(), "false");
    }

    #[test]
    fn test_arguments_keep_first_position_last_value() {
        let args: Arguments = [("symbol", "000001"), ("adjust", "qfq"), ("symbol", "600519")]
            .into_iter()
            .collect();

        assert_eq!(args.len(), 2);
        assert_eq!(args.keys().collect::<Vec<_>>(), vec!["symbol", "adjust"]);

        let symbol = args.get("symbol").unwrap();
        assert_eq!(symbol.raw, "600519");
        assert_eq!(symbol.value, Value::Int(600519));
    }

    proptest! {
        #[test]
        fn prop_integers_stay_integers(n in any::<i64>()) {
            prop_assert_eq!(Value::coerce(&n.to_string()), Value::Int(n));
        }

        #[test]
        fn prop_alphabetic_words_stay_strings(s in "[a-zA-Z]{1,12}") {
            prop_assume!(!s.eq_ignore_ascii_case("true") && !s.eq_ignore_ascii_case("false"));
            prop_assume!(!s.eq_ignore_ascii_case("inf") && !s.eq_ignore_ascii_case("infinity"));
            prop_assume!(!s.eq_ignore_ascii_case("nan"));
            prop_assert_eq!(Value::coerce(&s), Value::Str(s.clone()));
        }
    }
}

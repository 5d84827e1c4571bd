//! 데이터베이스 스키마 네임스페이스 정의.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 캔들 테이블이 속하는 스키마.
///
/// 테이블 이름은 `<schema>.<symbol>_<timeframe>` 규칙으로 구성되며,
/// 세 조각 모두 닫힌 열거형에서만 나옵니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// 프론트테스트 스키마 (동기화 대상)
    Fronttest,
    /// 백테스트 스키마 (벌크 로더 전용)
    Backtest,
    /// 원본 1분봉 아카이브 스키마 (데드존 보조 소스)
    Public,
}

impl Schema {
    /// 스키마 식별자를 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::Fronttest => "fronttest",
            Schema::Backtest => "backtest",
            Schema::Public => "public",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Schema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fronttest" => Ok(Schema::Fronttest),
            "backtest" => Ok(Schema::Backtest),
            "public" => Ok(Schema::Public),
            _ => Err(format!("Invalid schema: {}", s)),
        }
    }
}

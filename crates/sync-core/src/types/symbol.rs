//! 동기화 대상 심볼 정의.
//!
//! 심볼은 닫힌 열거형 집합입니다. 테이블 이름은 이 열거형에서만 파생되므로
//! 외부 문자열이 SQL 식별자로 흘러들어갈 수 없습니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 동기화 대상 심볼.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    /// E-mini S&P 500 선물
    Es,
    /// 유로/달러 외환
    Eurusd,
    /// SPDR S&P 500 ETF
    Spy,
}

impl Symbol {
    /// 전체 심볼 목록.
    pub const ALL: [Symbol; 3] = [Symbol::Es, Symbol::Eurusd, Symbol::Spy];

    /// 테이블 이름 조각으로 사용되는 소문자 식별자를 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Es => "es",
            Symbol::Eurusd => "eurusd",
            Symbol::Spy => "spy",
        }
    }

    /// Yahoo Finance 심볼 형식으로 변환합니다.
    pub fn yahoo_symbol(&self) -> &'static str {
        match self {
            Symbol::Es => "ES=F",
            Symbol::Eurusd => "EURUSD=X",
            Symbol::Spy => "SPY",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "es" => Ok(Symbol::Es),
            "eurusd" => Ok(Symbol::Eurusd),
            "spy" => Ok(Symbol::Spy),
            _ => Err(format!("Invalid symbol: {}", s)),
        }
    }
}

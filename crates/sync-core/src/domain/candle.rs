//! 캔들(OHLCV) 데이터 타입 및 색상 분류.

use crate::types::{Symbol, Timeframe};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 캔들 색상 분류.
///
/// 색상은 항상 시가/종가에서 다시 계산되며, 외부 소스의 색상 값을
/// 그대로 신뢰하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleColor {
    /// 양봉 (종가 > 시가)
    Green,
    /// 음봉 (종가 < 시가)
    Red,
    /// 도지 (종가 == 시가)
    Doji,
}

impl CandleColor {
    /// 시가와 종가에서 색상을 계산합니다.
    pub fn from_prices(open: Decimal, close: Decimal) -> Self {
        if close > open {
            CandleColor::Green
        } else if close < open {
            CandleColor::Red
        } else {
            CandleColor::Doji
        }
    }

    /// DB 저장용 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            CandleColor::Green => "green",
            CandleColor::Red => "red",
            CandleColor::Doji => "doji",
        }
    }
}

impl fmt::Display for CandleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 정규화된 OHLCV 캔들 레코드.
///
/// (symbol, timestamp)가 한 타임프레임 테이블 내의 고유 키입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 심볼
    pub symbol: Symbol,
    /// 타임프레임
    pub timeframe: Timeframe,
    /// 캔들 시각 (UTC, 초 단위 정밀도)
    pub timestamp: DateTime<Utc>,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량 (음수 불가)
    pub volume: i64,
    /// 파생 색상 분류
    pub color: CandleColor,
}

impl Candle {
    /// 캔들 몸통 크기(절대값)를 반환합니다.
    pub fn body_size(&self) -> Decimal {
        (self.close - self.open).abs()
    }

    /// 시가/종가에서 색상 필드를 다시 계산합니다.
    pub fn recolor(&mut self) {
        self.color = CandleColor::from_prices(self.open, self.close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_color_from_prices() {
        assert_eq!(
            CandleColor::from_prices(dec!(100), dec!(101)),
            CandleColor::Green
        );
        assert_eq!(
            CandleColor::from_prices(dec!(101), dec!(100)),
            CandleColor::Red
        );
        assert_eq!(
            CandleColor::from_prices(dec!(100), dec!(100)),
            CandleColor::Doji
        );
    }

    #[test]
    fn test_color_as_str() {
        assert_eq!(CandleColor::Green.as_str(), "green");
        assert_eq!(CandleColor::Red.as_str(), "red");
        assert_eq!(CandleColor::Doji.as_str(), "doji");
    }
}

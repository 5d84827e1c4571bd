//! 제공자 중립 캔들 조회 trait.

use crate::error::ProviderError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sync_core::{normalize, Candle, Symbol, Timeframe};

/// 제공자가 반환하는 원시 캔들 행.
///
/// 정렬 규칙이 적용되기 전의 값이며, `to_candle`로 표준 캔들로
/// 변환합니다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawCandle {
    /// 캔들 시각 (UTC 변환 완료, 정렬 규칙 미적용)
    pub timestamp: DateTime<Utc>,
    /// 시가
    pub open: f64,
    /// 고가
    pub high: f64,
    /// 저가
    pub low: f64,
    /// 종가
    pub close: f64,
    /// 거래량 (제공자가 값을 주지 않으면 0)
    pub volume: u64,
}

impl RawCandle {
    /// 정렬 규칙과 색상 계산을 적용하여 표준 캔들로 변환합니다.
    pub fn to_candle(&self, symbol: Symbol, timeframe: Timeframe) -> Candle {
        normalize::candle(
            symbol,
            timeframe,
            self.timestamp,
            Decimal::from_f64_retain(self.open).unwrap_or_default(),
            Decimal::from_f64_retain(self.high).unwrap_or_default(),
            Decimal::from_f64_retain(self.low).unwrap_or_default(),
            Decimal::from_f64_retain(self.close).unwrap_or_default(),
            i64::try_from(self.volume).unwrap_or(i64::MAX),
        )
    }
}

/// 제공자 중립 캔들 조회 trait.
#[async_trait]
pub trait CandleProvider: Send + Sync {
    /// 해당 쌍의 가장 최근 캔들을 조회합니다 (신선도 확인용).
    ///
    /// 제공자에 데이터가 없으면 `Ok(None)`을 반환합니다.
    async fn latest(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
    ) -> Result<Option<RawCandle>, ProviderError>;

    /// 해당 쌍의 전체 가용 이력을 시간 오름차순으로 조회합니다.
    ///
    /// 데이터가 없으면 빈 벡터를 반환합니다.
    async fn history(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
    ) -> Result<Vec<RawCandle>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sync_core::CandleColor;

    #[test]
    fn test_raw_to_candle() {
        let raw = RawCandle {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 26, 18, 0, 0).unwrap(),
            open: 580.25,
            high: 584.5,
            low: 579.0,
            close: 583.75,
            volume: 42_000_000,
        };

        let candle = raw.to_candle(Symbol::Spy, Timeframe::D1);
        // 일봉 정렬: SPY는 14:30 UTC 앵커
        assert_eq!(
            candle.timestamp,
            Utc.with_ymd_and_hms(2025, 3, 26, 14, 30, 0).unwrap()
        );
        assert_eq!(candle.color, CandleColor::Green);
        assert_eq!(candle.volume, 42_000_000);
    }
}

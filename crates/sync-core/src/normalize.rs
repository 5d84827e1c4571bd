//! 타임스탬프 정규화 및 캔들 생성 규칙.
//!
//! 제공자/아카이브의 원시 행을 표준 캔들로 변환합니다:
//! - 모든 타임스탬프를 UTC로 통일
//! - 심볼/타임프레임별 정렬 규칙 적용
//! - 시가/종가에서 색상 재계산
//!
//! # 정렬 규칙
//!
//! - 일봉: SPY는 14:30 UTC, 그 외 심볼은 00:00 UTC로 앵커 (같은 달력 날짜)
//! - EURUSD 5분봉: 제공자-원본 시계 차이 보정으로 +5시간 이동
//! - 그 외 타임프레임: UTC 변환 외 변경 없음

use crate::domain::{Candle, CandleColor};
use crate::types::{Symbol, Timeframe};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

/// 심볼/타임프레임별 정렬 규칙을 적용합니다.
pub fn align_timestamp(
    symbol: Symbol,
    timeframe: Timeframe,
    timestamp: DateTime<Utc>,
) -> DateTime<Utc> {
    match timeframe {
        Timeframe::D1 => align_daily(symbol, timestamp),
        Timeframe::M5 if symbol == Symbol::Eurusd => timestamp + Duration::hours(5),
        _ => timestamp,
    }
}

/// 일봉 타임스탬프를 심볼별 앵커 시각으로 정렬합니다.
///
/// SPY는 장 시작(14:30 UTC)에, 그 외에는 자정(00:00 UTC)에 앵커됩니다.
/// 달력 날짜는 원본 타임스탬프를 따릅니다.
pub fn align_daily(symbol: Symbol, timestamp: DateTime<Utc>) -> DateTime<Utc> {
    let date = timestamp.date_naive();
    let (hour, minute) = match symbol {
        Symbol::Spy => (14, 30),
        _ => (0, 0),
    };
    // 해당 날짜의 고정 시각은 항상 유효하다
    Utc.from_utc_datetime(&date.and_hms_opt(hour, minute, 0).unwrap())
}

/// 정규화된 캔들을 생성합니다.
///
/// 정렬 규칙을 적용하고 색상을 시가/종가에서 계산합니다. 순수 변환이며
/// 입력 순서를 보존합니다.
pub fn candle(
    symbol: Symbol,
    timeframe: Timeframe,
    timestamp: DateTime<Utc>,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: i64,
) -> Candle {
    Candle {
        symbol,
        timeframe,
        timestamp: align_timestamp(symbol, timeframe, timestamp),
        open,
        high,
        low,
        close,
        volume,
        color: CandleColor::from_prices(open, close),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_daily_alignment_spy() {
        let raw = Utc.with_ymd_and_hms(2025, 3, 26, 9, 45, 12).unwrap();
        let aligned = align_timestamp(Symbol::Spy, Timeframe::D1, raw);
        assert_eq!(
            aligned,
            Utc.with_ymd_and_hms(2025, 3, 26, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_daily_alignment_others() {
        let raw = Utc.with_ymd_and_hms(2025, 3, 26, 22, 0, 0).unwrap();
        for sym in [Symbol::Es, Symbol::Eurusd] {
            let aligned = align_timestamp(sym, Timeframe::D1, raw);
            assert_eq!(aligned, Utc.with_ymd_and_hms(2025, 3, 26, 0, 0, 0).unwrap());
        }
    }

    #[test]
    fn test_eurusd_m5_shift() {
        let raw = Utc.with_ymd_and_hms(2025, 3, 26, 10, 0, 0).unwrap();
        let aligned = align_timestamp(Symbol::Eurusd, Timeframe::M5, raw);
        assert_eq!(aligned, Utc.with_ymd_and_hms(2025, 3, 26, 15, 0, 0).unwrap());

        // 다른 심볼의 5분봉은 이동하지 않음
        assert_eq!(align_timestamp(Symbol::Es, Timeframe::M5, raw), raw);
    }

    #[test]
    fn test_other_timeframes_pass_through() {
        let raw = Utc.with_ymd_and_hms(2025, 3, 26, 10, 1, 0).unwrap();
        for tf in [Timeframe::M1, Timeframe::M15, Timeframe::M30, Timeframe::H1] {
            assert_eq!(align_timestamp(Symbol::Eurusd, tf, raw), raw);
        }
    }

    #[test]
    fn test_candle_color_computed() {
        let raw = Utc.with_ymd_and_hms(2025, 3, 26, 10, 0, 0).unwrap();
        let c = candle(
            Symbol::Es,
            Timeframe::M1,
            raw,
            dec!(5000),
            dec!(5010),
            dec!(4995),
            dec!(5005),
            1200,
        );
        assert_eq!(c.color, CandleColor::Green);
        assert_eq!(c.timestamp, raw);
    }
}

//! 경계 캔들 정합성 검사.
//!
//! 저장소의 최신 타임스탬프와 같은 시각의 캔들이 새로 가져온 이력에
//! 있으면, 시가와 종가를 심볼별 허용 오차로 비교합니다. 불일치는
//! 정책으로 해소되며 이 한 타임스탬프에만 영향을 줍니다. 나머지
//! 캔들은 이후 무조건 업서트됩니다.

use crate::error::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sync_core::{BoundaryCheck, Candle, MismatchResolution, Symbol, SyncConfig, SyncPolicy, Timeframe};
use sync_data::CandleStorage;
use tracing::{info, warn};

/// 두 가격이 허용 오차(절대 차이) 이내인지 확인합니다.
pub fn is_close_enough(a: Decimal, b: Decimal, threshold: Decimal) -> bool {
    (a - b).abs() <= threshold
}

/// 저장된 경계 캔들과 가져온 캔들을 비교하고 불일치를 해소합니다.
///
/// 시가와 종가가 모두 허용 오차 이내면 일치입니다. `KeepStored`로
/// 해소되면 가져온 캔들의 모든 비키 필드를 저장된 값으로 덮어써서
/// 이후 업서트가 저장소를 바꾸지 않게 합니다.
pub fn reconcile_boundary(
    stored: &Candle,
    fetched: &mut Candle,
    threshold: Decimal,
    policy: &dyn SyncPolicy,
) -> BoundaryCheck {
    let open_ok = is_close_enough(stored.open, fetched.open, threshold);
    let close_ok = is_close_enough(stored.close, fetched.close, threshold);

    if open_ok && close_ok {
        return BoundaryCheck::Match;
    }

    let resolution = policy.resolve_mismatch(stored.symbol, stored.timeframe, stored, fetched);

    if resolution == MismatchResolution::KeepStored {
        fetched.open = stored.open;
        fetched.high = stored.high;
        fetched.low = stored.low;
        fetched.close = stored.close;
        fetched.volume = stored.volume;
        fetched.color = stored.color;
    }

    BoundaryCheck::Mismatch { resolution }
}

/// 경계 캔들 검사 전체 절차.
///
/// 가져온 이력에서 저장소 최신 타임스탬프와 같은 캔들을 찾고, 있으면
/// 저장된 캔들을 로드하여 비교합니다. 어느 쪽이든 없으면 검사를
/// 생략합니다.
pub async fn check_boundary(
    store: &dyn CandleStorage,
    policy: &dyn SyncPolicy,
    config: &SyncConfig,
    symbol: Symbol,
    timeframe: Timeframe,
    stored_latest: DateTime<Utc>,
    fetched: &mut [Candle],
) -> Result<BoundaryCheck> {
    let Some(idx) = fetched.iter().position(|c| c.timestamp == stored_latest) else {
        return Ok(BoundaryCheck::Missing);
    };

    let Some(stored) = store.candle_at(symbol, timeframe, stored_latest).await? else {
        return Ok(BoundaryCheck::Missing);
    };

    let threshold = config.mismatch_threshold(symbol);
    let check = reconcile_boundary(&stored, &mut fetched[idx], threshold, policy);

    match check {
        BoundaryCheck::Match => {
            info!(
                symbol = %symbol,
                timeframe = %timeframe,
                timestamp = %stored_latest,
                threshold = %threshold,
                "경계 캔들 일치"
            );
        }
        BoundaryCheck::Mismatch { resolution } => {
            warn!(
                symbol = %symbol,
                timeframe = %timeframe,
                timestamp = %stored_latest,
                stored_open = %stored.open,
                stored_close = %stored.close,
                fetched_open = %fetched[idx].open,
                fetched_close = %fetched[idx].close,
                resolution = ?resolution,
                "경계 캔들 불일치, 정책으로 해소"
            );
        }
        BoundaryCheck::Missing => {}
    }

    Ok(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use sync_core::{CandleColor, FixedPolicy};

    fn es_daily(open: Decimal, close: Decimal) -> Candle {
        Candle {
            symbol: Symbol::Es,
            timeframe: Timeframe::D1,
            timestamp: Utc.with_ymd_and_hms(2025, 3, 26, 0, 0, 0).unwrap(),
            open,
            high: close.max(open) + dec!(5),
            low: close.min(open) - dec!(5),
            close,
            volume: 10_000,
            color: CandleColor::from_prices(open, close),
        }
    }

    #[test]
    fn test_is_close_enough() {
        assert!(is_close_enough(dec!(5000.00), dec!(5000.10), dec!(0.25)));
        assert!(is_close_enough(dec!(5000.25), dec!(5000.00), dec!(0.25)));
        assert!(!is_close_enough(dec!(5000.00), dec!(5000.50), dec!(0.25)));
    }

    #[test]
    fn test_boundary_match_within_threshold() {
        let stored = es_daily(dec!(5000.00), dec!(5005.00));
        let mut fetched = es_daily(dec!(5000.10), dec!(5005.05));
        let policy = FixedPolicy::prefer_provider();

        let check = reconcile_boundary(&stored, &mut fetched, dec!(0.25), &policy);
        assert_eq!(check, BoundaryCheck::Match);
        // 일치 시 가져온 값은 그대로
        assert_eq!(fetched.open, dec!(5000.10));
    }

    #[test]
    fn test_boundary_mismatch_keep_provider() {
        let stored = es_daily(dec!(5000.00), dec!(5005.00));
        let mut fetched = es_daily(dec!(5000.50), dec!(5005.00));
        let policy = FixedPolicy::prefer_provider();

        let check = reconcile_boundary(&stored, &mut fetched, dec!(0.25), &policy);
        assert_eq!(
            check,
            BoundaryCheck::Mismatch {
                resolution: MismatchResolution::KeepProvider
            }
        );
        // 제공자 값 유지
        assert_eq!(fetched.open, dec!(5000.50));
    }

    #[test]
    fn test_boundary_mismatch_keep_stored_overwrites() {
        let stored = es_daily(dec!(5000.00), dec!(4990.00));
        let mut fetched = es_daily(dec!(5001.00), dec!(5005.00));
        let policy = FixedPolicy::prefer_stored();

        let check = reconcile_boundary(&stored, &mut fetched, dec!(0.25), &policy);
        assert_eq!(
            check,
            BoundaryCheck::Mismatch {
                resolution: MismatchResolution::KeepStored
            }
        );
        // 저장된 값으로 전부 덮어씀 (색상 포함)
        assert_eq!(fetched.open, stored.open);
        assert_eq!(fetched.high, stored.high);
        assert_eq!(fetched.low, stored.low);
        assert_eq!(fetched.close, stored.close);
        assert_eq!(fetched.volume, stored.volume);
        assert_eq!(fetched.color, CandleColor::Red);
    }

    #[test]
    fn test_mismatch_on_close_only() {
        let stored = es_daily(dec!(5000.00), dec!(5005.00));
        let mut fetched = es_daily(dec!(5000.00), dec!(5006.00));
        let policy = FixedPolicy::prefer_provider();

        let check = reconcile_boundary(&stored, &mut fetched, dec!(0.25), &policy);
        assert!(matches!(check, BoundaryCheck::Mismatch { .. }));
    }
}

//! (symbol, timeframe) 쌍별 신선도 검사.

use crate::error::Result;
use sync_core::{Staleness, Symbol, SyncConfig, Timeframe};
use sync_data::CandleStorage;
use sync_provider::CandleProvider;
use tracing::{debug, error, warn};

/// 상태 테이블의 한 행.
#[derive(Debug, Clone, Copy)]
pub struct StatusRow {
    /// 심볼
    pub symbol: Symbol,
    /// 타임프레임
    pub timeframe: Timeframe,
    /// 신선도 판정 결과
    pub staleness: Staleness,
}

/// 전체 쌍 스캔 결과.
#[derive(Debug)]
pub struct ScanReport {
    /// 판정에 성공한 쌍의 상태 행
    pub rows: Vec<StatusRow>,
    /// 저장소 오류로 판정하지 못한 쌍 수
    pub failed_pairs: usize,
}

/// 한 쌍의 저장 데이터가 최신인지 검사합니다.
///
/// 제공자의 최신 캔들(정규화된 타임스탬프)과 저장소의 최신 타임스탬프를
/// 비교합니다. 제공자 오류와 빈 결과는 치명적이지 않으며
/// `NoProviderData`로 보고됩니다. 저장소 조회 오류는 전파됩니다.
pub async fn check_pair(
    store: &dyn CandleStorage,
    provider: &dyn CandleProvider,
    config: &SyncConfig,
    symbol: Symbol,
    timeframe: Timeframe,
) -> Result<Staleness> {
    let provider_latest = match provider.latest(symbol, timeframe).await {
        Ok(Some(raw)) => raw.to_candle(symbol, timeframe).timestamp,
        Ok(None) => {
            debug!(symbol = %symbol, timeframe = %timeframe, "제공자 최신 캔들 없음");
            return Ok(Staleness::NoProviderData);
        }
        Err(e) => {
            warn!(
                symbol = %symbol,
                timeframe = %timeframe,
                error = %e,
                "제공자 최신 캔들 조회 실패"
            );
            return Ok(Staleness::NoProviderData);
        }
    };

    let stored_latest = match store.latest_timestamp(symbol, timeframe).await? {
        Some(ts) => ts,
        None => return Ok(Staleness::NoStoredData),
    };

    if Staleness::within_tolerance(provider_latest, stored_latest, config.staleness_tolerance_secs)
    {
        Ok(Staleness::UpToDate { stored_latest })
    } else {
        Ok(Staleness::Stale { stored_latest })
    }
}

/// 설정된 모든 쌍을 순서대로 검사합니다.
///
/// 한 쌍의 저장소 오류는 그 쌍의 판정만 포기하고 다음 쌍으로
/// 진행합니다. 포기한 쌍 수는 보고서에 집계됩니다.
pub async fn scan_pairs(
    store: &dyn CandleStorage,
    provider: &dyn CandleProvider,
    config: &SyncConfig,
) -> ScanReport {
    let mut rows = Vec::new();
    let mut failed_pairs = 0;

    for (symbol, timeframe) in config.pairs() {
        match check_pair(store, provider, config, symbol, timeframe).await {
            Ok(staleness) => rows.push(StatusRow {
                symbol,
                timeframe,
                staleness,
            }),
            Err(e) => {
                error!(
                    symbol = %symbol,
                    timeframe = %timeframe,
                    error = %e,
                    "신선도 검사 실패, 다음 쌍으로 진행"
                );
                failed_pairs += 1;
            }
        }
    }

    ScanReport { rows, failed_pairs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use sync_core::{Candle, DaemonConfig, MismatchThresholds, Schema};
    use sync_data::DataError;
    use sync_provider::{ProviderError, RawCandle};

    fn test_config() -> SyncConfig {
        SyncConfig {
            database_url: String::new(),
            schema: Schema::Fronttest,
            symbols: vec![Symbol::Es],
            timeframes: vec![Timeframe::M1, Timeframe::M5],
            staleness_tolerance_secs: 90,
            thresholds: MismatchThresholds::default(),
            daemon: DaemonConfig {
                interval_minutes: 60,
            },
        }
    }

    /// 1분봉 조회만 실패하는 저장소.
    struct FlakyStore {
        good: DateTime<Utc>,
    }

    #[async_trait]
    impl CandleStorage for FlakyStore {
        async fn latest_timestamp(
            &self,
            _symbol: Symbol,
            timeframe: Timeframe,
        ) -> sync_data::Result<Option<DateTime<Utc>>> {
            if timeframe == Timeframe::M1 {
                Err(DataError::QueryError("connection reset".to_string()))
            } else {
                Ok(Some(self.good))
            }
        }

        async fn candle_at(
            &self,
            _symbol: Symbol,
            _timeframe: Timeframe,
            _timestamp: DateTime<Utc>,
        ) -> sync_data::Result<Option<Candle>> {
            Ok(None)
        }

        async fn upsert(
            &self,
            _symbol: Symbol,
            _timeframe: Timeframe,
            candles: &[Candle],
        ) -> sync_data::Result<usize> {
            Ok(candles.len())
        }
    }

    struct FixedProvider {
        latest: RawCandle,
    }

    #[async_trait]
    impl CandleProvider for FixedProvider {
        async fn latest(
            &self,
            _symbol: Symbol,
            _timeframe: Timeframe,
        ) -> std::result::Result<Option<RawCandle>, ProviderError> {
            Ok(Some(self.latest))
        }

        async fn history(
            &self,
            _symbol: Symbol,
            _timeframe: Timeframe,
        ) -> std::result::Result<Vec<RawCandle>, ProviderError> {
            Ok(vec![self.latest])
        }
    }

    #[tokio::test]
    async fn test_scan_continues_past_store_error() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 26, 12, 0, 0).unwrap();
        let store = FlakyStore { good: ts };
        let provider = FixedProvider {
            latest: RawCandle {
                timestamp: ts,
                open: 5000.0,
                high: 5010.0,
                low: 4990.0,
                close: 5005.0,
                volume: 100,
            },
        };
        let config = test_config();

        let report = scan_pairs(&store, &provider, &config).await;

        // 1분봉 쌍은 저장소 오류로 빠지고 5분봉 쌍만 판정됨
        assert_eq!(report.failed_pairs, 1);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].timeframe, Timeframe::M5);
        assert!(report.rows[0].staleness.is_up_to_date());
    }
}

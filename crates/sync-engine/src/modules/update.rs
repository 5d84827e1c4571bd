//! 캔들 테이블 동기화 파이프라인.
//!
//! 페어(심볼, 타임프레임)별로 전체 이력을 가져와 정규화하고, 경계
//! 캔들을 검사하고, 1분봉에 한해 데드존을 보충한 뒤 전체 시리즈를
//! 업서트합니다. 업서트는 last-write-wins라 반복 실행해도 결과가
//! 같습니다.

use crate::error::Result;
use crate::modules::reconcile::check_boundary;
use crate::modules::staleness::scan_pairs;
use crate::report::print_status_table;
use crate::stats::SyncStats;
use chrono::{DateTime, Utc};
use std::time::Instant;
use sync_core::{BoundaryCheck, Candle, Deadzone, Symbol, SyncConfig, SyncPolicy, Timeframe};
use sync_data::{ArchiveSource, CandleStorage};
use sync_provider::CandleProvider;
use tracing::{debug, error, info, warn};

/// 한 페어의 동기화 결과.
#[derive(Debug)]
pub struct PairOutcome {
    /// 전체 시리즈 업서트로 쓰인 행 수
    pub written: usize,
    /// 데드존 보충으로 쓰인 행 수
    pub backfilled: usize,
    /// 경계 캔들 검사 결과 (저장된 캔들이 없으면 None)
    pub boundary: Option<BoundaryCheck>,
    /// 감지된 데드존
    pub deadzone: Option<Deadzone>,
    /// 가져온 이력의 시간 범위 (oldest, newest)
    pub range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

/// 한 페어를 동기화합니다.
///
/// 제공자 이력이 비어 있거나 가져오기에 실패하면 `Ok(None)`으로
/// 건너뜁니다. 저장소 쓰기 오류는 전파되어 해당 페어만 중단합니다.
pub async fn sync_pair(
    store: &dyn CandleStorage,
    archive: &dyn ArchiveSource,
    provider: &dyn CandleProvider,
    policy: &dyn SyncPolicy,
    config: &SyncConfig,
    symbol: Symbol,
    timeframe: Timeframe,
) -> Result<Option<PairOutcome>> {
    let raw = match provider.history(symbol, timeframe).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(symbol = %symbol, timeframe = %timeframe, error = %e, "이력 가져오기 실패, 건너뜀");
            return Ok(None);
        }
    };

    if raw.is_empty() {
        warn!(symbol = %symbol, timeframe = %timeframe, "제공자 이력이 비어 있음, 건너뜀");
        return Ok(None);
    }

    let mut fetched: Vec<Candle> = raw
        .iter()
        .map(|r| r.to_candle(symbol, timeframe))
        .collect();
    fetched.sort_by_key(|c| c.timestamp);

    let oldest = fetched.first().map(|c| c.timestamp);
    let newest = fetched.last().map(|c| c.timestamp);
    info!(
        symbol = %symbol,
        timeframe = %timeframe,
        candles = fetched.len(),
        oldest = ?oldest,
        newest = ?newest,
        "이력 가져오기 완료"
    );

    let stored_latest = store.latest_timestamp(symbol, timeframe).await?;

    let mut boundary = None;
    let mut deadzone = None;
    let mut backfilled = 0usize;

    if let Some(stored_latest) = stored_latest {
        boundary = Some(
            check_boundary(store, policy, config, symbol, timeframe, stored_latest, &mut fetched)
                .await?,
        );

        if let Some(fetched_oldest) = oldest {
            if let Some(zone) = Deadzone::detect(stored_latest, fetched_oldest) {
                warn!(
                    symbol = %symbol,
                    timeframe = %timeframe,
                    gap_start = %zone.gap_start,
                    gap_end = %zone.gap_end,
                    "데드존 감지"
                );

                if timeframe == Timeframe::M1 {
                    if policy.should_fill_gap(symbol, timeframe, &zone) {
                        backfilled = backfill_deadzone(store, archive, symbol, &zone).await?;
                    } else {
                        info!(symbol = %symbol, timeframe = %timeframe, "정책에 따라 데드존 보충 생략");
                    }
                } else {
                    info!(
                        symbol = %symbol,
                        timeframe = %timeframe,
                        "1분봉이 아니므로 자동 보충 없음"
                    );
                }

                deadzone = Some(zone);
            }
        }
    } else {
        debug!(symbol = %symbol, timeframe = %timeframe, "저장된 캔들 없음, 전체 이력 적재");
    }

    let written = store.upsert(symbol, timeframe, &fetched).await?;
    info!(symbol = %symbol, timeframe = %timeframe, written, "전체 시리즈 업서트 완료");

    Ok(Some(PairOutcome {
        written,
        backfilled,
        boundary,
        deadzone,
        range: oldest.zip(newest),
    }))
}

/// 1분봉 데드존을 분봉 원본 테이블에서 보충합니다.
///
/// 원본 조회 실패는 경고만 남기고 보충을 생략합니다 (보조 소스).
/// 보충 업서트 실패는 전파되어 해당 페어의 배치를 중단합니다.
async fn backfill_deadzone(
    store: &dyn CandleStorage,
    archive: &dyn ArchiveSource,
    symbol: Symbol,
    zone: &Deadzone,
) -> Result<usize> {
    if zone.is_empty() {
        info!(symbol = %symbol, "데드존 범위가 비어 있음, 보충 생략");
        return Ok(0);
    }

    let rows = match archive.fetch_range(symbol, zone.gap_start, zone.gap_end).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "분봉 원본 조회 실패, 보충 생략");
            return Ok(0);
        }
    };

    if rows.is_empty() {
        info!(symbol = %symbol, "데드존 구간에 원본 분봉 없음");
        return Ok(0);
    }

    let written = store.upsert(symbol, Timeframe::M1, &rows).await?;
    info!(symbol = %symbol, written, "데드존 보충 완료");
    Ok(written)
}

/// 전체 동기화 실행.
///
/// 먼저 모든 페어의 상태를 점검해 표로 출력한 뒤, 최신이 아닌
/// 페어만 동기화합니다. 페어 단위 오류는 집계하고 다음 페어로
/// 진행합니다.
pub async fn run_sync(
    store: &dyn CandleStorage,
    archive: &dyn ArchiveSource,
    provider: &dyn CandleProvider,
    policy: &dyn SyncPolicy,
    config: &SyncConfig,
) -> SyncStats {
    let start = Instant::now();
    let mut stats = SyncStats::default();

    let report = scan_pairs(store, provider, config).await;
    print_status_table(&report.rows);
    stats.errors += report.failed_pairs;

    for row in &report.rows {
        stats.pairs += 1;

        if row.staleness.is_up_to_date() {
            stats.up_to_date += 1;
            continue;
        }

        match sync_pair(store, archive, provider, policy, config, row.symbol, row.timeframe).await {
            Ok(Some(outcome)) => {
                stats.updated += 1;
                stats.candles_written += outcome.written;
                stats.backfilled += outcome.backfilled;
            }
            Ok(None) => {
                stats.skipped_no_data += 1;
            }
            Err(e) => {
                error!(
                    symbol = %row.symbol,
                    timeframe = %row.timeframe,
                    error = %e,
                    "페어 동기화 실패"
                );
                stats.errors += 1;
            }
        }
    }

    stats.elapsed = start.elapsed();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};
    use sync_core::{normalize, DaemonConfig, FixedPolicy, MismatchThresholds, Schema};
    use sync_data::DataError;
    use sync_provider::{ProviderError, RawCandle};

    fn test_config() -> SyncConfig {
        SyncConfig {
            database_url: String::new(),
            schema: Schema::Fronttest,
            symbols: vec![Symbol::Es],
            timeframes: vec![Timeframe::M1],
            staleness_tolerance_secs: 90,
            thresholds: MismatchThresholds::default(),
            daemon: DaemonConfig {
                interval_minutes: 60,
            },
        }
    }

    fn minute(min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 26, 10, min, 0).unwrap()
    }

    fn raw_minute(min: u32) -> RawCandle {
        RawCandle {
            timestamp: minute(min),
            open: 5000.0,
            high: 5010.0,
            low: 4990.0,
            close: 5005.0,
            volume: 100,
        }
    }

    fn archive_minute(min: u32) -> Candle {
        normalize::candle(
            Symbol::Es,
            Timeframe::M1,
            minute(min),
            dec!(5001),
            dec!(5002),
            dec!(5000),
            dec!(5001.5),
            50,
        )
    }

    /// 업서트 호출 순서를 기록하는 메모리 저장소.
    struct MemoryStore {
        latest: Option<DateTime<Utc>>,
        fail_first_upsert: bool,
        upserts: Arc<Mutex<Vec<usize>>>,
    }

    #[async_trait]
    impl CandleStorage for MemoryStore {
        async fn latest_timestamp(
            &self,
            _symbol: Symbol,
            _timeframe: Timeframe,
        ) -> sync_data::Result<Option<DateTime<Utc>>> {
            Ok(self.latest)
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
            let mut upserts = self.upserts.lock().unwrap();
            if self.fail_first_upsert && upserts.is_empty() {
                return Err(DataError::InsertError("disk full".to_string()));
            }
            upserts.push(candles.len());
            Ok(candles.len())
        }
    }

    struct MemoryArchive {
        rows: Vec<Candle>,
    }

    #[async_trait]
    impl ArchiveSource for MemoryArchive {
        async fn fetch_range(
            &self,
            _symbol: Symbol,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> sync_data::Result<Vec<Candle>> {
            Ok(self
                .rows
                .iter()
                .filter(|c| c.timestamp >= start && c.timestamp <= end)
                .cloned()
                .collect())
        }
    }

    struct FixedHistoryProvider {
        history: Vec<RawCandle>,
    }

    #[async_trait]
    impl CandleProvider for FixedHistoryProvider {
        async fn latest(
            &self,
            _symbol: Symbol,
            _timeframe: Timeframe,
        ) -> std::result::Result<Option<RawCandle>, ProviderError> {
            Ok(self.history.last().copied())
        }

        async fn history(
            &self,
            _symbol: Symbol,
            _timeframe: Timeframe,
        ) -> std::result::Result<Vec<RawCandle>, ProviderError> {
            Ok(self.history.clone())
        }
    }

    #[tokio::test]
    async fn test_backfill_runs_before_series_upsert() {
        // 저장소 최신 10:00, 이력은 10:10부터 => 데드존 [10:00:01, 10:09:59]
        let upserts = Arc::new(Mutex::new(Vec::new()));
        let store = MemoryStore {
            latest: Some(minute(0)),
            fail_first_upsert: false,
            upserts: Arc::clone(&upserts),
        };
        let archive = MemoryArchive {
            rows: vec![archive_minute(2), archive_minute(4), archive_minute(6)],
        };
        let provider = FixedHistoryProvider {
            history: vec![raw_minute(10), raw_minute(11), raw_minute(12), raw_minute(13)],
        };
        let policy = FixedPolicy::prefer_provider();
        let config = test_config();

        let outcome = sync_pair(
            &store,
            &archive,
            &provider,
            &policy,
            &config,
            Symbol::Es,
            Timeframe::M1,
        )
        .await
        .unwrap()
        .expect("페어가 동기화되어야 함");

        // 보충(원본 3행)이 전체 시리즈(4행)보다 먼저 기록됨
        assert_eq!(*upserts.lock().unwrap(), vec![3, 4]);
        assert_eq!(outcome.backfilled, 3);
        assert_eq!(outcome.written, 4);
        assert!(outcome.deadzone.is_some());
        assert_eq!(outcome.boundary, Some(BoundaryCheck::Missing));
    }

    #[tokio::test]
    async fn test_backfill_write_failure_aborts_pair() {
        let upserts = Arc::new(Mutex::new(Vec::new()));
        let store = MemoryStore {
            latest: Some(minute(0)),
            fail_first_upsert: true,
            upserts: Arc::clone(&upserts),
        };
        let archive = MemoryArchive {
            rows: vec![archive_minute(2)],
        };
        let provider = FixedHistoryProvider {
            history: vec![raw_minute(10), raw_minute(11)],
        };
        let policy = FixedPolicy::prefer_provider();
        let config = test_config();

        let result = sync_pair(
            &store,
            &archive,
            &provider,
            &policy,
            &config,
            Symbol::Es,
            Timeframe::M1,
        )
        .await;

        // 보충 쓰기 실패는 페어를 중단시키고 시리즈 업서트도 막는다
        assert!(result.is_err());
        assert!(upserts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gap_fill_disabled_skips_backfill() {
        let upserts = Arc::new(Mutex::new(Vec::new()));
        let store = MemoryStore {
            latest: Some(minute(0)),
            fail_first_upsert: false,
            upserts: Arc::clone(&upserts),
        };
        let archive = MemoryArchive {
            rows: vec![archive_minute(2)],
        };
        let provider = FixedHistoryProvider {
            history: vec![raw_minute(10), raw_minute(11)],
        };
        let policy = FixedPolicy::prefer_provider().with_gap_fill(false);
        let config = test_config();

        let outcome = sync_pair(
            &store,
            &archive,
            &provider,
            &policy,
            &config,
            Symbol::Es,
            Timeframe::M1,
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(outcome.backfilled, 0);
        assert_eq!(*upserts.lock().unwrap(), vec![2]);
    }
}

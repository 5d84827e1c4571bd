//! 동기화 실행 통계.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 한 번의 동기화 실행에 대한 통계.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStats {
    /// 스캔한 (symbol, timeframe) 쌍 수
    pub pairs: usize,
    /// 이미 최신 상태였던 쌍 수
    pub up_to_date: usize,
    /// 갱신된 쌍 수
    pub updated: usize,
    /// 제공자 데이터 없음으로 건너뛴 쌍 수
    pub skipped_no_data: usize,
    /// 에러가 발생한 쌍 수
    pub errors: usize,
    /// 기록된 총 캔들 수
    pub candles_written: usize,
    /// 아카이브에서 채워진 캔들 수
    pub backfilled: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl SyncStats {
    /// 새 통계 객체를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 통계 요약 로그를 출력합니다.
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            pairs = self.pairs,
            up_to_date = self.up_to_date,
            updated = self.updated,
            skipped_no_data = self.skipped_no_data,
            errors = self.errors,
            candles_written = self.candles_written,
            backfilled = self.backfilled,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "동기화 완료"
        );
    }
}

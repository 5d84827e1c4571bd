//! Postgres 저장소 모듈.

pub mod archive;
pub mod candles;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sync_core::{Candle, Symbol, Timeframe};

/// 캔들 테이블 저장소 연산.
///
/// 동기화 워크플로우는 이 trait를 통해 저장소에 접근하므로 테스트에서
/// 메모리 구현으로 대체할 수 있습니다.
#[async_trait]
pub trait CandleStorage: Send + Sync {
    /// 해당 쌍의 가장 최근 캔들 타임스탬프를 조회합니다.
    async fn latest_timestamp(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
    ) -> Result<Option<DateTime<Utc>>>;

    /// 특정 타임스탬프의 저장된 캔들을 조회합니다.
    async fn candle_at(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<Candle>>;

    /// 캔들 시퀀스를 업서트하고 기록된 행 수를 반환합니다.
    async fn upsert(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
        candles: &[Candle],
    ) -> Result<usize>;
}

/// 보조 1분봉 소스 조회.
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    /// 포함 범위 `[start, end]`의 1분봉을 시간 오름차순으로 조회합니다.
    async fn fetch_range(
        &self,
        symbol: Symbol,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Candle>>;
}

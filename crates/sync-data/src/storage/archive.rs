//! 원본 1분봉 아카이브 조회.
//!
//! `public.<symbol>_1m` 테이블은 동기화 대상과 다른 네임스페이스에 있는
//! 보조 소스입니다. 데드존 채우기에서 포함 범위로 조회됩니다.

use crate::error::{DataError, Result};
use crate::storage::ArchiveSource;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use tracing::{debug, instrument};
use sync_core::{normalize, Candle, Schema, Symbol, Timeframe};

/// 원본 1분봉 아카이브 핸들.
#[derive(Clone)]
pub struct MinuteArchive {
    pool: PgPool,
}

impl MinuteArchive {
    /// 새 아카이브 핸들을 생성합니다.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 포함 범위 `[start, end]`의 1분봉을 시간 오름차순으로 조회합니다.
    ///
    /// 각 행은 정규화 경로를 거치며 색상은 시가/종가에서 다시 계산됩니다.
    #[instrument(skip(self))]
    pub async fn fetch_range(
        &self,
        symbol: Symbol,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Candle>> {
        let sql = format!(
            r#"
            SELECT timestamp, open, high, low, close, volume
              FROM {}.{}_1m
             WHERE timestamp >= $1
               AND timestamp <= $2
             ORDER BY timestamp ASC
            "#,
            Schema::Public.as_str(),
            symbol.as_str()
        );

        let rows: Vec<(DateTime<Utc>, Decimal, Decimal, Decimal, Decimal, i64)> =
            sqlx::query_as(&sql)
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DataError::QueryError(e.to_string()))?;

        let candles: Vec<Candle> = rows
            .into_iter()
            .map(|(timestamp, open, high, low, close, volume)| {
                normalize::candle(
                    symbol,
                    Timeframe::M1,
                    timestamp,
                    open,
                    high,
                    low,
                    close,
                    volume,
                )
            })
            .collect();

        debug!(
            symbol = %symbol,
            start = %start,
            end = %end,
            count = candles.len(),
            "아카이브 범위 조회"
        );

        Ok(candles)
    }
}

#[async_trait]
impl ArchiveSource for MinuteArchive {
    async fn fetch_range(
        &self,
        symbol: Symbol,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Candle>> {
        MinuteArchive::fetch_range(self, symbol, start, end).await
    }
}

impl std::fmt::Debug for MinuteArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinuteArchive").finish_non_exhaustive()
    }
}

//! 캔들 테이블 조회 및 업서트.
//!
//! 테이블 이름은 `Schema`/`Symbol`/`Timeframe` 닫힌 열거형의
//! `&'static str` 조각으로만 구성됩니다. 외부 문자열은 식별자로
//! 사용되지 않으며, 값은 모두 바인드 파라미터로 전달됩니다.

use crate::error::{DataError, Result};
use crate::storage::CandleStorage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use sync_core::{Candle, CandleColor, Schema, Symbol, Timeframe};

/// UNNEST 일괄 업서트의 청크 크기.
const UPSERT_CHUNK_SIZE: usize = 500;

/// 배치 내 같은 타임스탬프의 캔들 중 마지막 것만 남깁니다.
///
/// Postgres는 한 문장에서 같은 행을 두 번 갱신하지 못하므로, 정렬
/// 규칙이 두 입력 행을 같은 타임스탬프로 모은 경우(예: 일봉 앵커)
/// 배치를 먼저 중복 제거해야 합니다. 결과는 시간 오름차순입니다.
fn dedup_last_write(candles: &[Candle]) -> Vec<&Candle> {
    let mut by_timestamp: BTreeMap<DateTime<Utc>, &Candle> = BTreeMap::new();
    for candle in candles {
        by_timestamp.insert(candle.timestamp, candle);
    }
    by_timestamp.into_values().collect()
}

/// 한 스키마의 캔들 테이블 집합에 대한 저장소 핸들.
#[derive(Clone)]
pub struct CandleStore {
    pool: PgPool,
    schema: Schema,
}

impl CandleStore {
    /// 새 저장소 핸들을 생성합니다.
    pub fn new(pool: PgPool, schema: Schema) -> Self {
        Self { pool, schema }
    }

    /// 이 저장소가 가리키는 스키마를 반환합니다.
    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// 해당 쌍의 정규화된 테이블 이름을 반환합니다.
    fn table(&self, symbol: Symbol, timeframe: Timeframe) -> String {
        format!(
            "{}.{}_{}",
            self.schema.as_str(),
            symbol.as_str(),
            timeframe.as_str()
        )
    }

    /// 해당 쌍의 가장 최근 캔들 타임스탬프를 조회합니다.
    ///
    /// 테이블이 비어 있으면 `None`을 반환합니다.
    #[instrument(skip(self))]
    pub async fn latest_timestamp(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
    ) -> Result<Option<DateTime<Utc>>> {
        let sql = format!(
            "SELECT MAX(timestamp) FROM {}",
            self.table(symbol, timeframe)
        );

        let max_ts: Option<DateTime<Utc>> = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DataError::QueryError(e.to_string()))?;

        Ok(max_ts)
    }

    /// 특정 타임스탬프의 저장된 캔들을 조회합니다 (경계 캔들 검사용).
    ///
    /// 색상은 저장된 값 대신 시가/종가에서 다시 계산합니다.
    #[instrument(skip(self))]
    pub async fn candle_at(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<Candle>> {
        let sql = format!(
            "SELECT open, high, low, close, volume FROM {} WHERE timestamp = $1 LIMIT 1",
            self.table(symbol, timeframe)
        );

        let row: Option<(Decimal, Decimal, Decimal, Decimal, i64)> = sqlx::query_as(&sql)
            .bind(timestamp)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DataError::QueryError(e.to_string()))?;

        Ok(row.map(|(open, high, low, close, volume)| Candle {
            symbol,
            timeframe,
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            color: CandleColor::from_prices(open, close),
        }))
    }

    /// 캔들 시퀀스를 업서트합니다.
    ///
    /// (symbol, timestamp) 충돌 시 키가 아닌 모든 컬럼을 새 값으로
    /// 덮어씁니다 (last-write-wins, 병합 연산 없음). 같은 입력으로
    /// 반복 호출해도 결과가 같습니다 (멱등). 배치 내에 같은
    /// 타임스탬프가 여러 번 나오면 마지막 캔들이 이깁니다.
    ///
    /// 전체 배치는 하나의 트랜잭션으로 실행되어 모두 커밋되거나
    /// 모두 롤백됩니다. 기록된 행 수를 반환합니다.
    #[instrument(skip(self, candles), fields(count = candles.len()))]
    pub async fn upsert(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
        candles: &[Candle],
    ) -> Result<usize> {
        if candles.is_empty() {
            return Ok(0);
        }

        let deduped = dedup_last_write(candles);

        let sql = format!(
            r#"
            INSERT INTO {}
                (symbol, timestamp, open, high, low, close, volume, candle_color)
            SELECT * FROM UNNEST(
                $1::text[], $2::timestamptz[],
                $3::numeric[], $4::numeric[], $5::numeric[], $6::numeric[],
                $7::int8[], $8::text[]
            )
            ON CONFLICT (symbol, timestamp) DO UPDATE SET
                open         = EXCLUDED.open,
                high         = EXCLUDED.high,
                low          = EXCLUDED.low,
                close        = EXCLUDED.close,
                volume       = EXCLUDED.volume,
                candle_color = EXCLUDED.candle_color
            "#,
            self.table(symbol, timeframe)
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let mut written = 0;

        for chunk in deduped.chunks(UPSERT_CHUNK_SIZE) {
            let symbols: Vec<&str> = chunk.iter().map(|_| symbol.as_str()).collect();
            let timestamps: Vec<DateTime<Utc>> = chunk.iter().map(|c| c.timestamp).collect();
            let opens: Vec<Decimal> = chunk.iter().map(|c| c.open).collect();
            let highs: Vec<Decimal> = chunk.iter().map(|c| c.high).collect();
            let lows: Vec<Decimal> = chunk.iter().map(|c| c.low).collect();
            let closes: Vec<Decimal> = chunk.iter().map(|c| c.close).collect();
            let volumes: Vec<i64> = chunk.iter().map(|c| c.volume).collect();
            let colors: Vec<&str> = chunk.iter().map(|c| c.color.as_str()).collect();

            let result = sqlx::query(&sql)
                .bind(&symbols)
                .bind(&timestamps)
                .bind(&opens)
                .bind(&highs)
                .bind(&lows)
                .bind(&closes)
                .bind(&volumes)
                .bind(&colors)
                .execute(&mut *tx)
                .await
                .map_err(|e| DataError::InsertError(e.to_string()))?;

            written += result.rows_affected() as usize;
        }

        tx.commit()
            .await
            .map_err(|e| DataError::InsertError(e.to_string()))?;

        debug!(
            symbol = %symbol,
            timeframe = %timeframe,
            schema = %self.schema,
            written = written,
            "캔들 업서트 완료"
        );

        Ok(written)
    }
}

#[async_trait]
impl CandleStorage for CandleStore {
    async fn latest_timestamp(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
    ) -> Result<Option<DateTime<Utc>>> {
        CandleStore::latest_timestamp(self, symbol, timeframe).await
    }

    async fn candle_at(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<Candle>> {
        CandleStore::candle_at(self, symbol, timeframe, timestamp).await
    }

    async fn upsert(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
        candles: &[Candle],
    ) -> Result<usize> {
        CandleStore::upsert(self, symbol, timeframe, candles).await
    }
}

impl std::fmt::Debug for CandleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandleStore")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

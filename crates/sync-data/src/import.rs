//! JSON 덤프 문서 임포트.
//!
//! 벌크 로더가 읽는 덤프 문서는 테이블 목록을 담고 있으며, 각 테이블은
//! 짧은 이름(`es_1m`)과 행 목록을 가집니다. 짧은 이름은 닫힌
//! (Symbol, Timeframe) 집합에 대해 파싱되며, 파싱에 실패한 테이블은
//! 경고와 함께 건너뜁니다. 외부 문자열이 식별자가 되는 일은 없습니다.

use crate::error::{DataError, Result};
use crate::storage::candles::CandleStore;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};
use sync_core::{Candle, CandleColor, Symbol, Timeframe};

/// 덤프 문서 전체.
#[derive(Debug, Deserialize)]
pub struct DumpDocument {
    /// 테이블 목록
    pub tables: Vec<DumpTable>,
}

/// 덤프 문서 내 한 테이블.
#[derive(Debug, Deserialize)]
pub struct DumpTable {
    /// 짧은 테이블 이름 (예: "es_1m")
    pub table: String,
    /// 행 목록
    #[serde(default)]
    pub rows: Vec<DumpRow>,
}

/// 덤프 문서의 한 행.
#[derive(Debug, Deserialize)]
pub struct DumpRow {
    /// 심볼 문자열 (테이블 이름에서 파싱한 심볼이 우선함)
    pub symbol: String,
    /// ISO-8601 타임스탬프
    pub timestamp: String,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: i64,
    /// 덤프에 기록된 색상 (참고용, 저장 시 재계산됨)
    pub candle_color: String,
}

/// 임포트 작업 통계.
#[derive(Debug, Clone, Default)]
pub struct ImportStats {
    /// 임포트된 테이블 수
    pub tables: usize,
    /// 기록된 행 수
    pub rows_written: usize,
    /// 빈 테이블로 건너뛴 수
    pub skipped_empty: usize,
    /// 알 수 없는 테이블 이름으로 건너뛴 수
    pub skipped_unknown: usize,
}

/// 짧은 테이블 이름을 닫힌 (Symbol, Timeframe) 집합으로 파싱합니다.
pub fn parse_table_name(short_name: &str) -> Result<(Symbol, Timeframe)> {
    let (sym_str, tf_str) = short_name.rsplit_once('_').ok_or_else(|| {
        DataError::InvalidData(format!("Malformed table name: {}", short_name))
    })?;

    let symbol = sym_str
        .parse::<Symbol>()
        .map_err(DataError::InvalidData)?;
    let timeframe = tf_str
        .parse::<Timeframe>()
        .map_err(DataError::InvalidData)?;

    Ok((symbol, timeframe))
}

/// 덤프 행을 정규화된 캔들로 변환합니다.
///
/// 타임스탬프는 ISO-8601에서 UTC로 변환하고, 색상은 덤프 값 대신
/// 시가/종가에서 다시 계산합니다. 덤프 행은 이미 정렬 규칙이 적용된
/// 상태이므로 추가 이동은 하지 않습니다.
pub fn row_to_candle(symbol: Symbol, timeframe: Timeframe, row: &DumpRow) -> Result<Candle> {
    let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.timestamp)
        .map_err(|e| DataError::ParseError(format!("timestamp '{}': {}", row.timestamp, e)))?
        .with_timezone(&Utc);

    Ok(Candle {
        symbol,
        timeframe,
        timestamp,
        open: row.open,
        high: row.high,
        low: row.low,
        close: row.close,
        volume: row.volume,
        color: CandleColor::from_prices(row.open, row.close),
    })
}

/// 덤프 문서 하나를 대상 스키마로 임포트합니다.
///
/// 빈 테이블과 알 수 없는 테이블 이름은 건너뛰고 계속 진행합니다.
/// 개별 테이블의 쓰기 실패는 해당 문서의 임포트를 중단시킵니다
/// (배치는 테이블 단위로 원자적입니다).
pub async fn import_document(store: &CandleStore, document: DumpDocument) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    for table_info in document.tables {
        let (symbol, timeframe) = match parse_table_name(&table_info.table) {
            Ok(pair) => pair,
            Err(e) => {
                warn!(table = %table_info.table, error = %e, "알 수 없는 테이블 이름, 건너뜀");
                stats.skipped_unknown += 1;
                continue;
            }
        };

        if table_info.rows.is_empty() {
            info!(
                table = %table_info.table,
                schema = %store.schema(),
                "덤프에 행이 없음, 건너뜀"
            );
            stats.skipped_empty += 1;
            continue;
        }

        let candles: Vec<Candle> = table_info
            .rows
            .iter()
            .map(|row| row_to_candle(symbol, timeframe, row))
            .collect::<Result<_>>()?;

        let written = store.upsert(symbol, timeframe, &candles).await?;

        info!(
            table = %table_info.table,
            schema = %store.schema(),
            written = written,
            "테이블 임포트 완료"
        );

        stats.tables += 1;
        stats.rows_written += written;
    }

    Ok(stats)
}

//! Yahoo Finance 캔들 데이터 제공자.
//!
//! # 심볼/간격 매핑
//!
//! - 심볼은 `Symbol::yahoo_symbol()` 형식으로 전달됩니다 (ES=F, EURUSD=X, SPY)
//! - Yahoo는 "1h" 대신 "60m"을 사용하므로 간격은 `Timeframe::yahoo_interval()`로 변환
//! - 최신 캔들 확인은 짧은 범위(5d/1mo), 전체 이력은 range="max"로 조회

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

use crate::error::ProviderError;
use crate::provider::{CandleProvider, RawCandle};
use sync_core::{Symbol, Timeframe};

/// Yahoo Finance 제공자.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    /// 새 Yahoo Finance 제공자를 생성합니다.
    pub fn new() -> Result<Self, ProviderError> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| ProviderError::NetworkError(format!("Yahoo Finance 연결 실패: {}", e)))?;

        Ok(Self { connector })
    }

    /// 주어진 범위의 캔들을 시간 오름차순으로 조회합니다.
    async fn fetch_range(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
        range: &str,
    ) -> Result<Vec<RawCandle>, ProviderError> {
        let yahoo_symbol = symbol.yahoo_symbol();
        let interval = timeframe.yahoo_interval();

        debug!(
            symbol = yahoo_symbol,
            interval = interval,
            range = range,
            "Yahoo Finance 조회"
        );

        let response = self
            .connector
            .get_quote_range(yahoo_symbol, interval, range)
            .await
            .map_err(|e| {
                ProviderError::ApiError(format!("Yahoo Finance API 오류 ({}): {}", yahoo_symbol, e))
            })?;

        let quotes = response
            .quotes()
            .map_err(|e| ProviderError::ParseError(format!("Quote 파싱 오류: {}", e)))?;

        if quotes.is_empty() {
            warn!(symbol = yahoo_symbol, range = range, "Yahoo Finance 데이터 없음");
            return Ok(Vec::new());
        }

        let mut candles: Vec<RawCandle> = quotes
            .iter()
            .map(|q| RawCandle {
                timestamp: Utc
                    .timestamp_opt(q.timestamp, 0)
                    .single()
                    .unwrap_or_else(Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .collect();

        candles.sort_by_key(|c| c.timestamp);

        Ok(candles)
    }
}

#[async_trait]
impl CandleProvider for YahooProvider {
    async fn latest(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
    ) -> Result<Option<RawCandle>, ProviderError> {
        let candles = self
            .fetch_range(symbol, timeframe, timeframe.probe_range())
            .await?;

        Ok(candles.last().copied())
    }

    async fn history(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
    ) -> Result<Vec<RawCandle>, ProviderError> {
        self.fetch_range(symbol, timeframe, "max").await
    }
}

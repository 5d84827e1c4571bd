//! 환경변수 기반 설정 모듈.

use crate::error::{CoreError, CoreResult};
use crate::types::{Schema, Symbol, Timeframe};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

/// 기본 스캔 대상 타임프레임 (4시간봉 제외).
pub const DEFAULT_TIMEFRAMES: [Timeframe; 6] = [
    Timeframe::M1,
    Timeframe::M5,
    Timeframe::M15,
    Timeframe::M30,
    Timeframe::H1,
    Timeframe::D1,
];

/// 동기화 엔진 전체 설정.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// 데이터베이스 URL
    pub database_url: String,
    /// 동기화 대상 스키마
    pub schema: Schema,
    /// 스캔 대상 심볼 목록
    pub symbols: Vec<Symbol>,
    /// 스캔 대상 타임프레임 목록
    pub timeframes: Vec<Timeframe>,
    /// 신선도 허용 오차 (초, 경계 포함)
    pub staleness_tolerance_secs: i64,
    /// 심볼별 경계 캔들 불일치 허용 오차
    pub thresholds: MismatchThresholds,
    /// 데몬 모드 설정
    pub daemon: DaemonConfig,
}

/// 심볼별 경계 캔들 불일치 허용 오차 (절대 가격 차이).
#[derive(Debug, Clone)]
pub struct MismatchThresholds {
    /// ES 선물
    pub es: Decimal,
    /// EURUSD 외환
    pub eurusd: Decimal,
    /// SPY ETF
    pub spy: Decimal,
    /// 목록에 없는 심볼의 기본값
    pub default: Decimal,
}

impl Default for MismatchThresholds {
    fn default() -> Self {
        Self {
            es: dec!(0.25),
            eurusd: dec!(0.0005),
            spy: dec!(0.1),
            default: dec!(0.01),
        }
    }
}

impl MismatchThresholds {
    /// 해당 심볼의 허용 오차를 반환합니다.
    pub fn for_symbol(&self, symbol: Symbol) -> Decimal {
        match symbol {
            Symbol::Es => self.es,
            Symbol::Eurusd => self.eurusd,
            Symbol::Spy => self.spy,
        }
    }
}

/// 데몬 모드 설정.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// 워크플로우 실행 주기 (분 단위)
    pub interval_minutes: u64,
}

impl DaemonConfig {
    /// 워크플로우 실행 주기를 Duration으로 반환합니다.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }
}

impl SyncConfig {
    /// 환경변수에서 설정을 로드합니다.
    pub fn from_env() -> CoreResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            CoreError::Config("DATABASE_URL 환경변수가 설정되지 않았습니다".to_string())
        })?;

        let schema = match std::env::var("SYNC_SCHEMA") {
            Ok(s) => s.parse().map_err(CoreError::Config)?,
            Err(_) => Schema::Fronttest,
        };

        let symbols = match std::env::var("SYNC_SYMBOLS") {
            Ok(s) => parse_csv(&s).map_err(CoreError::Config)?,
            Err(_) => Symbol::ALL.to_vec(),
        };

        let timeframes = match std::env::var("SYNC_TIMEFRAMES") {
            Ok(s) => parse_csv(&s).map_err(CoreError::Config)?,
            Err(_) => DEFAULT_TIMEFRAMES.to_vec(),
        };

        let defaults = MismatchThresholds::default();
        let thresholds = MismatchThresholds {
            es: env_var_parse("MATCH_THRESHOLD_ES", defaults.es),
            eurusd: env_var_parse("MATCH_THRESHOLD_EURUSD", defaults.eurusd),
            spy: env_var_parse("MATCH_THRESHOLD_SPY", defaults.spy),
            default: env_var_parse("MATCH_THRESHOLD_DEFAULT", defaults.default),
        };

        Ok(Self {
            database_url,
            schema,
            symbols,
            timeframes,
            staleness_tolerance_secs: env_var_parse("STALENESS_TOLERANCE_SECS", 90),
            thresholds,
            daemon: DaemonConfig {
                interval_minutes: env_var_parse("DAEMON_INTERVAL_MINUTES", 60),
            },
        })
    }

    /// 스캔 대상 (symbol, timeframe) 쌍을 순서대로 반환합니다.
    pub fn pairs(&self) -> Vec<(Symbol, Timeframe)> {
        let mut pairs = Vec::with_capacity(self.symbols.len() * self.timeframes.len());
        for &symbol in &self.symbols {
            for &timeframe in &self.timeframes {
                pairs.push((symbol, timeframe));
            }
        }
        pairs
    }

    /// 해당 심볼의 불일치 허용 오차를 반환합니다.
    pub fn mismatch_threshold(&self, symbol: Symbol) -> Decimal {
        self.thresholds.for_symbol(symbol)
    }
}

/// 쉼표로 구분된 목록을 파싱합니다.
fn parse_csv<T: std::str::FromStr<Err = String>>(value: &str) -> Result<Vec<T>, String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse())
        .collect()
}

/// 환경변수에서 값을 파싱합니다 (실패 시 기본값 사용).
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

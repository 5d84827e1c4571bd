//! 캔들 테이블 동기화 엔진.
//!
//! 이 crate는 (symbol, timeframe) 쌍별 캔들 테이블을 외부 제공자와
//! 동기화하는 바이너리를 제공합니다:
//! - 신선도 스캔 (90초 허용 오차, 경계 포함)
//! - 경계 캔들 정합성 검사 및 정책 기반 불일치 해소
//! - 데드존 탐지 및 1분봉 아카이브 채우기
//! - 멱등 업서트

pub mod error;
pub mod modules;
pub mod report;
pub mod stats;

pub use error::{Result, SyncError};
pub use stats::SyncStats;

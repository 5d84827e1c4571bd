//! 시장 데이터 제공자 인터페이스.
//!
//! 이 crate는 다음을 제공합니다:
//! - `CandleProvider` trait (최신 캔들 확인 / 전체 이력 조회)
//! - Yahoo Finance 구현체
//! - 원시 제공자 행을 표준 캔들로 변환하는 경로

pub mod error;
pub mod provider;
pub mod yahoo;

pub use error::ProviderError;
pub use provider::{CandleProvider, RawCandle};
pub use yahoo::YahooProvider;

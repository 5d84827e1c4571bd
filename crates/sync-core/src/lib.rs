//! # Sync Core
//!
//! 캔들 동기화 시스템의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 캔들(OHLCV) 및 캔들 색상 정의
//! - 심볼, 타임프레임, 스키마 열거형 (닫힌 집합)
//! - 타임스탬프 정규화 규칙
//! - 신선도(staleness) / 데드존 / 경계 캔들 판정 타입
//! - 불일치 해소 정책 trait
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use types::*;

//! 동기화 시스템의 에러 타입.

use thiserror::Error;

/// 핵심 도메인 에러.
///
/// 열거형 파싱 실패는 `FromStr`의 `String` 오류로 전달되며 설정
/// 로드 시 `Config`로 승격됩니다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

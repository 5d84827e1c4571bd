//! 제공자 에러 타입.

use thiserror::Error;

/// 시장 데이터 제공자 관련 에러.
///
/// 제공자 오류는 호출 측에서 해당 (symbol, timeframe) 쌍의 처리만
/// 중단시키며 전체 실행을 멈추지 않습니다.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 제공자 API 에러
    #[error("API error: {0}")]
    ApiError(String),

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    ParseError(String),
}

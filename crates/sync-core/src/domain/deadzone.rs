//! 데드존(캔들 공백 구간) 탐지.

use chrono::{DateTime, Duration, Utc};

/// 저장소 최신 캔들과 새로 가져온 이력의 가장 오래된 캔들 사이의 공백 구간.
///
/// `gap_start = stored_latest + 1s`, `gap_end = fetched_oldest - 1s`로
/// 정의되는 포함 범위입니다. 범위가 비어 있어도 (`gap_end <= gap_start`)
/// 데드존 자체는 보고 대상입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadzone {
    /// 공백 시작 (포함)
    pub gap_start: DateTime<Utc>,
    /// 공백 끝 (포함)
    pub gap_end: DateTime<Utc>,
}

impl Deadzone {
    /// 데드존 존재 여부를 판정합니다.
    ///
    /// 가져온 이력의 가장 오래된 타임스탬프가 저장소 최신보다 엄격히
    /// 늦은 경우에만 데드존이 존재합니다.
    pub fn detect(
        stored_latest: DateTime<Utc>,
        fetched_oldest: DateTime<Utc>,
    ) -> Option<Deadzone> {
        if fetched_oldest > stored_latest {
            Some(Deadzone {
                gap_start: stored_latest + Duration::seconds(1),
                gap_end: fetched_oldest - Duration::seconds(1),
            })
        } else {
            None
        }
    }

    /// 채울 것이 없는 0 또는 음수 범위인지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.gap_end <= self.gap_start
    }
}

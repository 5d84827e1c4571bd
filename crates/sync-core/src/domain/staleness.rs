//! 저장 데이터의 신선도 판정.

use chrono::{DateTime, Utc};

/// (symbol, timeframe) 쌍에 대한 신선도 판정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// 저장 데이터가 최신 상태 (허용 오차 이내)
    UpToDate {
        /// 저장소의 최신 캔들 타임스탬프
        stored_latest: DateTime<Utc>,
    },
    /// 저장 데이터가 오래됨 (저장된 최신 타임스탬프 포함)
    Stale {
        /// 저장소의 최신 캔들 타임스탬프
        stored_latest: DateTime<Utc>,
    },
    /// 제공자에서 데이터를 받지 못함 (오류 또는 빈 결과)
    NoProviderData,
    /// 저장소에 해당 쌍의 데이터가 없음
    NoStoredData,
}

impl Staleness {
    /// 최신 상태인지 확인합니다.
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Staleness::UpToDate { .. })
    }

    /// 제공자/저장소 최신 타임스탬프 차이가 허용 오차 이내인지 판정합니다.
    ///
    /// 경계는 포함입니다: 차이가 정확히 `tolerance_secs`이면 최신으로 봅니다.
    pub fn within_tolerance(
        provider_latest: DateTime<Utc>,
        stored_latest: DateTime<Utc>,
        tolerance_secs: i64,
    ) -> bool {
        let diff = (provider_latest - stored_latest).num_seconds().abs();
        diff <= tolerance_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tolerance_boundary_inclusive() {
        let stored = Utc.with_ymd_and_hms(2025, 3, 26, 12, 0, 0).unwrap();
        let provider_90 = stored + chrono::Duration::seconds(90);
        let provider_91 = stored + chrono::Duration::seconds(91);

        assert!(Staleness::within_tolerance(provider_90, stored, 90));
        assert!(!Staleness::within_tolerance(provider_91, stored, 90));
    }

    #[test]
    fn test_tolerance_symmetric() {
        let stored = Utc.with_ymd_and_hms(2025, 3, 26, 12, 0, 0).unwrap();
        let provider = stored - chrono::Duration::seconds(60);

        // 저장소가 제공자보다 앞서는 경우에도 절대값 비교
        assert!(Staleness::within_tolerance(provider, stored, 90));
    }
}

//! 경계 캔들 불일치 해소 정책.
//!
//! 원래 운영 절차에서는 불일치와 데드존 채우기를 사람이 프롬프트로
//! 결정했습니다. 여기서는 그 결정 지점을 주입 가능한 trait로 대체하여
//! 비대화식 실행과 테스트 더블을 모두 지원합니다.

use crate::domain::{Candle, Deadzone};
use crate::types::{Symbol, Timeframe};

/// 불일치 해소 방법.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchResolution {
    /// 저장된 캔들 값을 유지 (가져온 캔들을 메모리에서 덮어씀)
    KeepStored,
    /// 제공자 캔들 값을 유지 (업서트 시 저장소가 덮어써짐)
    KeepProvider,
}

/// 경계 캔들 검사 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCheck {
    /// 가져온 이력에 경계 타임스탬프가 없어 검사 생략
    Missing,
    /// 허용 오차 이내 일치
    Match,
    /// 불일치, 정책에 따라 해소됨
    Mismatch {
        /// 적용된 해소 방법
        resolution: MismatchResolution,
    },
}

/// 동기화 중 발생하는 결정 지점을 해소하는 정책.
pub trait SyncPolicy: Send + Sync {
    /// 경계 캔들 불일치 시 어느 쪽을 유지할지 결정합니다.
    fn resolve_mismatch(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
        stored: &Candle,
        fetched: &Candle,
    ) -> MismatchResolution;

    /// 탐지된 데드존을 보조 저장소에서 채울지 결정합니다.
    fn should_fill_gap(&self, symbol: Symbol, timeframe: Timeframe, deadzone: &Deadzone) -> bool;
}

/// 고정 응답 정책.
///
/// 관찰된 운영 동작은 항상 제공자 데이터를 선택하고 항상 채우기를
/// 진행했습니다. 두 분기 모두 선택 가능하도록 유지합니다.
#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy {
    resolution: MismatchResolution,
    fill_gaps: bool,
}

impl FixedPolicy {
    /// 기본 정책: 항상 제공자 데이터 유지, 데드존 채우기 진행.
    pub fn prefer_provider() -> Self {
        Self {
            resolution: MismatchResolution::KeepProvider,
            fill_gaps: true,
        }
    }

    /// 대안 정책: 불일치 시 저장된 데이터 유지.
    pub fn prefer_stored() -> Self {
        Self {
            resolution: MismatchResolution::KeepStored,
            fill_gaps: true,
        }
    }

    /// 데드존 채우기 여부를 설정합니다.
    pub fn with_gap_fill(mut self, fill_gaps: bool) -> Self {
        self.fill_gaps = fill_gaps;
        self
    }
}

impl SyncPolicy for FixedPolicy {
    fn resolve_mismatch(
        &self,
        _symbol: Symbol,
        _timeframe: Timeframe,
        _stored: &Candle,
        _fetched: &Candle,
    ) -> MismatchResolution {
        self.resolution
    }

    fn should_fill_gap(&self, _symbol: Symbol, _timeframe: Timeframe, _deadzone: &Deadzone) -> bool {
        self.fill_gaps
    }
}

use crate::engine::region::RegionId;
use thiserror::Error;

/// Failures surfaced by the correction engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A span fell outside the buffer or was inverted. Never expected from
    /// well-formed analysis output.
    #[error("invalid span {from}..{to} for a buffer of {len} characters")]
    InvalidSpan { from: usize, to: usize, len: usize },

    /// The caller referred to a region the store no longer tracks.
    #[error("region {0} is not tracked by this session")]
    UnknownRegion(RegionId),

    /// The analysis collaborator produced no result.
    #[error("analysis failed")]
    AnalysisFailed,
}

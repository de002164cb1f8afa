//! Region tracking and offset reconciliation.
//!
//! A batch pass turns analyzer matches into an edited buffer plus one
//! [`Region`] per match; later swaps rewrite a single region and shift the
//! ones after it, so positions never need to be recomputed from scratch.

pub mod batch;
pub mod error;
pub mod geometry;
pub mod ledger;
pub mod region;
pub mod rewrite;
pub mod session;

pub use error::EngineError;
pub use geometry::{FontMetrics, MonospaceMetrics, Point, Rect, Viewport};
pub use region::{Region, RegionId, RegionStore};
pub use session::CorrectionSession;

//! Core-Domänentypen: Kurvenmodell, Split-Anker, Bézier-Auswertung, Koordinaten.

pub mod curve_model;
pub mod error;
pub mod evaluator;
pub mod geometry;
pub mod split_anchors;
pub mod transform;

pub use curve_model::{CurveModel, MIN_POINTS};
pub use error::EditError;
pub use evaluator::{
    bernstein_basis, binomial, de_casteljau, evaluate, sample_curve, sample_segment,
    segment_sample_ranges, segments_of, CurveEvaluator, SegmentRange,
};
pub use split_anchors::SplitAnchors;
pub use transform::{EditorRect, OSU_X_MAX, OSU_X_MIN, OSU_Y_MAX, OSU_Y_MIN};

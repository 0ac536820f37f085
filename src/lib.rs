//! osu! Slider-Editor Library.
//! Kurvenmodell, Verformung und Slider-Import/-Export als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod osu;
pub mod shared;

pub use app::{CurvePreview, EditHistory, EditorSession, Snapshot};
pub use core::{CurveEvaluator, CurveModel, EditError, EditorRect, SegmentRange, SplitAnchors};
pub use osu::{parse_hit_object, FormatError, HitObjectLine, SelectedPathSource, SliderMeta};
pub use shared::EditorOptions;

//! Application-Layer: Sitzung, History, Gesten, Vorschau und Use-Cases.

pub mod backup;
pub mod deformer;
pub mod history;
pub mod point_drag;
pub mod preview;
/// Editor-Sitzung
///
/// Bündelt Modell, Abtast-Cache, History und laufende Gesten.
pub mod session;
pub mod slider_io;

pub use backup::{AutoBackup, BackupFile};
pub use deformer::{DeformGesture, DeformLock};
pub use history::{EditHistory, Snapshot};
pub use point_drag::{DragConstraint, PointDrag};
pub use preview::{CurvePreview, PreviewKind, PreviewPlanner};
pub use session::EditorSession;

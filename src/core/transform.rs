//! Affine Abbildung zwischen Editor-Rechteck und osu!-Koordinaten.
//!
//! Das Editor-Rechteck ist der verschieb-/skalierbare 4:3-Rahmen auf dem
//! Bildschirm. Sein unterer linker Eckpunkt entspricht `(OSU_X_MIN, OSU_Y_MAX)`,
//! der obere rechte `(OSU_X_MAX, OSU_Y_MIN)`. Die Y-Achse kehrt sich dabei um.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Linker Rand des erreichbaren osu!-Bereichs (inkl. Overscan).
pub const OSU_X_MIN: f32 = -65.0;
/// Rechter Rand des erreichbaren osu!-Bereichs.
pub const OSU_X_MAX: f32 = 575.0;
/// Oberer Rand des erreichbaren osu!-Bereichs.
pub const OSU_Y_MIN: f32 = -56.0;
/// Unterer Rand des erreichbaren osu!-Bereichs.
pub const OSU_Y_MAX: f32 = 424.0;

/// Höhe des osu!-Bereichs, Bezugsgröße der Strichbreite.
const OSU_HEIGHT: f32 = OSU_Y_MAX - OSU_Y_MIN;

/// Editor-Rechteck in Bildschirmkoordinaten (Y nach unten).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditorRect {
    pub bottom_left: Vec2,
    pub top_right: Vec2,
}

impl EditorRect {
    pub fn new(bottom_left: Vec2, top_right: Vec2) -> Self {
        Self {
            bottom_left,
            top_right,
        }
    }

    /// Zentrierter 4:3-Rahmen, dessen Breite `rect_scale` × Viewport-Breite beträgt.
    pub fn centered(viewport_size: Vec2, rect_scale: f32) -> Self {
        let center = viewport_size * 0.5;
        let width = viewport_size.x * rect_scale;
        let height = width * 3.0 / 4.0;
        let top_left = center - Vec2::new(width, height) * 0.5;
        Self {
            bottom_left: Vec2::new(top_left.x, top_left.y + height),
            top_right: Vec2::new(top_left.x + width, top_left.y),
        }
    }

    pub fn width(&self) -> f32 {
        self.top_right.x - self.bottom_left.x
    }

    /// Höhe (positiv, da `bottom_left.y` auf dem Bildschirm unterhalb liegt).
    pub fn height(&self) -> f32 {
        self.bottom_left.y - self.top_right.y
    }

    pub fn center(&self) -> Vec2 {
        (self.bottom_left + self.top_right) * 0.5
    }

    /// Ein Rechteck ohne Fläche lässt sich nicht invertieren.
    pub fn is_degenerate(&self) -> bool {
        self.width().abs() <= f32::EPSILON || self.height().abs() <= f32::EPSILON
    }

    /// Skalierung und Offset pro Achse: `extern = scale * editor + offset`.
    fn affine(&self) -> Option<(Vec2, Vec2)> {
        if self.is_degenerate() {
            return None;
        }
        let scale = Vec2::new(
            (OSU_X_MAX - OSU_X_MIN) / self.width(),
            OSU_HEIGHT / self.height(),
        );
        let offset = Vec2::new(
            OSU_X_MIN - self.bottom_left.x * scale.x,
            OSU_Y_MAX - self.bottom_left.y * scale.y,
        );
        Some((scale, offset))
    }

    /// Editor → osu!. Entartetes Rechteck liefert den Ursprung.
    pub fn to_external(&self, point: Vec2) -> Vec2 {
        match self.affine() {
            Some((scale, offset)) => scale * point + offset,
            None => Vec2::ZERO,
        }
    }

    /// osu! → Editor, exakte Umkehrung von [`Self::to_external`].
    pub fn to_editor(&self, point: Vec2) -> Vec2 {
        match self.affine() {
            Some((scale, offset)) => (point - offset) / scale,
            None => Vec2::ZERO,
        }
    }

    /// Strichbreite des Sliders im Editor für einen osu!-Circle-Size-Wert.
    ///
    /// Entspricht dem Kreisdurchmesser im Spiel, skaliert auf die Rahmenhöhe.
    pub fn stroke_width(&self, circle_size: f32) -> f32 {
        ((self.height() / OSU_HEIGHT) * (54.4 - 4.48 * circle_size) * 1.65).max(0.0)
    }
}

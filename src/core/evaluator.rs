//! Bézier-Auswertung, Segment-Zerlegung und gecachte Abtastung der Kurve.
//!
//! Jedes Segment (Punkte zwischen zwei Split-Ankern) ist eine eigene
//! Bézier-Kurve vom Grad `len - 1`. Die Abtastpunkte aller Segmente werden zu
//! einer Polyline verkettet; der gemeinsame Randpunkt erscheint nur einmal.

use super::geometry::polyline_length;
use super::{CurveModel, SplitAnchors};
use glam::Vec2;

/// Zusammenhängender Indexbereich `start..=end` der Punktliste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRange {
    pub start: usize,
    pub end: usize,
}

impl SegmentRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Polynomgrad des Segments.
    pub fn degree(&self) -> usize {
        self.end - self.start
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    /// Die Punkte des Segments aus der vollständigen Punktliste.
    pub fn slice<'a>(&self, points: &'a [Vec2]) -> &'a [Vec2] {
        &points[self.start..=self.end]
    }
}

/// Binomialkoeffizient C(n, k) über die multiplikative Rekursion.
///
/// Nutzt die Symmetrie `C(n, k) = C(n, n-k)`, damit die Zwischenwerte klein
/// bleiben; Fakultäten werden nie gebildet.
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut result = 1.0f64;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result.round()
}

/// Bernstein-Basispolynom `C(n,i)·(1-t)^(n-i)·t^i`.
///
/// Liefert 0 für `i > n` oder `t` außerhalb von `[0, 1]`.
pub fn bernstein_basis(n: usize, i: usize, t: f32) -> f32 {
    if i > n || !(0.0..=1.0).contains(&t) {
        return 0.0;
    }
    let t = t as f64;
    let value = binomial(n, i) * (1.0 - t).powi((n - i) as i32) * t.powi(i as i32);
    value as f32
}

/// Punkt einer Bézier-Kurve beliebigen Grads als Bernstein-gewichtete Summe.
pub fn evaluate(points: &[Vec2], t: f32) -> Vec2 {
    let Some(n) = points.len().checked_sub(1) else {
        return Vec2::ZERO;
    };
    points
        .iter()
        .enumerate()
        .fold(Vec2::ZERO, |acc, (i, &p)| acc + p * bernstein_basis(n, i, t))
}

/// Punkt einer Bézier-Kurve über wiederholte lineare Interpolation (De Casteljau).
///
/// Numerisch unabhängig von [`evaluate`]; dient in Tests zum Abgleich.
pub fn de_casteljau(points: &[Vec2], t: f32) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    let mut work = points.to_vec();
    for r in 1..work.len() {
        for j in 0..work.len() - r {
            work[j] = work[j].lerp(work[j + 1], t);
        }
    }
    work[0]
}

/// `resolution + 1` Abtastpunkte bei `t = 0, 1/resolution, …, 1`.
pub fn sample_segment(points: &[Vec2], resolution: usize) -> Vec<Vec2> {
    let resolution = resolution.max(1);
    (0..=resolution)
        .map(|step| evaluate(points, step as f32 / resolution as f32))
        .collect()
}

/// Zerlegt `0..point_count` an den sortierten Split-Ankern in Segmente.
///
/// Ein Split-Anker ist letzter Punkt des einen und erster Punkt des nächsten
/// Segments. Anker auf Index 0 oder am Ende erzeugen keine leeren Segmente.
pub fn segments_of(point_count: usize, split_anchors: &SplitAnchors) -> Vec<SegmentRange> {
    if point_count < 2 {
        return Vec::new();
    }
    let last = point_count - 1;
    let mut segments = Vec::with_capacity(split_anchors.len() + 1);
    let mut start = 0;
    for split in split_anchors.iter().filter(|&i| i < point_count) {
        if split > start {
            segments.push(SegmentRange::new(start, split));
        }
        start = split;
    }
    if start < last {
        segments.push(SegmentRange::new(start, last));
    }
    segments
}

/// Globaler Abtastbereich (inklusive) jedes Segments in der verketteten Polyline.
///
/// Segment `k` belegt `k·resolution ..= (k+1)·resolution`; benachbarte
/// Segmente teilen sich den Randindex.
pub fn segment_sample_ranges(segment_count: usize, resolution: usize) -> Vec<(usize, usize)> {
    let resolution = resolution.max(1);
    (0..segment_count)
        .map(|k| (k * resolution, (k + 1) * resolution))
        .collect()
}

/// Tastet alle Segmente ab und verkettet sie ohne doppelte Randpunkte.
///
/// `None` bei weniger als zwei Punkten ("keine Kurve").
pub fn sample_curve(
    points: &[Vec2],
    split_anchors: &SplitAnchors,
    resolution: usize,
) -> Option<Vec<Vec2>> {
    if points.len() < 2 {
        return None;
    }
    let segments = segments_of(points.len(), split_anchors);
    let mut samples = Vec::with_capacity(segments.len() * resolution.max(1) + 1);
    for (k, segment) in segments.iter().enumerate() {
        let segment_samples = sample_segment(segment.slice(points), resolution);
        let skip = usize::from(k > 0);
        samples.extend(segment_samples.into_iter().skip(skip));
    }
    Some(samples)
}

struct CachedSamples {
    revision: u64,
    resolution: usize,
    samples: Option<Vec<Vec2>>,
}

/// Besitzt den Abtast-Cache der Kurve.
///
/// Der Cache ist an die Revision des Modells und die Auflösung gebunden und
/// wird beim nächsten Lesezugriff nach einer Änderung komplett neu gebaut.
pub struct CurveEvaluator {
    resolution: usize,
    cache: Option<CachedSamples>,
}

impl CurveEvaluator {
    /// Erstellt einen Evaluator mit `resolution` Abschnitten pro Segment.
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution: resolution.max(1),
            cache: None,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Ändert die Abtastauflösung; der Cache wird beim nächsten Lesen neu gebaut.
    pub fn set_resolution(&mut self, resolution: usize) {
        self.resolution = resolution.max(1);
    }

    fn is_fresh(&self, model: &CurveModel) -> bool {
        self.cache.as_ref().is_some_and(|c| {
            c.revision == model.revision() && c.resolution == self.resolution
        })
    }

    /// Abtastpunkte der aktuellen Kurve, bei Bedarf neu berechnet.
    pub fn samples(&mut self, model: &CurveModel) -> Option<&[Vec2]> {
        if !self.is_fresh(model) {
            let samples = sample_curve(model.points(), model.split_anchors(), self.resolution);
            log::debug!(
                "Kurven-Cache neu gebaut: {} Abtastpunkte (Revision {})",
                samples.as_ref().map_or(0, Vec::len),
                model.revision()
            );
            self.cache = Some(CachedSamples {
                revision: model.revision(),
                resolution: self.resolution,
                samples,
            });
        }
        self.cache.as_ref().and_then(|c| c.samples.as_deref())
    }

    /// Länge der abgetasteten Kurve (0 ohne Kurve).
    pub fn length(&mut self, model: &CurveModel) -> f32 {
        self.samples(model).map_or(0.0, polyline_length)
    }
}

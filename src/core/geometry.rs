//! Rein-mathematische 2D-Hilfsfunktionen (Projektion, Richtung, Schnittpunkt).
//!
//! Entartete Eingaben (Nullvektoren, parallele Geraden) liefern `None` oder
//! einen definierten Rückfallwert statt NaN.

use glam::Vec2;

/// |cos| oberhalb dieser Schwelle (≈ 30°) gelten zwei Geraden als fast parallel.
pub const NEAR_PARALLEL_COS: f32 = 0.866;

/// Abstand von `point` zur Strecke `a`–`b` (Lotfußpunkt, an den Enden geklemmt).
pub fn point_to_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = (point - a).dot(ab) / len_sq;
    if t <= 0.0 {
        point.distance(a)
    } else if t >= 1.0 {
        point.distance(b)
    } else {
        point.distance(a + ab * t)
    }
}

/// Normierte Richtung von `from` nach `to`; `None` bei identischen Punkten.
pub fn direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// Projiziert `point` auf die Gerade durch `line_point` mit Richtung `dir` (normiert).
///
/// Negative Parameter sind zulässig, der Punkt kann also hinter `line_point` landen.
pub fn project_onto_line(point: Vec2, line_point: Vec2, dir: Vec2) -> Vec2 {
    let t = (point - line_point).dot(dir);
    line_point + dir * t
}

/// Tangentenrichtung an Punkt `index` einer Punktliste.
///
/// Endpunkte nutzen ihren einzigen Nachbarn, innere Punkte die Sehne
/// vom Vorgänger zum Nachfolger.
pub fn tangent_at(points: &[Vec2], index: usize) -> Option<Vec2> {
    let n = points.len();
    if n < 2 || index >= n {
        return None;
    }
    if index == 0 {
        direction(points[0], points[1])
    } else if index == n - 1 {
        direction(points[n - 2], points[n - 1])
    } else {
        direction(points[index - 1], points[index + 1])
    }
}

/// Schnittpunkt zweier Geraden `p1 + s·dir1` und `p2 + u·dir2` (Richtungen normiert).
///
/// Fast parallele Geraden (Winkel unter ~30°) liefern `None`, weil der
/// Schnittpunkt dort numerisch instabil weit draußen liegt.
pub fn line_intersection(p1: Vec2, dir1: Vec2, p2: Vec2, dir2: Vec2) -> Option<Vec2> {
    if dir1.dot(dir2).abs() > NEAR_PARALLEL_COS {
        return None;
    }
    let det = dir1.perp_dot(dir2);
    if det.abs() < 1e-10 {
        return None;
    }
    let s = (p2 - p1).perp_dot(dir2) / det;
    Some(p1 + dir1 * s)
}

/// Dreht `point` um `pivot` (Winkel in Radiant, mathematisch positiv in Bildschirmkoordinaten).
pub fn rotate_point(point: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    pivot + Vec2::from_angle(angle).rotate(point - pivot)
}

/// Approximierte Länge einer Polyline.
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn segment_distance_uses_perpendicular_inside() {
        let d = point_to_segment_distance(Vec2::new(5.0, 3.0), Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert_relative_eq!(d, 3.0);
    }

    #[test]
    fn segment_distance_clamps_at_ends() {
        let d = point_to_segment_distance(Vec2::new(-3.0, 4.0), Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert_relative_eq!(d, 5.0);
        let d = point_to_segment_distance(Vec2::new(13.0, 4.0), Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn segment_distance_degenerate_segment() {
        let d = point_to_segment_distance(Vec2::new(3.0, 4.0), Vec2::ZERO, Vec2::ZERO);
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn direction_of_identical_points_is_none() {
        assert!(direction(Vec2::ONE, Vec2::ONE).is_none());
    }

    #[test]
    fn projection_allows_negative_parameter() {
        let p = project_onto_line(Vec2::new(-4.0, 2.0), Vec2::ZERO, Vec2::X);
        assert_eq!(p, Vec2::new(-4.0, 0.0));
    }

    #[test]
    fn tangent_at_inner_point_uses_neighbours() {
        let points = [Vec2::ZERO, Vec2::new(5.0, 5.0), Vec2::new(10.0, 0.0)];
        let t = tangent_at(&points, 1).unwrap();
        assert_relative_eq!(t.x, 1.0);
        assert_relative_eq!(t.y, 0.0);
    }

    #[test]
    fn intersection_of_perpendicular_lines() {
        let p = line_intersection(Vec2::ZERO, Vec2::X, Vec2::new(5.0, -5.0), Vec2::Y).unwrap();
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn intersection_rejects_near_parallel_lines() {
        let dir2 = Vec2::new(1.0, 0.1).normalize();
        assert!(line_intersection(Vec2::ZERO, Vec2::X, Vec2::new(0.0, 5.0), dir2).is_none());
    }

    #[test]
    fn rotate_quarter_turn() {
        let p = rotate_point(Vec2::new(2.0, 1.0), Vec2::new(1.0, 1.0), std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn polyline_length_sums_segments() {
        let pts = [Vec2::ZERO, Vec2::new(3.0, 4.0), Vec2::new(3.0, 10.0)];
        assert_relative_eq!(polyline_length(&pts), 11.0);
    }
}

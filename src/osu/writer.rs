//! Writer für osu!-Hit-Object-Zeilen.

use super::parser::{HitObjectLine, PathType, SliderMeta};
use crate::core::{EditorRect, SplitAnchors};
use glam::{IVec2, Vec2};

/// Editor → osu!, auf ganze Einheiten gerundet.
pub fn to_external_rounded(rect: &EditorRect, point: Vec2) -> IVec2 {
    rect.to_external(point).round().as_ivec2()
}

impl HitObjectLine {
    /// Baut eine Zeile aus Editor-Ankern. `None` bei weniger als zwei Ankern.
    ///
    /// Split-Anker werden doppelt geschrieben. Ein Split-Anker auf Index 0
    /// (Slider-Kopf) ist im Pfadfeld nicht darstellbar und entfällt.
    pub fn from_model(
        points: &[Vec2],
        split_anchors: &SplitAnchors,
        rect: &EditorRect,
        meta: SliderMeta,
    ) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let external: Vec<IVec2> = points
            .iter()
            .map(|&p| to_external_rounded(rect, p))
            .collect();
        let mut anchors = Vec::with_capacity(external.len() + split_anchors.len());
        for (i, &p) in external.iter().enumerate().skip(1) {
            anchors.push(p);
            if split_anchors.contains(i) {
                anchors.push(p);
            }
        }
        Some(Self {
            head: external[0],
            path_type: PathType::Bezier,
            anchors,
            meta,
        })
    }

    /// Serialisiert die Zeile im osu!-Format (ohne Zeilenumbruch).
    pub fn to_line(&self) -> String {
        let path: String = std::iter::once(self.path_type.letter().to_string())
            .chain(self.anchors.iter().map(|a| format!("{}:{}", a.x, a.y)))
            .collect::<Vec<_>>()
            .join("|");
        let mut line = format!(
            "{},{},{},{},{},{},{},{}",
            self.head.x,
            self.head.y,
            self.meta.start_time,
            self.meta.object_type,
            self.meta.hit_sound,
            path,
            self.meta.repeats,
            self.meta.length
        );
        for extra in &self.meta.extras {
            line.push(',');
            line.push_str(extra);
        }
        line
    }
}

/// Kurzform: Editor-Anker direkt zur Hit-Object-Zeile.
pub fn format_hit_object(
    points: &[Vec2],
    split_anchors: &SplitAnchors,
    rect: &EditorRect,
    meta: SliderMeta,
) -> Option<String> {
    HitObjectLine::from_model(points, split_anchors, rect, meta).map(|hit| hit.to_line())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osu::parser::parse_hit_object;

    fn identity_rect() -> EditorRect {
        EditorRect::new(Vec2::new(-65.0, 424.0), Vec2::new(575.0, -56.0))
    }

    #[test]
    fn split_anchors_are_doubled_and_head_split_dropped() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(20.0, 5.0),
            Vec2::new(30.0, 0.0),
        ];
        let splits: SplitAnchors = [0, 2].into_iter().collect();
        let hit = HitObjectLine::from_model(&points, &splits, &identity_rect(), SliderMeta::default())
            .unwrap();
        assert_eq!(
            hit.anchors,
            vec![
                IVec2::new(10, 0),
                IVec2::new(20, 5),
                IVec2::new(20, 5),
                IVec2::new(30, 0)
            ]
        );
        assert!(hit.to_line().contains(",B|10:0|20:5|20:5|30:0,"));
    }

    #[test]
    fn formats_line_with_metadata_and_extras() {
        let points = [Vec2::new(100.4, 50.6), Vec2::new(200.0, 80.0)];
        let meta = SliderMeta {
            extras: vec!["0:0:0:0:".to_string()],
            ..SliderMeta::default()
        };
        let line = format_hit_object(&points, &SplitAnchors::new(), &identity_rect(), meta).unwrap();
        assert_eq!(line, "100,51,1000,2,0,B|200:80,1,100,0:0:0:0:");
    }

    #[test]
    fn single_point_is_not_exportable() {
        let line = format_hit_object(
            &[Vec2::ZERO],
            &SplitAnchors::new(),
            &identity_rect(),
            SliderMeta::default(),
        );
        assert!(line.is_none());
    }

    #[test]
    fn parsed_line_formats_back_unchanged() {
        let original = "256,192,1500,6,2,B|300:200|350:180|350:180|400:220,2,140.5,2|0|0,0:0|0:0|0:0,0:0:0:0:";
        let hit = parse_hit_object(original).unwrap();
        assert_eq!(hit.to_line(), original);
    }
}

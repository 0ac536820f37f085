//! Parser für osu!-Hit-Object-Zeilen mit Slider-Pfad.
//!
//! Format: `x,y,startTime,objectType,hitSound,T|x:y|x:y...,repeats,length[,...]`.
//! Zwei aufeinanderfolgende identische Koordinatenpaare markieren einen
//! Split-Anker.

use crate::core::{EditorRect, SplitAnchors};
use glam::{IVec2, Vec2};
use thiserror::Error;

/// Formatfehler beim Lesen einer Hit-Object-Zeile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Zu wenige Felder: {0} (mindestens 6 erwartet)")]
    TooFewFields(usize),
    #[error("Ungültige Zahl in Feld '{field}': '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Kein unterstützter Slider-Pfad: '{0}'")]
    UnsupportedPath(String),
    #[error("Ungültiges Koordinatenpaar: '{0}'")]
    InvalidPair(String),
}

/// Kurventyp-Kennbuchstabe des Slider-Pfads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    Bezier,
    PerfectCircle,
    Linear,
}

impl PathType {
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "B" => Some(Self::Bezier),
            "P" => Some(Self::PerfectCircle),
            "L" => Some(Self::Linear),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Bezier => 'B',
            Self::PerfectCircle => 'P',
            Self::Linear => 'L',
        }
    }
}

/// Unveränderte Metadaten eines Sliders, beim Schreiben durchgereicht.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderMeta {
    pub start_time: i64,
    pub object_type: String,
    pub hit_sound: String,
    pub repeats: u32,
    /// Pixel-Länge als Originaltext (osu! schreibt teils Dezimalstellen)
    pub length: String,
    /// Weitere Felder (Samples, Hitsound-Sets), unverändert
    pub extras: Vec<String>,
}

impl Default for SliderMeta {
    /// Platzhalter für Sliderdateien ohne verknüpftes Hit-Object.
    fn default() -> Self {
        Self {
            start_time: 1000,
            object_type: "2".to_string(),
            hit_sound: "0".to_string(),
            repeats: 1,
            length: "100".to_string(),
            extras: Vec::new(),
        }
    }
}

/// Geparste Hit-Object-Zeile in osu!-Koordinaten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitObjectLine {
    /// Slider-Kopf (Felder 1 und 2)
    pub head: IVec2,
    pub path_type: PathType,
    /// Pfadpaare nach dem Typbuchstaben, Dopplungen inklusive
    pub anchors: Vec<IVec2>,
    pub meta: SliderMeta,
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, FormatError> {
    value
        .trim()
        .parse()
        .map_err(|_| FormatError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// Koordinaten sind in osu! ganzzahlig; Dezimalwerte werden gerundet.
fn parse_coord(field: &'static str, value: &str) -> Result<i32, FormatError> {
    parse_number::<i32>(field, value).or_else(|err| {
        value
            .trim()
            .parse::<f32>()
            .map(|v| v.round() as i32)
            .map_err(|_| err)
    })
}

fn parse_pair(pair: &str) -> Result<IVec2, FormatError> {
    let (x, y) = pair
        .split_once(':')
        .ok_or_else(|| FormatError::InvalidPair(pair.to_string()))?;
    let x = parse_coord("x", x).map_err(|_| FormatError::InvalidPair(pair.to_string()))?;
    let y = parse_coord("y", y).map_err(|_| FormatError::InvalidPair(pair.to_string()))?;
    Ok(IVec2::new(x, y))
}

/// Parsed eine Hit-Object-Zeile.
///
/// Fehlen `repeats`/`length` (Sliderdatei), gelten die Platzhalterwerte.
pub fn parse_hit_object(line: &str) -> Result<HitObjectLine, FormatError> {
    let parts: Vec<&str> = line.trim().split(',').collect();
    if parts.len() < 6 {
        return Err(FormatError::TooFewFields(parts.len()));
    }

    let head = IVec2::new(parse_coord("x", parts[0])?, parse_coord("y", parts[1])?);

    let mut path = parts[5].split('|');
    let path_type = path
        .next()
        .and_then(PathType::from_letter)
        .ok_or_else(|| FormatError::UnsupportedPath(parts[5].to_string()))?;
    let anchors = path
        .filter(|pair| !pair.is_empty())
        .map(parse_pair)
        .collect::<Result<Vec<_>, _>>()?;
    if anchors.is_empty() {
        return Err(FormatError::UnsupportedPath(parts[5].to_string()));
    }

    let defaults = SliderMeta::default();
    let meta = SliderMeta {
        start_time: parse_number("startTime", parts[2])?,
        object_type: parts[3].trim().to_string(),
        hit_sound: parts[4].trim().to_string(),
        repeats: match parts.get(6) {
            Some(value) => parse_number("repeats", value)?,
            None => defaults.repeats,
        },
        length: parts
            .get(7)
            .map_or(defaults.length, |value| value.trim().to_string()),
        extras: parts.iter().skip(8).map(|s| s.to_string()).collect(),
    };

    Ok(HitObjectLine {
        head,
        path_type,
        anchors,
        meta,
    })
}

impl HitObjectLine {
    /// Überführt die Zeile in Editor-Anker und Split-Anker.
    ///
    /// Ein Paar gleich dem vorigen Paar wird nicht als Anker übernommen,
    /// sondern markiert den vorigen Anker als Split-Anker. Danach wird der
    /// Vergleich zurückgesetzt, drei gleiche Paare ergeben also zwei Anker.
    pub fn to_model(&self, rect: &EditorRect) -> (Vec<Vec2>, SplitAnchors) {
        let mut points = Vec::with_capacity(self.anchors.len() + 1);
        let mut split_anchors = SplitAnchors::new();
        points.push(rect.to_editor(self.head.as_vec2()));

        let mut prev: Option<IVec2> = None;
        for &anchor in &self.anchors {
            if prev == Some(anchor) {
                split_anchors.insert(points.len() - 1);
                prev = None;
                continue;
            }
            points.push(rect.to_editor(anchor.as_vec2()));
            prev = Some(anchor);
        }
        (points, split_anchors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "256,192,1500,2,0,B|300:200|350:180|350:180|400:220,1,140.5";

    #[test]
    fn parses_fields_and_metadata() {
        let hit = parse_hit_object(LINE).unwrap();
        assert_eq!(hit.head, IVec2::new(256, 192));
        assert_eq!(hit.path_type, PathType::Bezier);
        assert_eq!(hit.anchors.len(), 4);
        assert_eq!(hit.meta.start_time, 1500);
        assert_eq!(hit.meta.repeats, 1);
        assert_eq!(hit.meta.length, "140.5");
        assert!(hit.meta.extras.is_empty());
    }

    #[test]
    fn keeps_trailing_fields_as_extras() {
        let hit = parse_hit_object("0,0,1,6,2,L|10:10,2,50,2|0,0:0|0:0,0:0:0:0:").unwrap();
        assert_eq!(hit.path_type, PathType::Linear);
        assert_eq!(hit.meta.extras, vec!["2|0", "0:0|0:0", "0:0:0:0:"]);
    }

    #[test]
    fn slider_file_without_repeats_uses_defaults() {
        let hit = parse_hit_object("10,20,1000,2,0,B|30:40").unwrap();
        assert_eq!(hit.meta.repeats, 1);
        assert_eq!(hit.meta.length, "100");
    }

    #[test]
    fn rejects_short_lines_and_foreign_paths() {
        assert_eq!(
            parse_hit_object("1,2,3"),
            Err(FormatError::TooFewFields(3))
        );
        assert!(matches!(
            parse_hit_object("1,2,3,1,0,C|5:5"),
            Err(FormatError::UnsupportedPath(_))
        ));
        assert!(matches!(
            parse_hit_object("1,2,3,1,0,B|5-5"),
            Err(FormatError::InvalidPair(_))
        ));
        assert!(matches!(
            parse_hit_object("a,2,3,1,0,B|5:5"),
            Err(FormatError::InvalidNumber { field: "x", .. })
        ));
    }

    #[test]
    fn doubled_pair_becomes_split_anchor() {
        let rect = EditorRect::new(Vec2::new(-65.0, 424.0), Vec2::new(575.0, -56.0));
        let hit = parse_hit_object(LINE).unwrap();
        let (points, splits) = hit.to_model(&rect);
        assert_eq!(points.len(), 4);
        assert_eq!(splits.iter().collect::<Vec<_>>(), vec![2]);
        assert!((points[2] - Vec2::new(350.0, 180.0)).length() < 1e-3);
    }

    #[test]
    fn tripled_pair_yields_split_plus_anchor() {
        let rect = EditorRect::new(Vec2::new(-65.0, 424.0), Vec2::new(575.0, -56.0));
        let hit = parse_hit_object("0,0,0,2,0,B|5:5|5:5|5:5|9:9,1,10").unwrap();
        let (points, splits) = hit.to_model(&rect);
        assert_eq!(points.len(), 4);
        assert_eq!(splits.iter().collect::<Vec<_>>(), vec![1]);
    }
}

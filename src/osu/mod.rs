//! osu!-Slider Import/Export.
//!
//! Hit-Object-Zeilen lesen und schreiben, Split-Anker als doppelte
//! Koordinatenpaare kodieren, Beatmap-Datei über den osu!-Editor auflösen.

pub mod parser;
pub mod source;
pub mod writer;

pub use parser::{parse_hit_object, FormatError, HitObjectLine, PathType, SliderMeta};
pub use source::{
    beatmap_file_name, beatmap_path, replace_hit_object, write_back, LinkedSlider,
    SelectedPathSource,
};
pub use writer::{format_hit_object, to_external_rounded};

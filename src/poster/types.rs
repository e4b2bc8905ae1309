use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosterKind {
    Birthday,
    Anniversary,
}

impl PosterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterKind::Birthday => "birthday",
            PosterKind::Anniversary => "anniversary",
        }
    }
}

impl fmt::Display for PosterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement region for the employee photo, in template pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Origin and metrics of the 4-line text stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextBlockConfig {
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_line_spacing")]
    pub line_spacing: i32,
    #[serde(default = "default_font_size_name")]
    pub font_size_name: f32,
    #[serde(default = "default_font_size_detail")]
    pub font_size_detail: f32,
}

fn default_line_spacing() -> i32 {
    48
}

fn default_font_size_name() -> f32 {
    38.0
}

fn default_font_size_detail() -> f32 {
    26.0
}

/// Position of the "Nth" label on anniversary posters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearLabelConfig {
    #[serde(default = "default_year_label_x")]
    pub x: i32,
    #[serde(default = "default_year_label_y")]
    pub y: i32,
    #[serde(default = "default_year_label_font_size")]
    pub font_size: f32,
}

fn default_year_label_x() -> i32 {
    80
}

fn default_year_label_y() -> i32 {
    80
}

fn default_year_label_font_size() -> f32 {
    64.0
}

impl Default for YearLabelConfig {
    fn default() -> Self {
        Self {
            x: default_year_label_x(),
            y: default_year_label_y(),
            font_size: default_year_label_font_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthdayLayout {
    #[serde(default = "default_birthday_template")]
    pub template: PathBuf,
    pub photo_box: PhotoBox,
    pub text_block: TextBlockConfig,
}

fn default_birthday_template() -> PathBuf {
    PathBuf::from("assets/templates/birthday.png")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnniversaryLayout {
    #[serde(default = "default_anniversary_template")]
    pub template: PathBuf,
    pub photo_box: PhotoBox,
    pub text_block: TextBlockConfig,
    #[serde(default)]
    pub year_label: YearLabelConfig,
}

fn default_anniversary_template() -> PathBuf {
    PathBuf::from("assets/templates/anniversary.png")
}

/// Font files per logical slot. Unset slots use the built-in font.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSet {
    #[serde(default)]
    pub regular: Option<PathBuf>,
    #[serde(default)]
    pub bold: Option<PathBuf>,
    #[serde(default)]
    pub year: Option<PathBuf>,
}

impl FontSet {
    /// Font for the name line: bold if set, else regular.
    pub fn name_font(&self) -> Option<&PathBuf> {
        slot(&self.bold).or(slot(&self.regular))
    }

    pub fn regular_font(&self) -> Option<&PathBuf> {
        slot(&self.regular)
    }

    /// Font for the anniversary year label: year, then bold, then regular.
    pub fn year_font(&self) -> Option<&PathBuf> {
        slot(&self.year)
            .or(slot(&self.bold))
            .or(slot(&self.regular))
    }
}

// An empty path in the config counts as unset.
fn slot(path: &Option<PathBuf>) -> Option<&PathBuf> {
    path.as_ref().filter(|p| !p.as_os_str().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub weight: FontWeight,
}

impl TextLine {
    pub fn new(text: impl Into<String>, weight: FontWeight) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }
}

/// Where a photo ended up on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// A composited poster along with what was drawn on it.
#[derive(Debug, Clone)]
pub struct Poster {
    pub kind: PosterKind,
    pub image: RgbaImage,
    pub text_lines: Vec<TextLine>,
    pub year_label: Option<String>,
    pub photo: Option<Placement>,
}

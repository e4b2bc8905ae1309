use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use std::path::Path;
use tracing::debug;

use super::{FontSet, FontWeight, PosterError, PosterKind, TextBlockConfig, TextLine, YearLabelConfig};
use crate::employee::EmployeeRecord;

/// Bundled fallback used whenever a configured font is missing or unreadable.
static BUILTIN_FONT: &[u8] = include_bytes!("../../static/DejaVuSans.ttf");

pub const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub fn builtin_font() -> Result<FontArc, PosterError> {
    FontArc::try_from_slice(BUILTIN_FONT)
        .map_err(|_| PosterError::FontError("bundled font is unreadable".to_string()))
}

/// Load a font file, falling back to the bundled font.
pub fn load_font(path: Option<&Path>) -> Result<FontArc, PosterError> {
    if let Some(path) = path {
        match std::fs::read(path) {
            Ok(data) => match FontArc::try_from_vec(data) {
                Ok(font) => return Ok(font),
                Err(_) => debug!("Font file {:?} could not be parsed, using built-in font", path),
            },
            Err(e) => debug!("Font file {:?} unavailable ({}), using built-in font", path, e),
        }
    }
    builtin_font()
}

/// Numeral with its English ordinal suffix: 1st, 2nd, 3rd, 4th, 11th, 21st.
pub fn ordinal(n: i32) -> String {
    let magnitude = n.unsigned_abs();
    let suffix = if (11..=13).contains(&(magnitude % 100)) {
        "th"
    } else {
        match magnitude % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{}{}", n, suffix)
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// The "{vertical} - {department}" line, or whichever part is present.
pub fn org_line(vertical: &str, department: &str) -> String {
    match (vertical.is_empty(), department.is_empty()) {
        (false, false) => format!("{} - {}", vertical, department),
        (false, true) => vertical.to_string(),
        (true, false) => department.to_string(),
        (true, true) => String::new(),
    }
}

/// Name, designation, org line and location. Empty fields stay as empty lines.
pub fn build_text_lines(employee: &EmployeeRecord, kind: PosterKind) -> Vec<TextLine> {
    let name = match kind {
        PosterKind::Birthday => title_case(&employee.name),
        PosterKind::Anniversary => employee.name.to_uppercase(),
    };

    vec![
        TextLine::new(name, FontWeight::Bold),
        TextLine::new(employee.designation.clone(), FontWeight::Regular),
        TextLine::new(
            org_line(&employee.vertical, &employee.department),
            FontWeight::Regular,
        ),
        TextLine::new(employee.location.clone(), FontWeight::Regular),
    ]
}

/// Draw the text stack left-aligned from `(x, y)`, one line every `line_spacing` pixels.
///
/// The first line uses the name size and the bold slot (regular if bold is
/// unset); the rest use the detail size and the regular slot.
pub fn draw_text_block(
    image: &mut RgbaImage,
    lines: &[TextLine],
    block: &TextBlockConfig,
    fonts: &FontSet,
) -> Result<(), PosterError> {
    let name_font = load_font(fonts.name_font().map(|p| p.as_path()))?;
    let detail_font = load_font(fonts.regular_font().map(|p| p.as_path()))?;

    let mut y = block.y;
    for (index, line) in lines.iter().enumerate() {
        let (font, size) = if index == 0 {
            (&name_font, block.font_size_name)
        } else {
            (&detail_font, block.font_size_detail)
        };
        if !line.text.is_empty() {
            draw_text_mut(image, TEXT_COLOR, block.x, y, PxScale::from(size), font, &line.text);
        }
        y += block.line_spacing;
    }
    Ok(())
}

/// Draw the anniversary year label with the year, bold or regular font, in that order.
pub fn draw_year_label(
    image: &mut RgbaImage,
    label: &str,
    config: &YearLabelConfig,
    fonts: &FontSet,
) -> Result<(), PosterError> {
    let font = load_font(fonts.year_font().map(|p| p.as_path()))?;
    draw_text_mut(
        image,
        TEXT_COLOR,
        config.x,
        config.y,
        PxScale::from(config.font_size),
        &font,
        label,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn employee(vertical: &str, department: &str) -> EmployeeRecord {
        EmployeeRecord {
            name: "john doe".to_string(),
            designation: "Engineer".to_string(),
            vertical: vertical.to_string(),
            department: department.to_string(),
            location: "Pune".to_string(),
            ..EmployeeRecord::default()
        }
    }

    fn lit_pixels(image: &RgbaImage) -> usize {
        image.pixels().filter(|p| p[0] > 128).count()
    }

    #[test]
    fn test_ordinal_boundaries() {
        let cases = [
            (0, "0th"),
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (10, "10th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (14, "14th"),
            (20, "20th"),
            (21, "21st"),
            (22, "22nd"),
            (23, "23rd"),
            (100, "100th"),
            (101, "101st"),
            (111, "111th"),
            (112, "112th"),
            (113, "113th"),
            (121, "121st"),
        ];
        for (n, expected) in cases {
            assert_eq!(ordinal(n), expected, "ordinal({})", n);
        }
    }

    #[test]
    fn test_ordinal_negative_uses_magnitude() {
        assert_eq!(ordinal(-1), "-1st");
        assert_eq!(ordinal(-12), "-12th");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("john doe"), "John Doe");
        assert_eq!(title_case("JOHN DOE"), "John Doe");
        assert_eq!(title_case("mary-jane o'neil"), "Mary-Jane O'Neil");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_org_line_variants() {
        assert_eq!(build_text_lines(&employee("Sales", ""), PosterKind::Birthday)[2].text, "Sales");
        assert_eq!(build_text_lines(&employee("", "Finance"), PosterKind::Birthday)[2].text, "Finance");
        assert_eq!(build_text_lines(&employee("", ""), PosterKind::Birthday)[2].text, "");
        assert_eq!(
            build_text_lines(&employee("Sales", "Finance"), PosterKind::Birthday)[2].text,
            "Sales - Finance"
        );
    }

    #[test]
    fn test_name_case_by_poster_kind() {
        let emp = employee("Sales", "Finance");
        let birthday = build_text_lines(&emp, PosterKind::Birthday);
        let anniversary = build_text_lines(&emp, PosterKind::Anniversary);

        assert_eq!(birthday[0], TextLine::new("John Doe", FontWeight::Bold));
        assert_eq!(anniversary[0], TextLine::new("JOHN DOE", FontWeight::Bold));
        assert_eq!(birthday[1], TextLine::new("Engineer", FontWeight::Regular));
        assert_eq!(birthday[3], TextLine::new("Pune", FontWeight::Regular));
    }

    #[test]
    fn test_empty_fields_keep_four_lines() {
        let lines = build_text_lines(&EmployeeRecord::default(), PosterKind::Anniversary);
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|line| line.text.is_empty()));
    }

    #[test]
    fn test_draw_text_block_uses_fallback_font() {
        let mut image = RgbaImage::from_pixel(400, 300, Rgba([0, 0, 0, 255]));
        let fonts = FontSet {
            regular: Some(PathBuf::from("/nonexistent/Regular.ttf")),
            bold: Some(PathBuf::from("/nonexistent/Bold.ttf")),
            year: None,
        };
        let block = TextBlockConfig {
            x: 10,
            y: 10,
            line_spacing: 48,
            font_size_name: 38.0,
            font_size_detail: 26.0,
        };
        let lines = build_text_lines(&employee("Sales", "Finance"), PosterKind::Birthday);

        draw_text_block(&mut image, &lines, &block, &fonts).unwrap();

        assert!(lit_pixels(&image) > 0);
        // Nothing above the block origin
        for x in 0..400 {
            for y in 0..5 {
                assert_eq!(image.get_pixel(x, y), &Rgba([0, 0, 0, 255]));
            }
        }
    }

    #[test]
    fn test_draw_text_block_line_spacing() {
        let block = TextBlockConfig {
            x: 5,
            y: 0,
            line_spacing: 100,
            font_size_name: 30.0,
            font_size_detail: 30.0,
        };
        let lines = vec![
            TextLine::new("", FontWeight::Bold),
            TextLine::new("", FontWeight::Regular),
            TextLine::new("XXXX", FontWeight::Regular),
            TextLine::new("", FontWeight::Regular),
        ];
        let mut image = RgbaImage::from_pixel(300, 400, Rgba([0, 0, 0, 255]));
        draw_text_block(&mut image, &lines, &block, &FontSet::default()).unwrap();

        let rows_with_text: Vec<u32> = (0..400)
            .filter(|&y| (0..300).any(|x| image.get_pixel(x, y)[0] > 128))
            .collect();
        assert!(!rows_with_text.is_empty());
        // Only the third line (y = 200) carries glyphs
        assert!(rows_with_text.iter().all(|&y| (200..300).contains(&y)));
    }

    #[test]
    fn test_draw_year_label() {
        let mut image = RgbaImage::from_pixel(300, 200, Rgba([0, 0, 0, 255]));
        let config = YearLabelConfig::default();
        draw_year_label(&mut image, "9th", &config, &FontSet::default()).unwrap();
        assert!(lit_pixels(&image) > 0);
    }
}

use crate::domain::model::ApiReading;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

pub const TEMPLATE_FILE: &str = "template.png";
pub const OUTPUT_FILE: &str = "result.png";

/// The value text ends at this pixel, baseline-anchored, matching the template artwork.
const ANCHOR: (i32, i32) = (980, 250);
/// 5x7 glyphs at scale 5 give 35px tall digits.
const SCALE: u32 = 5;
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Reads the template, draws the reading's value and writes `result.png`,
/// returning the encoded image for upload.
pub struct TokenImageRenderer<S: Storage> {
    assets: S,
    output: S,
}

impl<S: Storage> TokenImageRenderer<S> {
    pub fn new(assets: S, output: S) -> Self {
        Self { assets, output }
    }

    pub async fn generate(&self, reading: &ApiReading) -> Result<Vec<u8>> {
        let template = self.assets.read_file(TEMPLATE_FILE).await?;
        let text = format_param(reading.param);

        tracing::debug!("Rendering value '{}' onto the template", text);
        let png = draw_value(&template, &text)?;

        self.output.write_file(OUTPUT_FILE, &png).await?;
        tracing::info!("Image generated, file size: {} bytes", png.len());

        Ok(png)
    }
}

/// Draws `text` in white, right-aligned against the anchor, onto the template PNG.
pub fn draw_value(template_png: &[u8], text: &str) -> Result<Vec<u8>> {
    let mut canvas = image::load_from_memory(template_png)?.to_rgba8();

    let advance = 6 * SCALE as i32;
    let width = text.chars().count() as i32 * advance - SCALE as i32;
    let x0 = ANCHOR.0 - width;
    let y0 = ANCHOR.1 - 7 * SCALE as i32;

    draw_text(&mut canvas, x0, y0, text, WHITE, SCALE);

    let mut out = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}

/// Formats the API value for display: whole numbers are grouped into
/// thousands, fractional values are printed as-is.
pub fn format_param(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        let digits = format!("{}", value.abs() as i64);
        let grouped = group_thousands(&digits);
        if value < 0.0 {
            format!("-{}", grouped)
        } else {
            grouped
        }
    } else {
        format!("{}", value)
    }
}

/// Splits a digit string into groups of three from the right: "1234567" -> "1 234 567".
pub fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut groups: Vec<String> = chars
        .rchunks(3)
        .map(|group| group.iter().collect())
        .collect();
    groups.reverse();
    groups.join(" ")
}

fn draw_text(image: &mut RgbaImage, mut x: i32, y: i32, text: &str, color: Rgba<u8>, scale: u32) {
    for ch in text.chars() {
        if let Some(glyph) = glyph_bits(ch) {
            for (row, pattern) in glyph.iter().enumerate() {
                for col in 0..5i32 {
                    if (pattern >> (4 - col)) & 1 == 1 {
                        fill_block(
                            image,
                            x + col * scale as i32,
                            y + row as i32 * scale as i32,
                            scale,
                            color,
                        );
                    }
                }
            }
        }
        x += 6 * scale as i32;
    }
}

fn fill_block(image: &mut RgbaImage, x: i32, y: i32, scale: u32, color: Rgba<u8>) {
    let width = image.width() as i32;
    let height = image.height() as i32;
    for dy in 0..scale as i32 {
        for dx in 0..scale as i32 {
            let px = x + dx;
            let py = y + dy;
            if px >= 0 && px < width && py >= 0 && py < height {
                *image.get_pixel_mut(px as u32, py as u32) = color;
            }
        }
    }
}

fn glyph_bits(ch: char) -> Option<[u8; 7]> {
    match ch {
        '0' => Some([
            0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110,
        ]),
        '1' => Some([
            0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110,
        ]),
        '2' => Some([
            0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111,
        ]),
        '3' => Some([
            0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110,
        ]),
        '4' => Some([
            0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010,
        ]),
        '5' => Some([
            0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110,
        ]),
        '6' => Some([
            0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110,
        ]),
        '7' => Some([
            0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000,
        ]),
        '8' => Some([
            0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110,
        ]),
        '9' => Some([
            0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100,
        ]),
        '-' => Some([0, 0, 0, 0b01110, 0, 0, 0]),
        '.' => Some([0, 0, 0, 0, 0, 0b00110, 0b00110]),
        ' ' => Some([0, 0, 0, 0, 0, 0, 0]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_template(width: u32, height: u32) -> Vec<u8> {
        let canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_format_param() {
        assert_eq!(format_param(42.0), "42");
        assert_eq!(format_param(1234.0), "1 234");
        assert_eq!(format_param(9876543.0), "9 876 543");
        assert_eq!(format_param(-1234.0), "-1 234");
        assert_eq!(format_param(3.25), "3.25");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1 234");
        assert_eq!(group_thousands("1234567"), "1 234 567");
    }

    #[test]
    fn test_draw_value_paints_white_pixels() {
        let template = blank_template(1200, 400);
        let png = draw_value(&template, "42").unwrap();

        let result = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(result.dimensions(), (1200, 400));

        // Text is right-aligned against the anchor, so white pixels must
        // appear just left of and above (980, 250), and nowhere right of it.
        let painted = result
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 == [255, 255, 255, 255])
            .count();
        assert!(painted > 0);

        for (x, y, pixel) in result.enumerate_pixels() {
            if pixel.0 == [255, 255, 255, 255] {
                assert!(x < 980, "white pixel at x={} beyond the anchor", x);
                assert!(y < 250 && y >= 250 - 35 - 1, "white pixel at y={}", y);
            }
        }
    }

    #[test]
    fn test_draw_value_rejects_invalid_template() {
        let result = draw_value(b"not a png", "42");
        assert!(result.is_err());
    }

    #[test]
    fn test_draw_value_clips_when_template_is_small() {
        // Anchor lies outside a tiny template; drawing must clip, not panic.
        let template = blank_template(100, 100);
        let png = draw_value(&template, "123456").unwrap();
        let result = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(result.dimensions(), (100, 100));
    }
}

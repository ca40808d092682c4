//! Synthetic placeholder previews for RAW files without a usable preview.
//!
//! The placeholder is a flat grey card reading "RAW" with the file name
//! underneath. Rendering uses a built-in 5x7 bitmap font so output is
//! identical for identical inputs.

use image::{Rgb, RgbImage};

const BACKGROUND: Rgb<u8> = Rgb([224, 224, 224]);
const FOREGROUND: Rgb<u8> = Rgb([80, 80, 80]);

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
/// Blank columns between glyphs, in font pixels.
const GLYPH_SPACING: u32 = 1;

const LABEL: &str = "RAW";
const LABEL_SCALE: u32 = 8;
const NAME_SCALE: u32 = 2;
const ELLIPSIS: &str = "...";

/// Render the placeholder card for `file_name`.
pub fn render_placeholder(file_name: &str, width: u32, height: u32) -> RgbImage {
    let width = width.max(1);
    let height = height.max(1);
    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

    // Shrink the label on small canvases so it still fits.
    let label_scale = fit_scale(LABEL, width, LABEL_SCALE);
    let name_scale = fit_scale("M", width, NAME_SCALE);
    let name = fit_text(&file_name.to_uppercase(), width, name_scale);

    let label_h = GLYPH_HEIGHT * label_scale;
    let name_h = GLYPH_HEIGHT * name_scale;
    let gap = name_h;
    let block_h = label_h + gap + name_h;
    let top = height.saturating_sub(block_h) / 2;

    draw_centered(&mut canvas, LABEL, top, label_scale);
    draw_centered(&mut canvas, &name, top + label_h + gap, name_scale);
    canvas
}

/// Width in pixels of `text` rendered at `scale`.
fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0;
    }
    (n * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING) * scale
}

/// Largest scale up to `max` at which `text` fits in `width`, at least 1.
fn fit_scale(text: &str, width: u32, max: u32) -> u32 {
    (1..=max)
        .rev()
        .find(|&s| text_width(text, s) <= width)
        .unwrap_or(1)
}

/// Truncate `text` with an ellipsis so it fits in `width` at `scale`.
fn fit_text(text: &str, width: u32, scale: u32) -> String {
    if text_width(text, scale) <= width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + ELLIPSIS;
        if text_width(&candidate, scale) <= width {
            return candidate;
        }
    }
    String::new()
}

fn draw_centered(canvas: &mut RgbImage, text: &str, top: u32, scale: u32) {
    let left = canvas.width().saturating_sub(text_width(text, scale)) / 2;
    let mut x = left;
    for ch in text.chars() {
        draw_glyph(canvas, glyph(ch), x, top, scale);
        x += (GLYPH_WIDTH + GLYPH_SPACING) * scale;
    }
}

fn draw_glyph(canvas: &mut RgbImage, rows: [u8; 7], x0: u32, y0: u32, scale: u32) {
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (0x10 >> col) == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let x = x0 + col * scale + dx;
                    let y = y0 + row as u32 * scale + dy;
                    if x < canvas.width() && y < canvas.height() {
                        canvas.put_pixel(x, y, FOREGROUND);
                    }
                }
            }
        }
    }
}

/// 5x7 glyph rows, most significant of the low five bits on the left.
fn glyph(ch: char) -> [u8; 7] {
    match ch {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        ' ' => [0x00; 7],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}

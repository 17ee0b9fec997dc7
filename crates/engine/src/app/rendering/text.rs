use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};

use crate::app::canvas::{Color, FontHandle};

use super::raster::write_pixel_rgba_clipped;

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
const FIRST_GLYPH: char = ' ';

/// 3x5 bitmaps for `' '..='Z'`, one row per byte, high bit on the left.
const GLYPHS: [[u8; 5]; 59] = [
    [0b000, 0b000, 0b000, 0b000, 0b000], // space
    [0b010, 0b010, 0b010, 0b000, 0b010], // !
    [0b101, 0b101, 0b000, 0b000, 0b000], // "
    [0b101, 0b111, 0b101, 0b111, 0b101], // #
    [0b111, 0b110, 0b111, 0b011, 0b111], // $
    [0b101, 0b001, 0b010, 0b100, 0b101], // %
    [0b010, 0b101, 0b010, 0b101, 0b011], // &
    [0b010, 0b010, 0b000, 0b000, 0b000], // '
    [0b001, 0b010, 0b010, 0b010, 0b001], // (
    [0b100, 0b010, 0b010, 0b010, 0b100], // )
    [0b000, 0b101, 0b010, 0b101, 0b000], // *
    [0b000, 0b010, 0b111, 0b010, 0b000], // +
    [0b000, 0b000, 0b000, 0b010, 0b100], // ,
    [0b000, 0b000, 0b111, 0b000, 0b000], // -
    [0b000, 0b000, 0b000, 0b000, 0b010], // .
    [0b001, 0b001, 0b010, 0b100, 0b100], // /
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b010, 0b010, 0b010], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
    [0b000, 0b010, 0b000, 0b010, 0b000], // :
    [0b000, 0b010, 0b000, 0b010, 0b100], // ;
    [0b001, 0b010, 0b100, 0b010, 0b001], // <
    [0b000, 0b111, 0b000, 0b111, 0b000], // =
    [0b100, 0b010, 0b001, 0b010, 0b100], // >
    [0b111, 0b001, 0b011, 0b000, 0b010], // ?
    [0b111, 0b101, 0b111, 0b100, 0b111], // @
    [0b010, 0b101, 0b111, 0b101, 0b101], // A
    [0b110, 0b101, 0b110, 0b101, 0b110], // B
    [0b111, 0b100, 0b100, 0b100, 0b111], // C
    [0b110, 0b101, 0b101, 0b101, 0b110], // D
    [0b111, 0b100, 0b110, 0b100, 0b111], // E
    [0b111, 0b100, 0b110, 0b100, 0b100], // F
    [0b111, 0b100, 0b101, 0b101, 0b111], // G
    [0b101, 0b101, 0b111, 0b101, 0b101], // H
    [0b111, 0b010, 0b010, 0b010, 0b111], // I
    [0b111, 0b001, 0b001, 0b101, 0b111], // J
    [0b101, 0b101, 0b110, 0b101, 0b101], // K
    [0b100, 0b100, 0b100, 0b100, 0b111], // L
    [0b101, 0b111, 0b111, 0b101, 0b101], // M
    [0b101, 0b111, 0b111, 0b111, 0b101], // N
    [0b111, 0b101, 0b101, 0b101, 0b111], // O
    [0b110, 0b101, 0b110, 0b100, 0b100], // P
    [0b111, 0b101, 0b101, 0b111, 0b001], // Q
    [0b110, 0b101, 0b110, 0b101, 0b101], // R
    [0b111, 0b100, 0b111, 0b001, 0b111], // S
    [0b111, 0b010, 0b010, 0b010, 0b010], // T
    [0b101, 0b101, 0b101, 0b101, 0b111], // U
    [0b101, 0b101, 0b101, 0b101, 0b010], // V
    [0b101, 0b101, 0b111, 0b111, 0b101], // W
    [0b101, 0b101, 0b010, 0b101, 0b101], // X
    [0b101, 0b101, 0b010, 0b010, 0b010], // Y
    [0b111, 0b001, 0b010, 0b100, 0b111], // Z
];

/// Lowercase folds to uppercase; anything else outside the table draws as `?`.
fn glyph_for(ch: char) -> [u8; 5] {
    let ch = ch.to_ascii_uppercase();
    let index = (ch as u32).wrapping_sub(FIRST_GLYPH as u32) as usize;
    GLYPHS
        .get(index)
        .copied()
        .unwrap_or(GLYPHS[('?' as u32 - FIRST_GLYPH as u32) as usize])
}

pub(crate) fn glyph_advance(font: &FontHandle) -> i32 {
    (GLYPH_WIDTH + 1) * font.scale()
}

pub(crate) fn line_advance(font: &FontHandle) -> i32 {
    (GLYPH_HEIGHT + 2) * font.scale()
}

/// Draws `text` with its top-left corner at (`x`, `y`). `\n` starts a new line at `x`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_text_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    font: &FontHandle,
    x: i32,
    y: i32,
    text: &str,
    color: Color,
) {
    if let Some(face) = font.face() {
        draw_face_text(frame, width, height, face, font.size_px(), x, y, text, color);
        return;
    }
    for (line_index, line) in text.split('\n').enumerate() {
        let line_y = y + line_index as i32 * line_advance(font);
        let mut glyph_x = x;
        for ch in line.chars() {
            draw_glyph_clipped(frame, width, height, font, glyph_x, line_y, glyph_for(ch), color);
            glyph_x += glyph_advance(font);
        }
    }
}

/// Antialiased outlines. `y` is the top of the first line, not its baseline.
#[allow(clippy::too_many_arguments)]
fn draw_face_text(
    frame: &mut [u8],
    width: u32,
    height: u32,
    face: &FontArc,
    size_px: u32,
    x: i32,
    y: i32,
    text: &str,
    color: Color,
) {
    if width == 0 || height == 0 {
        return;
    }
    let scaled = face.as_scaled(PxScale::from(size_px as f32));
    let line_height = scaled.height() + scaled.line_gap();
    let [r, g, b, a] = color.0;

    for (line_index, line) in text.split('\n').enumerate() {
        let baseline = y as f32 + scaled.ascent() + line_index as f32 * line_height;
        let mut caret = x as f32;
        let mut previous: Option<GlyphId> = None;
        for ch in line.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, id);
            }
            previous = Some(id);
            let glyph = id.with_scale_and_position(scaled.scale(), point(caret, baseline));
            caret += scaled.h_advance(id);

            let Some(outline) = face.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outline.px_bounds();
            let left = bounds.min.x as i32;
            let top = bounds.min.y as i32;
            if top >= height as i32 || left >= width as i32 {
                continue;
            }
            outline.draw(|gx, gy, coverage| {
                let alpha = (coverage.clamp(0.0, 1.0) * a as f32).round() as u8;
                write_pixel_rgba_clipped(
                    frame,
                    width as usize,
                    left + gx as i32,
                    top + gy as i32,
                    [r, g, b, alpha],
                );
            });
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    font: &FontHandle,
    x: i32,
    y: i32,
    rows: [u8; 5],
    color: Color,
) {
    if width == 0 || height == 0 {
        return;
    }
    let scale = font.scale();

    for (row_index, row_bits) in rows.iter().enumerate() {
        let glyph_y = y + row_index as i32 * scale;
        if glyph_y + scale <= 0 || glyph_y >= height as i32 {
            continue;
        }

        for col in 0..GLYPH_WIDTH {
            if (row_bits & (1 << (GLYPH_WIDTH - 1 - col))) == 0 {
                continue;
            }
            let glyph_x = x + col * scale;
            for sy in 0..scale {
                for sx in 0..scale {
                    write_pixel_rgba_clipped(
                        frame,
                        width as usize,
                        glyph_x + sx,
                        glyph_y + sy,
                        color.0,
                    );
                }
            }
        }
    }
}

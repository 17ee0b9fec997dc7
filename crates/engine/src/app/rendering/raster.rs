use crate::app::canvas::{DrawTransform, ImageHandle};
use crate::app::geometry::Rect;

pub(crate) fn write_pixel_rgba_clipped(frame: &mut [u8], width: usize, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x as usize >= width {
        return;
    }
    let x = x as usize;
    let y = y as usize;
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    blend_into(&mut frame[byte_offset..end], color);
}

fn blend_into(dst: &mut [u8], src: [u8; 4]) {
    let alpha = src[3] as u32;
    if alpha == 0 {
        return;
    }
    if alpha == 255 {
        dst.copy_from_slice(&src);
        return;
    }
    let inv = 255 - alpha;
    for channel in 0..3 {
        dst[channel] = ((src[channel] as u32 * alpha + dst[channel] as u32 * inv) / 255) as u8;
    }
    dst[3] = 255;
}

pub(crate) fn clear(frame: &mut [u8], color: [u8; 4]) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&color);
    }
}

/// Nearest-neighbour stretch of `image` into `dest`, clipped to the frame.
pub(crate) fn blit_image(
    frame: &mut [u8],
    width: u32,
    height: u32,
    image: &ImageHandle,
    dest: Rect,
    transform: DrawTransform,
) {
    let dest = transform.apply(dest);
    if image.width() == 0 || image.height() == 0 || dest.width <= 0 || dest.height <= 0 {
        return;
    }
    if width == 0 || height == 0 {
        return;
    }

    let draw_left = dest.pos.x.max(0);
    let draw_top = dest.pos.y.max(0);
    let draw_right = dest.right().min(width as i32);
    let draw_bottom = dest.bottom().min(height as i32);
    if draw_left >= draw_right || draw_top >= draw_bottom {
        return;
    }

    let src_w = image.width() as i64;
    let src_h = image.height() as i64;
    let rgba = image.rgba();
    let frame_width = width as usize;

    for out_y in draw_top..draw_bottom {
        let mut dy = (out_y - dest.pos.y) as i64;
        if transform.half_turn {
            dy = dest.height as i64 - 1 - dy;
        }
        let src_y = (dy * src_h / dest.height as i64).clamp(0, src_h - 1) as usize;

        for out_x in draw_left..draw_right {
            let mut dx = (out_x - dest.pos.x) as i64;
            if transform.half_turn {
                dx = dest.width as i64 - 1 - dx;
            }
            let src_x = (dx * src_w / dest.width as i64).clamp(0, src_w - 1) as usize;
            let src_offset = (src_y * src_w as usize + src_x) * 4;
            let color = [
                rgba[src_offset],
                rgba[src_offset + 1],
                rgba[src_offset + 2],
                rgba[src_offset + 3],
            ];
            write_pixel_rgba_clipped(frame, frame_width, out_x, out_y, color);
        }
    }
}

//! Deterministic frame annotation: a ring around the marker and an id label.

use std::ops::RangeInclusive;

use super::MarkerCircle;
use crate::registry::domain::MarkerId;
use image::{Rgb, RgbImage};

const ANNOTATION_COLOUR: Rgb<u8> = Rgb([0, 255, 0]);
const RING_HALF_WIDTH: f64 = 1.5;
const LABEL_GAP: i64 = 5;
const LABEL_SCALE: i64 = 2;
const GLYPH_WIDTH: i64 = 3;
const GLYPH_HEIGHT: i64 = 5;
/// Raises the label so its cells straddle the centre row.
const LABEL_LIFT: i64 = (GLYPH_HEIGHT * LABEL_SCALE) >> 1;

/// Draws a three-pixel ring at `circle` and an `ID <n>` label to its right.
///
/// Pixels falling outside the frame are clipped; only the part of the ring's
/// bounding box inside the frame is visited.
pub fn annotate_marker(frame: &mut RgbImage, circle: MarkerCircle, id: MarkerId) {
    draw_ring(frame, circle);
    let label = format!("ID {id}");
    let origin_u = circle
        .center_u
        .saturating_add(circle.radius)
        .saturating_add(LABEL_GAP);
    let origin_v = circle.center_v.saturating_sub(LABEL_LIFT);
    draw_text(frame, &label, origin_u, origin_v);
}

#[expect(
    clippy::cast_precision_loss,
    reason = "saturated coordinates only need an approximate distance"
)]
fn draw_ring(frame: &mut RgbImage, circle: MarkerCircle) {
    let reach = circle.radius.saturating_add(2);
    let (Some(columns), Some(rows)) = (
        clipped_span(circle.center_u, reach, frame.width()),
        clipped_span(circle.center_v, reach, frame.height()),
    ) else {
        return;
    };
    let radius = circle.radius as f64;
    let center_u = circle.center_u as f64;
    let center_v = circle.center_v as f64;
    for y in rows {
        for x in columns.clone() {
            let distance = (f64::from(x) - center_u).hypot(f64::from(y) - center_v);
            if (distance - radius).abs() <= RING_HALF_WIDTH {
                paint(frame, i64::from(x), i64::from(y));
            }
        }
    }
}

/// Pixel indices within `reach` of `center` that lie inside `0..extent`.
fn clipped_span(center: i64, reach: i64, extent: u32) -> Option<RangeInclusive<u32>> {
    let start = center.saturating_sub(reach).max(0);
    let end = center.saturating_add(reach).min(i64::from(extent) - 1);
    if start > end {
        return None;
    }
    Some(u32::try_from(start).ok()?..=u32::try_from(end).ok()?)
}

fn draw_text(frame: &mut RgbImage, text: &str, origin_u: i64, origin_v: i64) {
    let advance = (GLYPH_WIDTH + 1) * LABEL_SCALE;
    let mut pen_u = origin_u;
    for ch in text.chars() {
        if pen_u >= i64::from(frame.width()) {
            break;
        }
        for (row, bits) in (0..).zip(glyph(ch)) {
            for column in 0..GLYPH_WIDTH {
                if bits & (0b100 >> column) != 0 {
                    fill_cell(
                        frame,
                        pen_u.saturating_add(column * LABEL_SCALE),
                        origin_v.saturating_add(row * LABEL_SCALE),
                    );
                }
            }
        }
        pen_u = pen_u.saturating_add(advance);
    }
}

fn fill_cell(frame: &mut RgbImage, u: i64, v: i64) {
    for dv in 0..LABEL_SCALE {
        for du in 0..LABEL_SCALE {
            paint(frame, u.saturating_add(du), v.saturating_add(dv));
        }
    }
}

fn paint(frame: &mut RgbImage, u: i64, v: i64) {
    let (Ok(x), Ok(y)) = (u32::try_from(u), u32::try_from(v)) else {
        return;
    };
    if let Some(pixel) = frame.get_pixel_mut_checked(x, y) {
        *pixel = ANNOTATION_COLOUR;
    }
}

/// 3x5 bitmap rows, most significant of the three bits on the left.
const fn glyph(ch: char) -> [u8; 5] {
    match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        _ => [0; 5],
    }
}

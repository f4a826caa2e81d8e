//! Procedural placeholder avatar: a neutral head-and-shoulders silhouette.

use crate::frame::{FrameRgba, Rgba8};

/// Fixed silhouette color drawn over the configured background.
pub const SILHOUETTE_COLOR: Rgba8 = Rgba8::opaque(0xd4, 0xd4, 0xd4);

// Proportions relative to the destination buffer.
const HEAD_CENTER_Y: f64 = 0.35;
const HEAD_RADIUS: f64 = 0.20;
const BODY_CENTER_Y: f64 = 0.80;
const BODY_RADIUS_X: f64 = 0.30;
const BODY_RADIUS_Y: f64 = 0.30;

/// Fill `dst` with `background` and draw the deterministic placeholder
/// silhouette: a circular head over an elliptical body, both horizontally
/// centered. Purely procedural, no external asset.
pub fn draw_placeholder(dst: &mut FrameRgba, background: Rgba8) {
    dst.fill(background);

    let w = f64::from(dst.width);
    let h = f64::from(dst.height);

    let head_cx = w / 2.0;
    let head_cy = h * HEAD_CENTER_Y;
    let head_r = h * HEAD_RADIUS;

    let body_cx = w / 2.0;
    let body_cy = h * BODY_CENTER_Y;
    let body_rx = w * BODY_RADIUS_X;
    let body_ry = h * BODY_RADIUS_Y;

    for y in 0..dst.height {
        for x in 0..dst.width {
            // sample at the pixel center
            let px = f64::from(x) + 0.5;
            let py = f64::from(y) + 0.5;

            let in_head = {
                let dx = px - head_cx;
                let dy = py - head_cy;
                dx * dx + dy * dy <= head_r * head_r
            };
            let in_body = {
                let dx = (px - body_cx) / body_rx;
                let dy = (py - body_cy) / body_ry;
                dx * dx + dy * dy <= 1.0
            };

            if in_head || in_body {
                dst.put_pixel(x, y, SILHOUETTE_COLOR);
            }
        }
    }
}

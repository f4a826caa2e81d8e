//! CPU compositing passes that fill a sprite-sized destination buffer from a
//! video frame (cover fit) or a mask image (contain fit).

use crate::error::{CamspriteError, CamspriteResult};
use crate::fit::{contain_fit, cover_crop};
use crate::frame::{FrameRgba, Rgba8};
use crate::mask::MaskImage;

/// Draw the current video frame into `dst` with cover semantics: the source is
/// center-cropped to the destination aspect ratio and scaled to exactly fill
/// the buffer. No letterboxing.
pub fn draw_video_frame(dst: &mut FrameRgba, src: &FrameRgba) -> CamspriteResult<()> {
    if src.width == 0 || src.height == 0 {
        return Err(CamspriteError::validation(
            "video frame source has zero dimensions",
        ));
    }
    if src.rgba8.len() != src.canvas().byte_len() {
        return Err(CamspriteError::validation(
            "video frame byte length does not match its dimensions",
        ));
    }

    let crop = cover_crop(src.canvas(), dst.canvas());
    for dy in 0..dst.height {
        let sy = crop.y + span_index(dy, dst.height, crop.height);
        for dx in 0..dst.width {
            let sx = crop.x + span_index(dx, dst.width, crop.width);
            let px = sample_px(src, sx, sy);
            dst.put_pixel(dx, dy, px);
        }
    }
    Ok(())
}

/// Draw a mask image into `dst` with contain semantics: the whole image stays
/// visible, shrunk to fit and centered, with `background` filling the
/// letterbox bands.
pub fn draw_mask_image(dst: &mut FrameRgba, img: &MaskImage, background: Rgba8) {
    dst.fill(background);

    let fit = contain_fit(img.canvas(), dst.canvas());
    for fy in 0..fit.height {
        let sy = span_index(fy, fit.height, img.height);
        for fx in 0..fit.width {
            let sx = span_index(fx, fit.width, img.width);
            dst.put_pixel(fit.x + fx, fit.y + fy, img.pixel(sx, sy));
        }
    }
}

/// Map index `i` of a span of `len` onto a span of `src_len` using
/// center-of-pixel nearest sampling.
fn span_index(i: u32, len: u32, src_len: u32) -> u32 {
    let t = (f64::from(i) + 0.5) / f64::from(len);
    let s = (t * f64::from(src_len)).floor();
    (s.max(0.0) as u32).min(src_len.saturating_sub(1))
}

fn sample_px(src: &FrameRgba, x: u32, y: u32) -> Rgba8 {
    let cx = x.min(src.width - 1);
    let cy = y.min(src.height - 1);
    src.pixel(cx, cy).unwrap_or(Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    })
}

//! Aspect-ratio fitting math shared by the video and mask compositors.
//!
//! Two fits are supported:
//! - cover: scale-and-crop so the destination is fully filled, excess source cropped;
//! - contain: scale-to-fit so the whole source is visible, margins letterboxed.

use crate::frame::Canvas;

/// Source-space crop rectangle produced by a cover fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge in source pixels.
    pub x: u32,
    /// Top edge in source pixels.
    pub y: u32,
    /// Crop width in source pixels.
    pub width: u32,
    /// Crop height in source pixels.
    pub height: u32,
}

/// Destination-space placement rectangle produced by a contain fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitRect {
    /// Left edge in destination pixels.
    pub x: u32,
    /// Top edge in destination pixels.
    pub y: u32,
    /// Placed width in destination pixels.
    pub width: u32,
    /// Placed height in destination pixels.
    pub height: u32,
}

/// Centered cover-fit crop: the returned source region has the destination's
/// aspect ratio and scales to exactly fill it, no margins.
///
/// A relatively wider source is cropped symmetrically left/right; a relatively
/// taller one symmetrically top/bottom.
pub fn cover_crop(src: Canvas, dst: Canvas) -> CropRect {
    let src_aspect = src.aspect();
    let dst_aspect = dst.aspect();

    if src_aspect > dst_aspect {
        let width = clamp_span((f64::from(src.height) * dst_aspect).round(), src.width);
        CropRect {
            x: (src.width - width) / 2,
            y: 0,
            width,
            height: src.height,
        }
    } else {
        let height = clamp_span((f64::from(src.width) / dst_aspect).round(), src.height);
        CropRect {
            x: 0,
            y: (src.height - height) / 2,
            width: src.width,
            height,
        }
    }
}

/// Centered contain-fit placement: the returned destination region preserves
/// the source aspect ratio and leaves symmetric letterbox bands on the
/// shrunken axis.
pub fn contain_fit(src: Canvas, dst: Canvas) -> FitRect {
    let src_aspect = src.aspect();
    let dst_aspect = dst.aspect();

    if src_aspect > dst_aspect {
        let height = clamp_span((f64::from(dst.width) / src_aspect).round(), dst.height);
        FitRect {
            x: 0,
            y: (dst.height - height) / 2,
            width: dst.width,
            height,
        }
    } else {
        let width = clamp_span((f64::from(dst.height) * src_aspect).round(), dst.width);
        FitRect {
            x: (dst.width - width) / 2,
            y: 0,
            width,
            height: dst.height,
        }
    }
}

fn clamp_span(value: f64, max: u32) -> u32 {
    (value.max(1.0) as u32).min(max)
}

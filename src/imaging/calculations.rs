//! Pure calculation functions for photo display sizes.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale `source` to the largest size that fits inside `bounds` while
/// keeping its aspect ratio.
///
/// One edge always matches the box exactly; the other is at most the box.
/// Small photos are scaled up, since the box is a display size, not a cap.
///
/// # Examples
/// ```
/// # use field_journal::imaging::fit_within;
/// // 4:3 landscape into 450x300 → height-bound
/// assert_eq!(fit_within((1600, 1200), (450, 300)), (400, 300));
///
/// // 2:3 portrait into 450x300 → height-bound, narrow
/// assert_eq!(fit_within((1000, 1500), (450, 300)), (200, 300));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (box_w, box_h) = bounds;
    if src_w == 0 || src_h == 0 {
        return bounds;
    }

    let src_aspect = src_w as f64 / src_h as f64;
    let box_aspect = box_w as f64 / box_h as f64;

    if src_aspect > box_aspect {
        // Source is wider: width matches, height shrinks
        let h = (box_w as f64 / src_aspect).round() as u32;
        (box_w, h.max(1))
    } else {
        // Source is taller (or same shape): height matches, width shrinks
        let w = (box_h as f64 * src_aspect).round() as u32;
        (w.max(1), box_h)
    }
}

/// Resolve the display size of a photo inside its box.
///
/// With `preserve_aspect` the photo is fitted via [`fit_within`]; otherwise
/// it is stretched to the box, which is the classic journal layout.
pub fn display_size(source: (u32, u32), bounds: (u32, u32), preserve_aspect: bool) -> (u32, u32) {
    if preserve_aspect {
        fit_within(source, bounds)
    } else {
        bounds
    }
}

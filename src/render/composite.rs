//! Source-over merge of rasterized stroke layers into the committed image.
//!
//! A stroke layer comes straight out of the rasterizer: each pixel is the paint color already
//! scaled by coverage, so it can be blended without a separate opacity.

use crate::foundation::error::{SigpadError, SigpadResult};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Blend one stroke-layer pixel over an existing committed pixel.
pub fn blend_over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        alpha => {
            let keep = 255 - u32::from(alpha);
            std::array::from_fn(|i| {
                let under = (u32::from(dst[i]) * keep + 127) / 255;
                (u32::from(src[i]) + under).min(255) as u8
            })
        }
    }
}

/// Merge a whole stroke layer into `committed`. Both must describe the same pixel grid.
pub fn composite_layer(committed: &mut [u8], layer: &[u8]) -> SigpadResult<()> {
    if committed.len() != layer.len() || !layer.len().is_multiple_of(4) {
        return Err(SigpadError::render(format!(
            "stroke layer of {} bytes does not match committed image of {} bytes",
            layer.len(),
            committed.len()
        )));
    }
    for (dst, src) in committed.chunks_exact_mut(4).zip(layer.chunks_exact(4)) {
        if src[3] == 0 {
            continue;
        }
        let out = blend_over([dst[0], dst[1], dst[2], dst[3]], [src[0], src[1], src[2], src[3]]);
        dst.copy_from_slice(&out);
    }
    Ok(())
}

/// Merge another piece of the same stroke into its coverage layer.
///
/// Pieces of one stroke overlap where they meet. Each pixel keeps whichever piece covers it more
/// (the newer piece on ties), so overlaps never build up extra ink.
pub fn union_layer(layer: &mut [u8], piece: &[u8]) -> SigpadResult<()> {
    if layer.len() != piece.len() || !piece.len().is_multiple_of(4) {
        return Err(SigpadError::render(format!(
            "stroke piece of {} bytes does not match stroke layer of {} bytes",
            piece.len(),
            layer.len()
        )));
    }
    for (dst, src) in layer.chunks_exact_mut(4).zip(piece.chunks_exact(4)) {
        if src[3] != 0 && src[3] >= dst[3] {
            dst.copy_from_slice(src);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;

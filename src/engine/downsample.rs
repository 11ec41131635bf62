use crate::core::data::rgba_buffer::RgbaBuffer;

/// Box-filter downsampling for supersampled renders.
///
/// Each output pixel is the per-channel mean of a `factor` x `factor` block,
/// truncated toward zero. Source dimensions must be exact multiples of the
/// factor; render targets are sized that way before computing.
#[must_use]
pub fn downsample_box(src: &RgbaBuffer, factor: u32) -> RgbaBuffer {
    if factor <= 1 {
        return src.clone();
    }

    let out_width = src.width() / factor;
    let out_height = src.height() / factor;
    let mut out = RgbaBuffer::new(out_width, out_height);

    let src_bytes = src.as_bytes();
    let samples = factor * factor;

    for oy in 0..out_height {
        for ox in 0..out_width {
            let mut sums = [0u32; 4];

            for dy in 0..factor {
                for dx in 0..factor {
                    let sx = ox * factor + dx;
                    let sy = oy * factor + dy;
                    let offset = (sy as usize * src.width() as usize + sx as usize) * 4;
                    for channel in 0..4 {
                        sums[channel] += u32::from(src_bytes[offset + channel]);
                    }
                }
            }

            let offset = (oy as usize * out_width as usize + ox as usize) * 4;
            let out_bytes = out.as_bytes_mut();
            for channel in 0..4 {
                out_bytes[offset + channel] = (sums[channel] / samples) as u8;
            }
        }
    }

    out
}

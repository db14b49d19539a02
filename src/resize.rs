/*
 * Copyright (c) Radzivon Bartoshyk, 11/2024. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
#![forbid(unsafe_code)]
use crate::resample::ResampleQuality;
use crate::{ImageError, Result, Size};
use fast_image_resize::images::Image as ResizeImage;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};

type Pixel = [f32; 4];

const PIXEL_BYTES: usize = std::mem::size_of::<Pixel>();

impl ResampleQuality {
    fn filter(self) -> FilterType {
        match self {
            ResampleQuality::Fast => FilterType::Bilinear,
            ResampleQuality::Accurate => FilterType::CatmullRom,
        }
    }
}

#[inline]
fn dimension(v: usize) -> Result<u32> {
    u32::try_from(v).map_err(|_| ImageError::PointerOverflow)
}

fn write_pixels(pixels: &[Pixel], buffer: &mut [u8]) {
    for (pixel, dst) in pixels.iter().zip(buffer.chunks_exact_mut(PIXEL_BYTES)) {
        for (channel, bytes) in pixel.iter().zip(dst.chunks_exact_mut(4)) {
            bytes.copy_from_slice(&channel.to_ne_bytes());
        }
    }
}

fn read_pixels(buffer: &[u8]) -> Vec<Pixel> {
    buffer
        .chunks_exact(PIXEL_BYTES)
        .map(|src| {
            let mut pixel = [0f32; 4];
            for (channel, bytes) in pixel.iter_mut().zip(src.chunks_exact(4)) {
                *channel = f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            }
            pixel
        })
        .collect()
}

/// Resizes a `src_size` grid of pixels to `dst_size` with a separable convolution.
///
/// Channels are filtered independently, alpha is never premultiplied. Equal sizes copy unchanged.
pub(crate) fn resize(
    src: &[Pixel],
    src_size: Size,
    dst_size: Size,
    quality: ResampleQuality,
) -> Result<Vec<Pixel>> {
    debug_assert_eq!(src.len(), src_size.width * src_size.height);
    if dst_size.width == 0 || dst_size.height == 0 {
        return Ok(Vec::new());
    }
    if src_size.width == 0 || src_size.height == 0 {
        return Ok(vec![[0., 0., 0., 1.]; dst_size.width * dst_size.height]);
    }
    if src_size == dst_size {
        return Ok(src.to_vec());
    }

    let mut source = ResizeImage::new(
        dimension(src_size.width)?,
        dimension(src_size.height)?,
        PixelType::F32x4,
    );
    write_pixels(src, source.buffer_mut());
    let mut target = ResizeImage::new(
        dimension(dst_size.width)?,
        dimension(dst_size.height)?,
        PixelType::F32x4,
    );
    let options = ResizeOptions::new()
        .resize_alg(ResizeAlg::Convolution(quality.filter()))
        .use_alpha(false);
    let mut resizer = Resizer::new();
    resizer.resize(&source, &mut target, &options)?;
    Ok(read_pixels(target.buffer()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey(v: f32) -> Pixel {
        [v, v, v, 1.]
    }

    #[test]
    fn pixels_survive_byte_staging() {
        let pixels = vec![[0.25, -0.5, 1.5, 1.], [0., 1., 0.125, 0.5]];
        let mut buffer = vec![0u8; pixels.len() * PIXEL_BYTES];
        write_pixels(&pixels, &mut buffer);
        assert_eq!(read_pixels(&buffer), pixels);
    }

    #[test]
    fn constant_image_stays_constant() {
        let src = vec![grey(0.25); 17 * 9];
        for quality in [ResampleQuality::Fast, ResampleQuality::Accurate] {
            let dst = resize(&src, Size::new(17, 9), Size::new(8, 20), quality).unwrap();
            assert_eq!(dst.len(), 8 * 20);
            for pixel in dst {
                assert!((pixel[0] - 0.25).abs() < 1e-4);
                assert!((pixel[1] - 0.25).abs() < 1e-4);
                assert!((pixel[2] - 0.25).abs() < 1e-4);
                assert!((pixel[3] - 1.).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn alpha_is_not_premultiplied() {
        let src = vec![[0.75, 0.5, 0.25, 0.]; 6 * 6];
        let dst = resize(&src, Size::new(6, 6), Size::new(3, 4), ResampleQuality::Fast).unwrap();
        for pixel in dst {
            assert!((pixel[0] - 0.75).abs() < 1e-4);
            assert!(pixel[3].abs() < 1e-4);
        }
    }

    #[test]
    fn halving_symmetric_row_is_symmetric() {
        let src: Vec<Pixel> = [0., 1., 1., 0.].iter().map(|&v| grey(v)).collect();
        let dst = resize(&src, Size::new(4, 1), Size::new(2, 1), ResampleQuality::Fast).unwrap();
        assert_eq!(dst.len(), 2);
        assert!((dst[0][0] - dst[1][0]).abs() < 1e-4);
        assert!(dst[0][0] > 0. && dst[0][0] < 1.);
    }

    #[test]
    fn same_size_is_exact() {
        let src: Vec<Pixel> = (0..12).map(|v| grey(v as f32 / 11.)).collect();
        let dst = resize(&src, Size::new(4, 3), Size::new(4, 3), ResampleQuality::Accurate).unwrap();
        assert_eq!(dst, src);
    }
}

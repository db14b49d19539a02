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
use crate::colour::{dci_gamma_encode, linear_rgb_to_dci_xyz};
use crate::numerics::lrint;
use crate::sample_io::SampleStore;
use crate::{Alignment, Image, ImageError, PixelFormat, Position, Result, YuvToRgb};
use linear_srgb::default::srgb_to_linear;
use num_traits::AsPrimitive;

/// Channel layout of an overlay accepted by [Image::alpha_blend]
#[derive(Debug, Copy, Clone)]
struct Overlay<'a> {
    image: &'a Image,
    /// Byte offsets of red, green, blue and alpha inside a pixel
    offsets: [usize; 4],
    bpp: usize,
    wide: bool,
}

impl<'a> Overlay<'a> {
    fn new(image: &'a Image) -> Result<Overlay<'a>> {
        let (offsets, bpp, wide) = match image.pixel_format() {
            PixelFormat::Bgra => ([2, 1, 0, 3], 4, false),
            PixelFormat::Rgba => ([0, 1, 2, 3], 4, false),
            PixelFormat::Rgba64be => ([0, 2, 4, 6], 8, true),
            format => {
                return Err(ImageError::UnsupportedFormat {
                    operation: "alpha_blend overlay",
                    format,
                })
            }
        };
        Ok(Overlay {
            image,
            offsets,
            bpp,
            wide,
        })
    }

    #[inline]
    fn max(&self) -> f32 {
        if self.wide {
            65535.
        } else {
            255.
        }
    }

    /// Raw channel value, 8 or 16 bit
    #[inline]
    fn channel(&self, row: &[u8], x: usize, channel: usize) -> f32 {
        let at = x * self.bpp + self.offsets[channel];
        if self.wide {
            u16::load(&row[at..], true) as f32
        } else {
            row[at] as f32
        }
    }

    /// Channel scaled to 8 bits, 16 bit overlays are divided by 256
    #[inline]
    fn channel8(&self, row: &[u8], x: usize, channel: usize) -> f32 {
        let v = self.channel(row, x, channel);
        if self.wide {
            v / 256.
        } else {
            v
        }
    }

    /// Channel scaled to 16 bits, 8 bit overlays are multiplied by 256
    #[inline]
    fn channel16(&self, row: &[u8], x: usize, channel: usize) -> f32 {
        let v = self.channel(row, x, channel);
        if self.wide {
            v
        } else {
            v * 256.
        }
    }

    #[inline]
    fn alpha(&self, row: &[u8], x: usize) -> f32 {
        self.channel(row, x, 3) / self.max()
    }
}

/// Overlapping part of a target and an overlay placed at a position
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Overlap {
    target_x: usize,
    target_y: usize,
    overlay_x: usize,
    overlay_y: usize,
    width: usize,
    height: usize,
}

impl Overlap {
    /// `None` when the overlay misses the target
    fn new(target: &Image, overlay: &Image, position: Position) -> Option<Overlap> {
        let axis = |at: i32, target_len: usize, overlay_len: usize| {
            let (t, o) = if at < 0 {
                (0usize, at.unsigned_abs() as usize)
            } else {
                (at as usize, 0usize)
            };
            let len = target_len.saturating_sub(t).min(overlay_len.saturating_sub(o));
            (t, o, len)
        };
        let (target_x, overlay_x, width) =
            axis(position.x, target.size().width, overlay.size().width);
        let (target_y, overlay_y, height) =
            axis(position.y, target.size().height, overlay.size().height);
        if width == 0 || height == 0 {
            return None;
        }
        Some(Overlap {
            target_x,
            target_y,
            overlay_x,
            overlay_y,
            width,
            height,
        })
    }
}

#[inline(always)]
fn over(src: f32, dst: f32, alpha: f32) -> f32 {
    src * alpha + dst * (1. - alpha)
}

/// Byte offsets of red, green, blue and optional alpha in an 8 bit packed target pixel
fn blend_rgb8(
    target: &mut Image,
    overlay: &Overlay,
    overlap: &Overlap,
    offsets: [usize; 3],
    alpha_offset: Option<usize>,
    bpp: usize,
) {
    for row in 0..overlap.height {
        let o_row = overlay.image.row(0, overlap.overlay_y + row);
        let t_row = target.row_mut(0, overlap.target_y + row);
        for i in 0..overlap.width {
            let ox = overlap.overlay_x + i;
            let tp = &mut t_row[(overlap.target_x + i) * bpp..];
            let alpha = overlay.alpha(o_row, ox);
            for (channel, &offset) in offsets.iter().enumerate() {
                tp[offset] = over(overlay.channel8(o_row, ox, channel), tp[offset] as f32, alpha) as u8;
            }
            if let Some(offset) = alpha_offset {
                tp[offset] = over(overlay.channel8(o_row, ox, 3), tp[offset] as f32, alpha) as u8;
            }
        }
    }
}

fn blend_rgb48le(target: &mut Image, overlay: &Overlay, overlap: &Overlap) {
    for row in 0..overlap.height {
        let o_row = overlay.image.row(0, overlap.overlay_y + row);
        let t_row = target.row_mut(0, overlap.target_y + row);
        for i in 0..overlap.width {
            let ox = overlap.overlay_x + i;
            let tp = &mut t_row[(overlap.target_x + i) * 6..];
            let alpha = overlay.alpha(o_row, ox);
            for channel in 0..3 {
                let sample = &mut tp[channel * 2..];
                let t = u16::load(sample, false) as f32;
                (over(overlay.channel16(o_row, ox, channel), t, alpha) as u16).store(sample, false);
            }
        }
    }
}

fn blend_xyz12le(target: &mut Image, overlay: &Overlay, overlap: &Overlap) {
    let max = overlay.max();
    for row in 0..overlap.height {
        let o_row = overlay.image.row(0, overlap.overlay_y + row);
        let t_row = target.row_mut(0, overlap.target_y + row);
        for i in 0..overlap.width {
            let ox = overlap.overlay_x + i;
            let tp = &mut t_row[(overlap.target_x + i) * 6..];
            let alpha = overlay.alpha(o_row, ox);
            let linear = [
                srgb_to_linear(overlay.channel(o_row, ox, 0) / max),
                srgb_to_linear(overlay.channel(o_row, ox, 1) / max),
                srgb_to_linear(overlay.channel(o_row, ox, 2) / max),
            ];
            let xyz = linear_rgb_to_dci_xyz(linear);
            for (channel, v) in xyz.iter().enumerate() {
                let quantized = lrint(v * 65535.) as f32 / 65535.;
                let encoded = lrint(dci_gamma_encode(quantized) * 65535.) as f32;
                let sample = &mut tp[channel * 2..];
                let t = u16::load(sample, false) as f32;
                (over(encoded, t, alpha) as u16).store(sample, false);
            }
        }
    }
}

/// Blends one plane row; `shift` maps luma columns onto subsampled chroma columns
#[inline]
fn blend_yuv_line<T: SampleStore>(
    target: &mut [u8],
    overlay: &[u8],
    target_x: usize,
    overlay_x: usize,
    alphas: &[f32],
    shift: u8,
) where
    f32: AsPrimitive<T>,
{
    for (i, &alpha) in alphas.iter().enumerate() {
        let tx = ((target_x + i) >> shift) * T::BYTES;
        let ox = ((overlay_x + i) >> shift) * T::BYTES;
        let o: f32 = T::load(&overlay[ox..], false).as_();
        let t: f32 = T::load(&target[tx..], false).as_();
        let blended: T = over(o, t, alpha).as_();
        blended.store(&mut target[tx..], false);
    }
}

/// Blends `yuv`, the overlay converted to the target format, with alpha of the original overlay.
///
/// Chroma samples are blended once for every luma sample they cover.
fn blend_yuv<T: SampleStore>(target: &mut Image, yuv: &Image, overlay: &Overlay, overlap: &Overlap)
where
    f32: AsPrimitive<T>,
{
    let descriptor = target.descriptor();
    let shift_w = descriptor.log2_chroma_w;
    let shift_h = descriptor.log2_chroma_h;
    let mut alphas = vec![0f32; overlap.width];
    for row in 0..overlap.height {
        let ty = overlap.target_y + row;
        let oy = overlap.overlay_y + row;
        let o_row = overlay.image.row(0, oy);
        for (i, alpha) in alphas.iter_mut().enumerate() {
            *alpha = overlay.alpha(o_row, overlap.overlay_x + i);
        }
        blend_yuv_line::<T>(
            target.row_mut(0, ty),
            yuv.row(0, oy),
            overlap.target_x,
            overlap.overlay_x,
            &alphas,
            0,
        );
        for plane in 1..3 {
            blend_yuv_line::<T>(
                target.row_mut(plane, ty >> shift_h),
                yuv.row(plane, oy >> shift_h),
                overlap.target_x,
                overlap.overlay_x,
                &alphas,
                shift_w,
            );
        }
    }
}

impl Image {
    /// Composites `other` over this image at `position` with `dst = src * a + dst * (1 - a)`.
    ///
    /// `other` must be `bgra`, `rgba` or `rgba64be`; parts outside this image are skipped,
    /// negative positions skip leading overlay rows and columns.
    /// YUV targets receive the overlay converted with Rec.709.
    pub fn alpha_blend(&mut self, other: &Image, position: Position) -> Result<()> {
        let overlay = Overlay::new(other)?;
        let format = self.pixel_format();
        match format {
            PixelFormat::Rgb24
            | PixelFormat::Bgra
            | PixelFormat::Rgba
            | PixelFormat::Rgb48le
            | PixelFormat::Xyz12le
            | PixelFormat::Yuv420p
            | PixelFormat::Yuv420p10le
            | PixelFormat::Yuv422p10le
            | PixelFormat::Yuv444p10le => {}
            _ => {
                return Err(ImageError::UnsupportedFormat {
                    operation: "alpha_blend",
                    format,
                })
            }
        }
        let Some(overlap) = Overlap::new(self, other, position) else {
            return Ok(());
        };
        match format {
            PixelFormat::Rgb24 => blend_rgb8(self, &overlay, &overlap, [0, 1, 2], None, 3),
            PixelFormat::Bgra => blend_rgb8(self, &overlay, &overlap, [2, 1, 0], Some(3), 4),
            PixelFormat::Rgba => blend_rgb8(self, &overlay, &overlap, [0, 1, 2], Some(3), 4),
            PixelFormat::Rgb48le => blend_rgb48le(self, &overlay, &overlap),
            PixelFormat::Xyz12le => blend_xyz12le(self, &overlay, &overlap),
            _ => {
                let padded;
                let source = if other.alignment() == Alignment::Padded {
                    other
                } else {
                    padded = other.with_alignment(Alignment::Padded)?;
                    &padded
                };
                let yuv =
                    source.convert_pixel_format(YuvToRgb::Rec709, format, Alignment::Compact, false)?;
                if format == PixelFormat::Yuv420p {
                    blend_yuv::<u8>(self, &yuv, &overlay, &overlap);
                } else {
                    blend_yuv::<u16>(self, &yuv, &overlay, &overlap);
                }
            }
        }
        Ok(())
    }

    /// Copies the overlapping rows of `other` into this image at `position`.
    ///
    /// # Panics
    ///
    /// Unless both images are `rgb24` and `position` is not negative.
    pub fn copy(&mut self, other: &Image, position: Position) {
        assert!(
            self.pixel_format() == PixelFormat::Rgb24 && other.pixel_format() == PixelFormat::Rgb24,
            "Copy is only implemented for rgb24 onto rgb24"
        );
        assert!(position.x >= 0 && position.y >= 0, "Negative copy position");
        let Some(overlap) = Overlap::new(self, other, position) else {
            return;
        };
        for row in 0..overlap.height {
            let src = &other.row(0, overlap.overlay_y + row)[..overlap.width * 3];
            let start = overlap.target_x * 3;
            self.row_mut(0, overlap.target_y + row)[start..start + overlap.width * 3]
                .copy_from_slice(src);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Size;
    use rand::Rng;

    fn random_image(format: PixelFormat, size: Size) -> Image {
        let mut image = Image::new(format, size, Alignment::Padded).unwrap();
        let mut rng = rand::rng();
        for plane in 0..image.planes() {
            for y in 0..image.sample_size(plane).height {
                image.row_mut(plane, y).iter_mut().for_each(|v| *v = rng.random());
            }
        }
        image
    }

    fn rgba_filled(size: Size, pixel: [u8; 4]) -> Image {
        let mut image = Image::new(PixelFormat::Rgba, size, Alignment::Compact).unwrap();
        for y in 0..size.height {
            for chunk in image.row_mut(0, y).chunks_exact_mut(4) {
                chunk.copy_from_slice(&pixel);
            }
        }
        image
    }

    #[test]
    fn overlay_fully_outside_leaves_target() {
        let overlay = rgba_filled(Size::new(10, 10), [255, 255, 255, 255]);
        for format in [PixelFormat::Rgb24, PixelFormat::Yuv420p, PixelFormat::Xyz12le] {
            let mut image = random_image(format, Size::new(16, 16));
            let before = image.clone();
            for position in [
                Position::new(-100, -100),
                Position::new(-10, 0),
                Position::new(0, 16),
                Position::new(1000, 3),
            ] {
                image.alpha_blend(&overlay, position).unwrap();
                assert!(image == before, "{} {:?}", format, position);
            }
        }
    }

    #[test]
    fn opaque_and_half_alpha_onto_rgb24() {
        let mut image = Image::new(PixelFormat::Rgb24, Size::new(4, 2), Alignment::Padded).unwrap();
        image.make_black();
        image
            .alpha_blend(&rgba_filled(Size::new(2, 1), [200, 100, 50, 255]), Position::new(1, 0))
            .unwrap();
        assert_eq!(image.row(0, 0), &[0, 0, 0, 200, 100, 50, 200, 100, 50, 0, 0, 0]);
        assert_eq!(image.row(0, 1), &[0u8; 12]);
        image
            .alpha_blend(&rgba_filled(Size::new(1, 1), [200, 100, 50, 128]), Position::new(0, 1))
            .unwrap();
        assert_eq!(&image.row(0, 1)[..3], &[100, 50, 25]);
    }

    #[test]
    fn negative_position_offsets_overlay_read() {
        let mut overlay = Image::new(PixelFormat::Bgra, Size::new(4, 2), Alignment::Compact).unwrap();
        overlay
            .row_mut(0, 1)
            .copy_from_slice(&[1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255, 10, 11, 12, 255]);
        let mut image = Image::new(PixelFormat::Rgb24, Size::new(3, 1), Alignment::Padded).unwrap();
        image.make_black();
        image.alpha_blend(&overlay, Position::new(-2, -1)).unwrap();
        assert_eq!(image.row(0, 0), &[9, 8, 7, 12, 11, 10, 0, 0, 0]);
    }

    #[test]
    fn alpha_channel_is_blended_on_four_channel_targets() {
        let mut image = Image::new(PixelFormat::Bgra, Size::new(1, 1), Alignment::Padded).unwrap();
        image.make_transparent().unwrap();
        image
            .alpha_blend(&rgba_filled(Size::new(1, 1), [10, 20, 30, 255]), Position::new(0, 0))
            .unwrap();
        assert_eq!(image.row(0, 0), &[30, 20, 10, 255]);
    }

    #[test]
    fn wide_overlay_onto_8_bit_target() {
        let mut overlay = Image::new(PixelFormat::Rgba64be, Size::new(1, 1), Alignment::Compact).unwrap();
        overlay
            .row_mut(0, 0)
            .copy_from_slice(&[0xFF, 0x00, 0x80, 0x00, 0x00, 0x00, 0xFF, 0xFF]);
        let mut image = Image::new(PixelFormat::Rgba, Size::new(1, 1), Alignment::Padded).unwrap();
        image.make_black();
        image.alpha_blend(&overlay, Position::new(0, 0)).unwrap();
        assert_eq!(image.row(0, 0), &[255, 128, 0, 255]);
    }

    #[test]
    fn eight_bit_overlay_onto_rgb48le() {
        let mut image = Image::new(PixelFormat::Rgb48le, Size::new(1, 1), Alignment::Padded).unwrap();
        image.make_black();
        image
            .alpha_blend(&rgba_filled(Size::new(1, 1), [255, 1, 0, 255]), Position::new(0, 0))
            .unwrap();
        assert_eq!(image.row(0, 0), &[0x00, 0xFF, 0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn opaque_overlay_onto_xyz12le() {
        let mut image = Image::new(PixelFormat::Xyz12le, Size::new(2, 1), Alignment::Padded).unwrap();
        image.make_black();
        let mut overlay = Image::new(PixelFormat::Rgba, Size::new(2, 1), Alignment::Compact).unwrap();
        overlay
            .row_mut(0, 0)
            .copy_from_slice(&[255, 255, 255, 255, 0, 0, 0, 255]);
        image.alpha_blend(&overlay, Position::new(0, 0)).unwrap();
        let row = image.row(0, 0);
        let companding = 48. / 52.37f64;
        let white = [
            (0.4124564 + 0.3575761 + 0.1804375) * companding,
            (0.2126729 + 0.7151522 + 0.0721750) * companding,
            (0.0193339 + 0.1191920 + 0.9503041) * companding,
        ];
        for (channel, v) in white.iter().enumerate() {
            let expected = (v.min(1.).powf(1. / 2.6) * 65535.).round() as i64;
            let actual = u16::from_le_bytes([row[channel * 2], row[channel * 2 + 1]]) as i64;
            assert!((expected - actual).abs() <= 8, "{} {}", expected, actual);
        }
        assert_eq!(&row[6..], &[0u8; 6]);
    }

    #[test]
    fn opaque_white_onto_yuv420p() {
        let mut image = Image::new(PixelFormat::Yuv420p, Size::new(8, 8), Alignment::Padded).unwrap();
        image.make_black();
        image
            .alpha_blend(&rgba_filled(Size::new(4, 4), [255, 255, 255, 255]), Position::new(2, 2))
            .unwrap();
        assert_eq!(image.row(0, 1), &[0u8; 8]);
        assert_eq!(image.row(0, 2), &[0, 0, 235, 235, 235, 235, 0, 0]);
        assert_eq!(image.row(0, 5), &[0, 0, 235, 235, 235, 235, 0, 0]);
        assert_eq!(image.row(1, 1), &[127, 128, 128, 127]);
        assert_eq!(image.row(2, 0), &[127u8; 4]);
        assert_eq!(image.row(2, 2), &[127, 128, 128, 127]);
    }

    #[test]
    fn transparent_overlay_leaves_yuv() {
        let mut image = random_image(PixelFormat::Yuv444p10le, Size::new(6, 6));
        let before = image.clone();
        image
            .alpha_blend(&rgba_filled(Size::new(6, 6), [255, 0, 0, 0]), Position::new(0, 0))
            .unwrap();
        assert!(image == before);
    }

    #[test]
    fn opaque_black_onto_yuv422p10le() {
        let mut image = random_image(PixelFormat::Yuv422p10le, Size::new(4, 2));
        image
            .alpha_blend(&rgba_filled(Size::new(4, 2), [0, 0, 0, 255]), Position::new(0, 0))
            .unwrap();
        assert_eq!(image.row(0, 1), &[64, 0, 64, 0, 64, 0, 64, 0]);
        assert_eq!(image.row(1, 1), &[0, 2, 0, 2]);
        assert_eq!(image.row(2, 0), &[0, 2, 0, 2]);
    }

    #[test]
    fn unsupported_formats_are_reported() {
        let mut image = random_image(PixelFormat::Rgb24, Size::new(4, 4));
        let overlay = random_image(PixelFormat::Rgb24, Size::new(2, 2));
        assert!(matches!(
            image.alpha_blend(&overlay, Position::new(0, 0)),
            Err(ImageError::UnsupportedFormat {
                format: PixelFormat::Rgb24,
                ..
            })
        ));
        let mut image = random_image(PixelFormat::Yuv444p, Size::new(4, 4));
        let before = image.clone();
        let overlay = rgba_filled(Size::new(2, 2), [1, 2, 3, 4]);
        assert!(matches!(
            image.alpha_blend(&overlay, Position::new(-50, -50)),
            Err(ImageError::UnsupportedFormat {
                operation: "alpha_blend",
                format: PixelFormat::Yuv444p
            })
        ));
        assert!(image == before);
    }

    #[test]
    fn copy_clips_to_target() {
        let mut image = Image::new(PixelFormat::Rgb24, Size::new(3, 3), Alignment::Padded).unwrap();
        image.make_black();
        let mut other = Image::new(PixelFormat::Rgb24, Size::new(2, 2), Alignment::Compact).unwrap();
        other.row_mut(0, 0).copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        other.row_mut(0, 1).copy_from_slice(&[7, 8, 9, 10, 11, 12]);
        image.copy(&other, Position::new(2, 1));
        assert_eq!(image.row(0, 0), &[0u8; 9]);
        assert_eq!(image.row(0, 1), &[0, 0, 0, 0, 0, 0, 1, 2, 3]);
        assert_eq!(image.row(0, 2), &[0, 0, 0, 0, 0, 0, 7, 8, 9]);
        image.copy(&other, Position::new(5, 5));
        assert_eq!(image.row(0, 2), &[0, 0, 0, 0, 0, 0, 7, 8, 9]);
    }

    #[test]
    #[should_panic]
    fn copy_rejects_negative_position() {
        let mut image = Image::new(PixelFormat::Rgb24, Size::new(3, 3), Alignment::Padded).unwrap();
        let other = image.clone();
        image.copy(&other, Position::new(-1, 0));
    }
}

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
use crate::numerics::round_down_pow2;
use crate::resample::{
    ResampleParams, ResampleQuality, Resampler, SoftwareResampler, SourceRegion, TargetRegion,
};
use crate::{Alignment, Crop, Image, PixelFormat, Result, Size, VideoRange, YuvToRgb};
use log::debug;

/// Pixels a crop must leave in each dimension unless configured otherwise
pub const DEFAULT_MIN_REMAINING: usize = 4;

/// Describes [Image::crop_scale_window]: crop the source, scale it to `inter_size`
/// and centre it on a black `out_size` canvas.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScaleWindow {
    pub(crate) crop: Crop,
    pub(crate) inter_size: Size,
    pub(crate) out_size: Size,
    pub(crate) yuv_to_rgb: YuvToRgb,
    pub(crate) video_range: VideoRange,
    pub(crate) out_format: PixelFormat,
    pub(crate) out_video_range: VideoRange,
    pub(crate) out_alignment: Alignment,
    pub(crate) fast: bool,
    pub(crate) min_remaining: usize,
}

impl ScaleWindow {
    /// Uncropped, Rec.709, video range in and out, compact output, fast scaling
    pub fn new(inter_size: Size, out_size: Size, out_format: PixelFormat) -> Self {
        Self {
            crop: Crop::default(),
            inter_size,
            out_size,
            yuv_to_rgb: YuvToRgb::Rec709,
            video_range: VideoRange::Video,
            out_format,
            out_video_range: VideoRange::Video,
            out_alignment: Alignment::Compact,
            fast: true,
            min_remaining: DEFAULT_MIN_REMAINING,
        }
    }

    /// Pixels removed from the source before scaling
    pub fn crop(mut self, crop: Crop) -> Self {
        self.crop = crop;
        self
    }

    pub fn yuv_to_rgb(mut self, yuv_to_rgb: YuvToRgb) -> Self {
        self.yuv_to_rgb = yuv_to_rgb;
        self
    }

    /// Range of the source samples
    pub fn video_range(mut self, range: VideoRange) -> Self {
        self.video_range = range;
        self
    }

    pub fn out_video_range(mut self, range: VideoRange) -> Self {
        self.out_video_range = range;
        self
    }

    pub fn out_alignment(mut self, alignment: Alignment) -> Self {
        self.out_alignment = alignment;
        self
    }

    /// Bilinear when set, bicubic otherwise
    pub fn fast(mut self, fast: bool) -> Self {
        self.fast = fast;
        self
    }

    /// Smallest width and height a crop may leave of the source
    ///
    /// Larger crops are replaced by a crop of the trailing edges only, see [Crop::clamp].
    pub fn min_remaining(mut self, pixels: usize) -> Self {
        self.min_remaining = pixels;
        self
    }

    fn resample_params(&self) -> ResampleParams {
        ResampleParams::new()
            .quality(if self.fast {
                ResampleQuality::Fast
            } else {
                ResampleQuality::Accurate
            })
            .yuv_to_rgb(self.yuv_to_rgb)
            .input_range(self.video_range)
            .output_range(self.out_video_range)
    }
}

impl Image {
    /// Crops, scales and centres this image on a new black canvas, see [ScaleWindow].
    ///
    /// # Panics
    ///
    /// When this image is not [Alignment::Padded] or the output is smaller than the
    /// intermediate size.
    pub fn crop_scale_window(&self, window: &ScaleWindow) -> Result<Image> {
        self.crop_scale_window_with(window, &SoftwareResampler)
    }

    /// [Image::crop_scale_window] with a caller provided [Resampler]
    pub fn crop_scale_window_with<R: Resampler + ?Sized>(
        &self,
        window: &ScaleWindow,
        resampler: &R,
    ) -> Result<Image> {
        assert_eq!(
            self.alignment(),
            Alignment::Padded,
            "Scaling requires a padded source"
        );
        let inter_size = window.inter_size;
        let out_size = window.out_size;
        assert!(
            out_size.width >= inter_size.width && out_size.height >= inter_size.height,
            "Output {}x{} is smaller than intermediate {}x{}",
            out_size.width,
            out_size.height,
            inter_size.width,
            inter_size.height
        );

        let mut out = Image::new(window.out_format, out_size, window.out_alignment)?;
        out.make_black();

        let in_descriptor = self.descriptor();
        let out_descriptor = out.descriptor();

        let crop = window
            .crop
            .round_for_subsampling(in_descriptor)
            .clamp(self.size(), window.min_remaining);
        let cropped_size = crop.apply(self.size());

        let corner_x = round_down_pow2(
            (out_size.width - inter_size.width) / 2,
            out_descriptor.log2_chroma_w,
        );
        let corner_y = round_down_pow2(
            (out_size.height - inter_size.height) / 2,
            out_descriptor.log2_chroma_h,
        );

        debug!(
            "Scaling {} {}x{} cropped to {}x{} into {}x{} at ({}, {}) of {} {}x{}",
            self.pixel_format(),
            self.size().width,
            self.size().height,
            cropped_size.width,
            cropped_size.height,
            inter_size.width,
            inter_size.height,
            corner_x,
            corner_y,
            window.out_format,
            out_size.width,
            out_size.height
        );

        resampler.resample(
            &SourceRegion::new(self, crop.left, crop.top, cropped_size),
            &mut TargetRegion::new(&mut out, corner_x, corner_y, inter_size),
            &window.resample_params(),
        )?;

        // Resampling may bleed into the side bars, which follow the rounded corner.
        let right = corner_x + inter_size.width;
        if corner_x > 0 {
            out.make_part_black(0, corner_x);
        }
        if right < out_size.width {
            out.make_part_black(right, out_size.width - right);
        }

        if window.video_range == VideoRange::Video
            && window.out_video_range == VideoRange::Full
            && in_descriptor.is_rgb()
        {
            out.video_range_to_full_range()?;
        }

        Ok(out)
    }

    /// Scales the whole image to `out_size` in `out_format`, both sides video range.
    ///
    /// # Panics
    ///
    /// When this image is not [Alignment::Padded].
    pub fn scale(
        &self,
        out_size: Size,
        yuv_to_rgb: YuvToRgb,
        out_format: PixelFormat,
        out_alignment: Alignment,
        fast: bool,
    ) -> Result<Image> {
        assert_eq!(
            self.alignment(),
            Alignment::Padded,
            "Scaling requires a padded source"
        );
        let mut scaled = Image::new(out_format, out_size, out_alignment)?;
        let params = ResampleParams::new()
            .quality(if fast {
                ResampleQuality::Fast
            } else {
                ResampleQuality::Accurate
            })
            .yuv_to_rgb(yuv_to_rgb);
        SoftwareResampler.resample(
            &SourceRegion::new(self, 0, 0, self.size()),
            &mut TargetRegion::new(&mut scaled, 0, 0, out_size),
            &params,
        )?;
        Ok(scaled)
    }

    /// Same size [Image::scale] into another pixel format
    pub fn convert_pixel_format(
        &self,
        yuv_to_rgb: YuvToRgb,
        out_format: PixelFormat,
        out_alignment: Alignment,
        fast: bool,
    ) -> Result<Image> {
        self.scale(self.size(), yuv_to_rgb, out_format, out_alignment, fast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageError;
    use std::cell::RefCell;

    fn rgb24_filled(size: Size, pixel: [u8; 3]) -> Image {
        let mut image = Image::new(PixelFormat::Rgb24, size, Alignment::Padded).unwrap();
        for y in 0..size.height {
            for chunk in image.row_mut(0, y).chunks_exact_mut(3) {
                chunk.copy_from_slice(&pixel);
            }
        }
        image
    }

    #[test]
    fn black_yuv420p_scales_to_black_rgb24() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut image = Image::new(PixelFormat::Yuv420p, Size::new(64, 64), Alignment::Padded).unwrap();
        image.make_black();
        for y in 0..64 {
            assert!(image.row(0, y).iter().all(|&v| v == 0));
        }
        for plane in 1..3 {
            for y in 0..32 {
                assert!(image.row(plane, y).iter().all(|&v| v == 127));
            }
        }
        let window = ScaleWindow::new(Size::new(32, 32), Size::new(32, 32), PixelFormat::Rgb24)
            .out_alignment(Alignment::Compact)
            .out_video_range(VideoRange::Full);
        let out = image.crop_scale_window(&window).unwrap();
        assert_eq!(out.size(), Size::new(32, 32));
        assert_eq!(out.pixel_format(), PixelFormat::Rgb24);
        assert_eq!(out.stride(0), 96);
        for y in 0..32 {
            assert!(out.row(0, y).iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn intermediate_is_centred_between_black_bars() {
        let image = rgb24_filled(Size::new(8, 8), [200, 100, 50]);
        let window = ScaleWindow::new(Size::new(8, 8), Size::new(16, 8), PixelFormat::Rgb24);
        let out = image.crop_scale_window(&window).unwrap();
        for y in 0..8 {
            let row = out.row(0, y);
            assert!(row[..12].iter().all(|&v| v == 0));
            for x in 4..12 {
                assert_eq!(&row[x * 3..x * 3 + 3], &[200, 100, 50]);
            }
            assert!(row[36..].iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn odd_padding_keeps_first_picture_column() {
        let image = rgb24_filled(Size::new(8, 8), [200, 200, 200]);
        let window = ScaleWindow::new(Size::new(8, 8), Size::new(14, 8), PixelFormat::Yuv420p);
        let out = image.crop_scale_window(&window).unwrap();
        for y in 0..8 {
            assert_eq!(
                out.row(0, y),
                &[0, 0, 188, 188, 188, 188, 188, 188, 188, 188, 0, 0, 0, 0]
            );
        }
        for y in 0..4 {
            assert_eq!(out.row(1, y), &[127, 128, 128, 128, 128, 127, 127]);
        }
    }

    #[test]
    fn odd_crop_is_rounded_for_420_source() {
        let mut image = Image::new(PixelFormat::Yuv420p, Size::new(8, 4), Alignment::Padded).unwrap();
        image.make_black();
        for y in 0..4 {
            for (x, v) in image.row_mut(0, y).iter_mut().enumerate() {
                *v = 20 * x as u8 + 10;
            }
        }
        let window = ScaleWindow::new(Size::new(6, 4), Size::new(6, 4), PixelFormat::Yuv420p)
            .crop(Crop::new(3, 0, 0, 0));
        let out = image.crop_scale_window(&window).unwrap();
        assert_eq!(out.row(0, 0), &[50, 70, 90, 110, 130, 150]);
        assert_eq!(out.row(1, 1), &[127, 127, 127]);
    }

    #[test]
    fn resampler_receives_window_geometry() {
        struct Recorder {
            calls: RefCell<Vec<((usize, usize), Size, (usize, usize), Size, ResampleParams)>>,
        }

        impl Resampler for Recorder {
            fn resample(
                &self,
                src: &SourceRegion,
                dst: &mut TargetRegion,
                params: &ResampleParams,
            ) -> Result<()> {
                self.calls
                    .borrow_mut()
                    .push((src.origin(), src.size(), dst.origin(), dst.size(), *params));
                Ok(())
            }
        }

        let image = rgb24_filled(Size::new(100, 50), [1, 2, 3]);
        let recorder = Recorder {
            calls: RefCell::new(Vec::new()),
        };
        let window = ScaleWindow::new(Size::new(40, 20), Size::new(45, 30), PixelFormat::Yuv420p)
            .crop(Crop::new(10, 20, 5, 5))
            .fast(false)
            .yuv_to_rgb(YuvToRgb::Rec601);
        let out = image.crop_scale_window_with(&window, &recorder).unwrap();
        assert_eq!(out.size(), Size::new(45, 30));
        let calls = recorder.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (src_origin, src_size, dst_origin, dst_size, params) = calls[0];
        assert_eq!(src_origin, (10, 5));
        assert_eq!(src_size, Size::new(70, 40));
        assert_eq!(dst_origin, (2, 4));
        assert_eq!(dst_size, Size::new(40, 20));
        assert_eq!(params.quality, ResampleQuality::Accurate);
        assert_eq!(params.yuv_to_rgb, YuvToRgb::Rec601);
        assert_eq!(out.row(0, 0), &[0u8; 45]);
    }

    #[test]
    fn oversized_crop_keeps_margin() {
        let image = rgb24_filled(Size::new(20, 10), [9, 9, 9]);
        let window = ScaleWindow::new(Size::new(4, 4), Size::new(4, 4), PixelFormat::Rgb24)
            .crop(Crop::new(15, 15, 0, 0));
        let out = image.crop_scale_window(&window).unwrap();
        assert_eq!(out.row(0, 3), &[9u8; 12]);
    }

    #[test]
    fn rgb_video_range_is_expanded_to_full() {
        let image = rgb24_filled(Size::new(4, 4), [16, 235, 126]);
        let window = ScaleWindow::new(Size::new(4, 4), Size::new(4, 4), PixelFormat::Rgb24)
            .out_video_range(VideoRange::Full);
        let out = image.crop_scale_window(&window).unwrap();
        assert_eq!(&out.row(0, 2)[..3], &[0, 255, 129]);

        let window = ScaleWindow::new(Size::new(4, 4), Size::new(4, 4), PixelFormat::Rgba)
            .out_video_range(VideoRange::Full);
        assert!(matches!(
            image.crop_scale_window(&window),
            Err(ImageError::UnsupportedFormat {
                format: PixelFormat::Rgba,
                ..
            })
        ));
    }

    #[test]
    #[should_panic]
    fn compact_source_is_rejected() {
        let image = Image::new(PixelFormat::Rgb24, Size::new(8, 8), Alignment::Compact).unwrap();
        let _ = image.crop_scale_window(&ScaleWindow::new(
            Size::new(8, 8),
            Size::new(8, 8),
            PixelFormat::Rgb24,
        ));
    }

    #[test]
    #[should_panic]
    fn output_smaller_than_intermediate_is_rejected() {
        let image = rgb24_filled(Size::new(8, 8), [0, 0, 0]);
        let _ = image.crop_scale_window(&ScaleWindow::new(
            Size::new(8, 8),
            Size::new(4, 8),
            PixelFormat::Rgb24,
        ));
    }

    #[test]
    fn scale_and_convert() {
        let mut image = Image::new(PixelFormat::Yuv420p, Size::new(16, 16), Alignment::Padded).unwrap();
        image.make_black();
        let scaled = image
            .scale(Size::new(8, 6), YuvToRgb::Rec709, PixelFormat::Rgb24, Alignment::Padded, true)
            .unwrap();
        assert_eq!(scaled.size(), Size::new(8, 6));
        assert_eq!(scaled.stride(0), 64);
        for y in 0..6 {
            assert!(scaled.row(0, y).iter().all(|&v| v == 0));
        }

        let rgba = rgb24_filled(Size::new(3, 3), [1, 2, 3])
            .convert_pixel_format(YuvToRgb::Rec709, PixelFormat::Rgba, Alignment::Compact, false)
            .unwrap();
        assert_eq!(rgba.size(), Size::new(3, 3));
        assert_eq!(rgba.row(0, 2), &[1, 2, 3, 255, 1, 2, 3, 255, 1, 2, 3, 255]);
    }
}

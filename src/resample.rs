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
use crate::colour::{rescale_yuv, rgb_to_xyz, rgb_to_yuv, xyz_to_rgb, yuv_to_rgb};
use crate::format_descriptor::{ColourFamily, FormatDescriptor};
use crate::resize::resize;
use crate::sample_io::{pack, unpack};
use crate::{Image, Result, Size, VideoRange, YuvToRgb};
use log::trace;
#[cfg(feature = "rayon")]
use rayon::iter::ParallelIterator;
#[cfg(feature = "rayon")]
use rayon::prelude::ParallelSliceMut;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
/// Interpolation used when the window changes size
pub enum ResampleQuality {
    /// Bilinear
    #[default]
    Fast,
    /// Bicubic, Catmull-Rom
    Accurate,
}

/// Options handed to a [Resampler].
///
/// Ranges only describe YUV sides; RGB and XYZ are always full range.
/// Formats with a full range flag (`yuvj*`) override the declared range.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ResampleParams {
    pub quality: ResampleQuality,
    pub yuv_to_rgb: YuvToRgb,
    pub input_range: VideoRange,
    pub output_range: VideoRange,
}

impl ResampleParams {
    pub fn new() -> ResampleParams {
        ResampleParams::default()
    }

    pub fn quality(mut self, quality: ResampleQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn yuv_to_rgb(mut self, yuv_to_rgb: YuvToRgb) -> Self {
        self.yuv_to_rgb = yuv_to_rgb;
        self
    }

    pub fn input_range(mut self, range: VideoRange) -> Self {
        self.input_range = range;
        self
    }

    pub fn output_range(mut self, range: VideoRange) -> Self {
        self.output_range = range;
        self
    }
}

/// Window of an image read by a [Resampler]
#[derive(Debug, Copy, Clone)]
pub struct SourceRegion<'a> {
    image: &'a Image,
    x: usize,
    y: usize,
    size: Size,
}

impl<'a> SourceRegion<'a> {
    /// Panics when the window leaves the image
    pub fn new(image: &'a Image, x: usize, y: usize, size: Size) -> SourceRegion<'a> {
        assert!(
            x + size.width <= image.size().width && y + size.height <= image.size().height,
            "Source window {}x{} at ({}, {}) is outside of {}x{}",
            size.width,
            size.height,
            x,
            y,
            image.size().width,
            image.size().height
        );
        SourceRegion { image, x, y, size }
    }

    pub fn image(&self) -> &'a Image {
        self.image
    }

    pub fn origin(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

/// Window of an image written by a [Resampler], the origin sits on the chroma grid
#[derive(Debug)]
pub struct TargetRegion<'a> {
    image: &'a mut Image,
    x: usize,
    y: usize,
    size: Size,
}

impl<'a> TargetRegion<'a> {
    /// Panics when the window leaves the image or splits subsampled chroma at its origin
    pub fn new(image: &'a mut Image, x: usize, y: usize, size: Size) -> TargetRegion<'a> {
        let descriptor = image.descriptor();
        assert!(
            x + size.width <= image.size().width && y + size.height <= image.size().height,
            "Target window {}x{} at ({}, {}) is outside of {}x{}",
            size.width,
            size.height,
            x,
            y,
            image.size().width,
            image.size().height
        );
        assert_eq!(x & ((1 << descriptor.log2_chroma_w) - 1), 0);
        assert_eq!(y & ((1 << descriptor.log2_chroma_h) - 1), 0);
        TargetRegion { image, x, y, size }
    }

    pub fn image(&self) -> &Image {
        self.image
    }

    pub fn image_mut(&mut self) -> &mut Image {
        self.image
    }

    pub fn origin(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

/// Scales a source window into a target window, converting pixel format on the way
pub trait Resampler {
    fn resample(
        &self,
        src: &SourceRegion,
        dst: &mut TargetRegion,
        params: &ResampleParams,
    ) -> Result<()>;
}

/// Portable [Resampler]: unpacks to normalized float, resizes with `fast_image_resize`,
/// converts colour family and packs.
///
/// Colour conversion runs over rows in parallel with the `rayon` feature.
#[derive(Debug, Copy, Clone, Default)]
pub struct SoftwareResampler;

fn convert_family(
    pixels: &mut [[f32; 4]],
    from: &FormatDescriptor,
    to: &FormatDescriptor,
    params: &ResampleParams,
) {
    let input_range = if from.full_range {
        VideoRange::Full
    } else {
        params.input_range
    };
    let output_range = if to.full_range {
        VideoRange::Full
    } else {
        params.output_range
    };
    let matrix = params.yuv_to_rgb;
    match (from.family, to.family) {
        (ColourFamily::Yuv, ColourFamily::Yuv) => rescale_yuv(
            pixels,
            (from.depth(), input_range),
            (to.depth(), output_range),
        ),
        (ColourFamily::Yuv, ColourFamily::Rgb) => {
            yuv_to_rgb(pixels, from.depth(), input_range, matrix)
        }
        (ColourFamily::Yuv, ColourFamily::Xyz) => {
            yuv_to_rgb(pixels, from.depth(), input_range, matrix);
            rgb_to_xyz(pixels);
        }
        (ColourFamily::Rgb, ColourFamily::Yuv) => {
            rgb_to_yuv(pixels, to.depth(), output_range, matrix)
        }
        (ColourFamily::Xyz, ColourFamily::Yuv) => {
            xyz_to_rgb(pixels);
            rgb_to_yuv(pixels, to.depth(), output_range, matrix);
        }
        (ColourFamily::Rgb, ColourFamily::Xyz) => rgb_to_xyz(pixels),
        (ColourFamily::Xyz, ColourFamily::Rgb) => xyz_to_rgb(pixels),
        (ColourFamily::Rgb, ColourFamily::Rgb) | (ColourFamily::Xyz, ColourFamily::Xyz) => {}
    }
}

impl Resampler for SoftwareResampler {
    fn resample(
        &self,
        src: &SourceRegion,
        dst: &mut TargetRegion,
        params: &ResampleParams,
    ) -> Result<()> {
        let source = src.image();
        trace!(
            "Resampling {} {}x{} at {:?} to {} {}x{} at {:?}, {:?}",
            source.pixel_format(),
            src.size.width,
            src.size.height,
            src.origin(),
            dst.image.pixel_format(),
            dst.size.width,
            dst.size.height,
            dst.origin(),
            params
        );
        let pixels = unpack(source, src.x, src.y, src.size);
        let mut pixels = resize(&pixels, src.size, dst.size, params.quality)?;
        if pixels.is_empty() {
            return Ok(());
        }
        let from = source.descriptor();
        let to = dst.image.descriptor();
        let iter;
        #[cfg(feature = "rayon")]
        {
            iter = pixels.par_chunks_mut(dst.size.width);
        }
        #[cfg(not(feature = "rayon"))]
        {
            iter = pixels.chunks_mut(dst.size.width);
        }
        iter.for_each(|row| convert_family(row, from, to, params));
        pack(&pixels, dst.image, dst.x, dst.y, dst.size);
        Ok(())
    }
}

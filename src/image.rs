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
use crate::format_descriptor::FormatDescriptor;
use crate::image_error::check_overflow_v2;
use crate::plane::{Plane, ALIGNMENT};
use crate::{ImageError, ImageFrame, PixelFormat, Result, Size};
use log::debug;
use std::io::{Read, Write};

/// Images above this many bytes are reported on allocation
const LARGE_IMAGE_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
/// Row layout of image planes
pub enum Alignment {
    /// Stride equals line size
    #[default]
    Compact,
    /// Stride is rounded up to a multiple of [ALIGNMENT], required by resampling
    Padded,
}

/// Owned planar image in one of the supported pixel formats.
///
/// Every plane keeps `line_size` bytes of samples per row at `stride` bytes
/// apart; with [Alignment::Padded] strides are multiples of [ALIGNMENT].
/// Cloning is a deep copy with identical geometry.
#[derive(Debug, Clone)]
pub struct Image {
    pixel_format: PixelFormat,
    size: Size,
    alignment: Alignment,
    planes: Vec<Plane>,
}

impl Image {
    /// Allocates an image, sample values are unspecified until a fill
    pub fn new(pixel_format: PixelFormat, size: Size, alignment: Alignment) -> Result<Image> {
        let descriptor = pixel_format.descriptor();
        let mut planes = Vec::with_capacity(descriptor.planes());
        for index in 0..descriptor.planes() {
            let sample_size = descriptor.sample_size(index, size);
            let line_size = check_overflow_v2(
                sample_size.width,
                descriptor.plane(index).step as usize,
            )?;
            let stride = match alignment {
                Alignment::Compact => line_size,
                Alignment::Padded => line_size
                    .checked_next_multiple_of(ALIGNMENT)
                    .ok_or(ImageError::PointerOverflow)?,
            };
            planes.push(Plane::try_alloc(line_size, stride, sample_size.height)?);
        }
        let image = Image {
            pixel_format,
            size,
            alignment,
            planes,
        };
        if image.memory_used() > LARGE_IMAGE_BYTES {
            debug!(
                "Allocated {} {}x{} {:?} image, {} bytes",
                pixel_format,
                size.width,
                size.height,
                alignment,
                image.memory_used()
            );
        }
        Ok(image)
    }

    /// Copies an external frame into a newly allocated image
    pub fn from_frame(frame: &ImageFrame, alignment: Alignment) -> Result<Image> {
        frame.check_constraints()?;
        let mut image = Image::new(frame.pixel_format, frame.size, alignment)?;
        for (plane, source) in image.planes.iter_mut().zip(frame.planes.iter()) {
            let line_size = plane.line_size();
            for (y, row) in plane.rows_mut().enumerate() {
                let offset = y * source.stride;
                row.copy_from_slice(&source.data[offset..offset + line_size]);
            }
        }
        Ok(image)
    }

    /// Deep copy of this image with another alignment
    pub fn with_alignment(&self, alignment: Alignment) -> Result<Image> {
        let mut image = Image::new(self.pixel_format, self.size, alignment)?;
        for (dst, src) in image.planes.iter_mut().zip(self.planes.iter()) {
            dst.copy_rows_from(src);
        }
        Ok(image)
    }

    /// Returns `image` itself when it already has `alignment`, otherwise a re-aligned copy
    pub fn ensure_alignment(image: Image, alignment: Alignment) -> Result<Image> {
        if image.alignment == alignment {
            return Ok(image);
        }
        image.with_alignment(alignment)
    }

    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    #[inline]
    pub fn descriptor(&self) -> &'static FormatDescriptor {
        self.pixel_format.descriptor()
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Number of planes
    #[inline]
    pub fn planes(&self) -> usize {
        self.planes.len()
    }

    #[inline]
    pub fn line_size(&self, plane: usize) -> usize {
        self.planes[plane].line_size()
    }

    #[inline]
    pub fn stride(&self, plane: usize) -> usize {
        self.planes[plane].stride()
    }

    /// Addressable samples of `plane`
    #[inline]
    pub fn sample_size(&self, plane: usize) -> Size {
        self.descriptor().sample_size(plane, self.size)
    }

    #[inline]
    pub fn bytes_per_pixel(&self, plane: usize) -> f32 {
        self.descriptor().bytes_per_pixel(plane)
    }

    /// Bytes of plane rows, `stride * sample height` summed over planes
    pub fn memory_used(&self) -> usize {
        self.planes
            .iter()
            .map(|plane| plane.stride() * plane.lines())
            .sum()
    }

    /// Rows of `plane`, `stride` bytes apart, `stride * sample height` long
    #[inline]
    pub fn plane_data(&self, plane: usize) -> &[u8] {
        self.planes[plane].valid()
    }

    #[inline]
    pub fn plane_data_mut(&mut self, plane: usize) -> &mut [u8] {
        self.planes[plane].valid_mut()
    }

    /// `line_size` bytes of row `y` of `plane`
    #[inline]
    pub fn row(&self, plane: usize, y: usize) -> &[u8] {
        self.planes[plane].row(y)
    }

    #[inline]
    pub fn row_mut(&mut self, plane: usize, y: usize) -> &mut [u8] {
        self.planes[plane].row_mut(y)
    }

    #[inline]
    pub(crate) fn plane(&self, plane: usize) -> &Plane {
        &self.planes[plane]
    }

    #[inline]
    pub(crate) fn plane_mut(&mut self, plane: usize) -> &mut Plane {
        &mut self.planes[plane]
    }

    #[inline]
    pub(crate) fn planes_mut(&mut self) -> &mut [Plane] {
        &mut self.planes
    }

    /// Writes `line_size` bytes of every row of every plane, padding is never sent
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for plane in self.planes.iter() {
            for row in plane.rows() {
                writer.write_all(row)?;
            }
        }
        Ok(())
    }

    /// Replaces sample rows with data produced by [Image::write_to] on an image of the same geometry.
    ///
    /// On failure the image is left untouched.
    pub fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let mut planes = Vec::with_capacity(self.planes.len());
        for plane in self.planes.iter() {
            let mut incoming = Plane::try_alloc(plane.line_size(), plane.stride(), plane.lines())?;
            for row in incoming.rows_mut() {
                reader.read_exact(row)?;
            }
            planes.push(incoming);
        }
        self.planes = planes;
        Ok(())
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        if self.pixel_format != other.pixel_format
            || self.alignment != other.alignment
            || self.planes.len() != other.planes.len()
        {
            return false;
        }
        self.planes.iter().zip(other.planes.iter()).all(|(a, b)| {
            a.lines() == b.lines()
                && a.line_size() == b.line_size()
                && a.stride() == b.stride()
                && a.rows().eq(b.rows())
        })
    }
}

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
use crate::image_error::{check_plane, ImageError, MismatchedSize};
use crate::{PixelFormat, Result, Size};

#[derive(Debug, Copy, Clone)]
/// One borrowed plane of an external frame
pub struct FramePlane<'a> {
    pub data: &'a [u8],
    /// Stride here always means bytes per row.
    pub stride: usize,
}

impl<'a> FramePlane<'a> {
    pub fn new(data: &'a [u8], stride: usize) -> FramePlane<'a> {
        FramePlane { data, stride }
    }
}

#[derive(Debug, Clone)]
/// Non owned representation of a decoded frame, e.g. handed over by a decoder.
///
/// Planes are expected in the order of the pixel format,
/// see [crate::FormatDescriptor::planes].
pub struct ImageFrame<'a> {
    pub pixel_format: PixelFormat,
    pub size: Size,
    pub planes: Vec<FramePlane<'a>>,
}

impl<'a> ImageFrame<'a> {
    pub fn new(pixel_format: PixelFormat, size: Size, planes: Vec<FramePlane<'a>>) -> Self {
        ImageFrame {
            pixel_format,
            size,
            planes,
        }
    }

    /// Checks that every plane slice can hold its rows at the declared stride
    pub fn check_constraints(&self) -> Result<()> {
        if self.size.width == 0 || self.size.height == 0 {
            return Err(ImageError::ZeroBaseSize);
        }
        let descriptor = self.pixel_format.descriptor();
        if self.planes.len() != descriptor.planes() {
            return Err(ImageError::PlaneCountMismatch(MismatchedSize {
                expected: descriptor.planes(),
                received: self.planes.len(),
            }));
        }
        for (index, plane) in self.planes.iter().enumerate() {
            let lines = descriptor.sample_size(index, self.size).height;
            let line_size = descriptor.line_size(index, self.size.width);
            check_plane(plane.data, plane.stride, line_size, lines)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_tight_planes() {
        let y = vec![0u8; 6 * 4];
        let u = vec![0u8; 3 * 2];
        let v = vec![0u8; 3 * 2];
        let frame = ImageFrame::new(
            PixelFormat::Yuv420p,
            Size::new(6, 4),
            vec![
                FramePlane::new(&y, 6),
                FramePlane::new(&u, 3),
                FramePlane::new(&v, 3),
            ],
        );
        assert!(frame.check_constraints().is_ok());
    }

    #[test]
    fn rejects_missing_plane() {
        let data = vec![0u8; 64];
        let frame = ImageFrame::new(
            PixelFormat::Yuv444p,
            Size::new(4, 4),
            vec![FramePlane::new(&data, 4), FramePlane::new(&data, 4)],
        );
        assert!(matches!(
            frame.check_constraints(),
            Err(ImageError::PlaneCountMismatch(MismatchedSize {
                expected: 3,
                received: 2
            }))
        ));
    }

    #[test]
    fn rejects_short_plane() {
        let data = vec![0u8; 3 * 4 * 2];
        let frame = ImageFrame::new(
            PixelFormat::Rgb24,
            Size::new(4, 4),
            vec![FramePlane::new(&data, 12)],
        );
        assert!(matches!(
            frame.check_constraints(),
            Err(ImageError::PlaneSizeMismatch(_))
        ));
    }

    #[test]
    fn rejects_empty_frame() {
        let frame = ImageFrame::new(PixelFormat::Rgb24, Size::new(0, 4), vec![]);
        assert!(matches!(
            frame.check_constraints(),
            Err(ImageError::ZeroBaseSize)
        ));
    }
}

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
use crate::numerics::subsampled;
use crate::sample_io::{fill_component_columns, fill_row, map_samples};
use crate::{Image, ImageError, PixelFormat, Result};

#[inline(always)]
fn fade_towards(v: i32, neutral: i32, factor: f32) -> i32 {
    neutral + ((v - neutral) as f32 * factor) as i32
}

impl Image {
    /// Fills the image with black: zero luma, RGB, XYZ and alpha, neutral chroma
    pub fn make_black(&mut self) {
        let descriptor = self.descriptor();
        let neutral = descriptor.chroma_neutral();
        if self.pixel_format() == PixelFormat::Uyvy422 {
            let pattern = [neutral as u8, 0, neutral as u8, 0];
            for row in self.plane_mut(0).rows_mut() {
                row.iter_mut()
                    .zip(pattern.iter().cycle())
                    .for_each(|(dst, &src)| *dst = src);
            }
            return;
        }
        let wide = descriptor.depth() > 8;
        for (index, plane) in self.planes_mut().iter_mut().enumerate() {
            let value = if descriptor.is_yuv() && (index == 1 || index == 2) {
                neutral
            } else {
                0
            };
            for row in plane.rows_mut() {
                if wide {
                    fill_row::<u16>(row, descriptor.big_endian, value);
                } else {
                    fill_row::<u8>(row, false, value as u8);
                }
            }
        }
    }

    /// Zeroes every channel of an alpha carrying RGB image
    pub fn make_transparent(&mut self) -> Result<()> {
        match self.pixel_format() {
            PixelFormat::Rgba | PixelFormat::Bgra | PixelFormat::Rgba64be => {
                for row in self.plane_mut(0).rows_mut() {
                    row.fill(0);
                }
                Ok(())
            }
            format => Err(ImageError::UnsupportedFormat {
                operation: "make_transparent",
                format,
            }),
        }
    }

    /// Blackens columns `start..start + width`, clipped to the image.
    ///
    /// Subsampled chroma covers `start >> log2_chroma_w` up to `(start + width) >> log2_chroma_w`,
    /// the last partial chroma column is included when the strip reaches the right edge.
    pub fn make_part_black(&mut self, start: usize, width: usize) {
        let image_width = self.size().width;
        let end = start.saturating_add(width).min(image_width);
        if start >= end {
            return;
        }
        let descriptor = self.descriptor();
        for index in 0..descriptor.components().len() {
            if descriptor.is_chroma_component(index) {
                let shift = descriptor.log2_chroma_w;
                let chroma_end = if end == image_width {
                    subsampled(end, shift)
                } else {
                    end >> shift
                };
                fill_component_columns(
                    self,
                    index,
                    start >> shift,
                    chroma_end,
                    descriptor.chroma_neutral() as u32,
                );
            } else {
                fill_component_columns(self, index, start, end, 0);
            }
        }
    }

    /// Fades towards black, `factor` 1 keeps the image and 0 makes it black.
    ///
    /// Samples become `trunc(v * factor)`, chroma moves towards neutral as
    /// `neutral + trunc((v - neutral) * factor)`.
    pub fn fade(&mut self, factor: f32) -> Result<()> {
        let format = self.pixel_format();
        match format {
            PixelFormat::Yuv420p | PixelFormat::Yuv422p10le => {
                let neutral = self.descriptor().chroma_neutral() as i32;
                let wide = format == PixelFormat::Yuv422p10le;
                for (index, plane) in self.planes_mut().iter_mut().enumerate() {
                    let neutral = if index == 0 { 0 } else { neutral };
                    if wide {
                        map_samples::<u16>(plane, false, |v| {
                            fade_towards(v as i32, neutral, factor) as u16
                        });
                    } else {
                        map_samples::<u8>(plane, false, |v| {
                            fade_towards(v as i32, neutral, factor) as u8
                        });
                    }
                }
            }
            PixelFormat::Rgb24 => {
                map_samples::<u8>(self.plane_mut(0), false, |v| (v as f32 * factor) as u8);
            }
            PixelFormat::Rgb48le | PixelFormat::Xyz12le => {
                map_samples::<u16>(self.plane_mut(0), false, |v| (v as f32 * factor) as u16);
            }
            _ => {
                return Err(ImageError::UnsupportedFormat {
                    operation: "fade",
                    format,
                })
            }
        }
        Ok(())
    }
}

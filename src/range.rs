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
use crate::numerics::lrint;
use crate::sample_io::map_samples;
use crate::{Image, ImageError, PixelFormat, Result};

/// Expands legal range samples of `format` to full range: `(v - offset) * factor`
#[derive(Debug, Copy, Clone)]
struct RangeExpansion {
    offset: f32,
    factor: f32,
    max: i64,
}

impl RangeExpansion {
    #[inline(always)]
    fn apply(&self, v: i32) -> i64 {
        lrint((v as f32 - self.offset) * self.factor).clamp(0, self.max)
    }
}

const RGB24_EXPANSION: RangeExpansion = RangeExpansion {
    offset: 16.,
    factor: 256. / 219.,
    max: 255,
};

const RGB48_EXPANSION: RangeExpansion = RangeExpansion {
    offset: 4096.,
    factor: 65536. / 56064.,
    max: 65535,
};

const GBRP12_EXPANSION: RangeExpansion = RangeExpansion {
    offset: 256.,
    factor: 4096. / 3504.,
    max: 4095,
};

impl Image {
    /// Remaps legal range samples to full range.
    ///
    /// Only `rgb24`, `rgb48le` and `gbrp12le` have a mapping, every other format
    /// reports [ImageError::UnsupportedFormat].
    pub fn video_range_to_full_range(&mut self) -> Result<()> {
        match self.pixel_format() {
            PixelFormat::Rgb24 => {
                map_samples::<u8>(self.plane_mut(0), false, |v| {
                    RGB24_EXPANSION.apply(v as i32) as u8
                });
            }
            PixelFormat::Rgb48le => {
                map_samples::<u16>(self.plane_mut(0), false, |v| {
                    RGB48_EXPANSION.apply(v as i32) as u16
                });
            }
            PixelFormat::Gbrp12le => {
                for plane in self.planes_mut() {
                    map_samples::<u16>(plane, false, |v| GBRP12_EXPANSION.apply(v as i32) as u16);
                }
            }
            format => {
                return Err(ImageError::UnsupportedFormat {
                    operation: "video_range_to_full_range",
                    format,
                })
            }
        }
        Ok(())
    }
}

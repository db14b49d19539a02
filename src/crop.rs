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
use crate::numerics::round_down_pow2;
use crate::Size;
use log::debug;

/// Pixels removed from each edge of an image
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Crop {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl Crop {
    pub const fn new(left: usize, right: usize, top: usize, bottom: usize) -> Crop {
        Crop {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Size left of `size` after cropping, never negative
    pub fn apply(&self, size: Size) -> Size {
        Size::new(
            size.width.saturating_sub(self.left.saturating_add(self.right)),
            size.height.saturating_sub(self.top.saturating_add(self.bottom)),
        )
    }

    /// Rounds every edge down so no subsampled chroma sample is split
    pub fn round_for_subsampling(&self, descriptor: &FormatDescriptor) -> Crop {
        let rounded = Crop::new(
            round_down_pow2(self.left, descriptor.log2_chroma_w),
            round_down_pow2(self.right, descriptor.log2_chroma_w),
            round_down_pow2(self.top, descriptor.log2_chroma_h),
            round_down_pow2(self.bottom, descriptor.log2_chroma_h),
        );
        if rounded != *self {
            debug!("Crop {:?} corrected to {:?}", self, rounded);
        }
        rounded
    }

    /// Keeps at least `min_remaining` pixels of each dimension of `size`.
    ///
    /// A crop eating into the margin is replaced by `0` on the leading edge and
    /// `dimension - min_remaining` on the trailing one.
    pub fn clamp(&self, size: Size, min_remaining: usize) -> Crop {
        let mut clamped = *self;
        if clamped.left.saturating_add(clamped.right) >= size.width.saturating_sub(min_remaining) {
            clamped.left = 0;
            clamped.right = size.width.saturating_sub(min_remaining);
        }
        if clamped.top.saturating_add(clamped.bottom) >= size.height.saturating_sub(min_remaining) {
            clamped.top = 0;
            clamped.bottom = size.height.saturating_sub(min_remaining);
        }
        if clamped != *self {
            debug!(
                "Crop {:?} leaves less than {} pixels of {}x{}, clamped to {:?}",
                self, min_remaining, size.width, size.height, clamped
            );
        }
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelFormat;

    #[test]
    fn odd_crop_rounds_down_to_even_for_420() {
        let crop = Crop::new(5, 3, 7, 1).round_for_subsampling(PixelFormat::Yuv420p.descriptor());
        assert_eq!(crop, Crop::new(4, 2, 6, 0));
    }

    #[test]
    fn rounding_follows_each_axis() {
        let crop = Crop::new(5, 3, 7, 1);
        assert_eq!(crop.round_for_subsampling(PixelFormat::Yuv444p.descriptor()), crop);
        assert_eq!(
            crop.round_for_subsampling(PixelFormat::Yuv422p10le.descriptor()),
            Crop::new(4, 2, 7, 1)
        );
        assert_eq!(
            crop.round_for_subsampling(PixelFormat::Yuv411p.descriptor()),
            Crop::new(4, 0, 7, 1)
        );
    }

    #[test]
    fn apply_subtracts_edges() {
        let crop = Crop::new(10, 20, 1, 2);
        assert_eq!(crop.apply(Size::new(100, 50)), Size::new(70, 47));
        assert_eq!(crop.apply(Size::new(20, 2)), Size::new(0, 0));
    }

    #[test]
    fn clamp_keeps_margin() {
        let size = Size::new(100, 50);
        let crop = Crop::new(60, 40, 10, 10).clamp(size, 4);
        assert_eq!(crop, Crop::new(0, 96, 10, 10));
        assert_eq!(crop.apply(size), Size::new(4, 30));
        let crop = Crop::new(10, 10, 30, 16).clamp(size, 4);
        assert_eq!(crop, Crop::new(10, 10, 0, 46));
        let crop = Crop::new(10, 10, 10, 10).clamp(size, 4);
        assert_eq!(crop, Crop::new(10, 10, 10, 10));
    }

    #[test]
    fn huge_crop_saturates() {
        let size = Size::new(20, 10);
        let crop = Crop::new(usize::MAX, 1, 1, usize::MAX);
        assert_eq!(crop.apply(size), Size::new(0, 0));
        assert_eq!(crop.clamp(size, 4), Crop::new(0, 16, 0, 6));
    }

    #[test]
    fn clamp_margin_is_configurable() {
        let crop = Crop::new(40, 40, 0, 0).clamp(Size::new(100, 100), 32);
        assert_eq!(crop, Crop::new(0, 68, 0, 0));
        let crop = Crop::new(1, 1, 1, 1).clamp(Size::new(2, 2), 4);
        assert_eq!(crop, Crop::new(0, 0, 0, 0));
    }
}

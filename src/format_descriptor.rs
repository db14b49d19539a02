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
use crate::{PixelFormat, Size};

/// Colour model of the samples held by a format
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ColourFamily {
    Yuv,
    Rgb,
    Xyz,
}

/// Geometry of one plane
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PlaneDescriptor {
    /// log2 of the horizontal subsampling of this plane
    pub shift_w: u8,
    /// log2 of the vertical subsampling of this plane
    pub shift_h: u8,
    /// Bytes taken by one sample position of this plane
    pub step: u8,
}

/// Where a colour component lives and how it is stored.
///
/// Chroma components of YUV formats are addressed in subsampled coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ComponentDescriptor {
    pub plane: u8,
    /// Bytes between two consecutive samples of this component
    pub step: u8,
    /// Byte offset of the first sample in a row
    pub offset: u8,
    /// Storage size of a sample, 1 or 2 bytes
    pub container: u8,
    /// Bits to shift the stored word right to reach the value
    pub shift: u8,
    pub depth: u8,
}

/// Static description of a [PixelFormat].
///
/// Components are always in canonical order: Y, U, V, A for YUV formats,
/// R, G, B, A for RGB formats and X, Y, Z for XYZ.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FormatDescriptor {
    pub family: ColourFamily,
    plane_count: u8,
    plane_descriptors: [PlaneDescriptor; 4],
    component_count: u8,
    component_descriptors: [ComponentDescriptor; 4],
    pub log2_chroma_w: u8,
    pub log2_chroma_h: u8,
    pub big_endian: bool,
    /// JPEG range YUV, chroma is centred on `1 << (depth - 1)`
    pub full_range: bool,
    pub planar: bool,
}

const NO_PLANE: PlaneDescriptor = PlaneDescriptor {
    shift_w: 0,
    shift_h: 0,
    step: 0,
};

const NO_COMPONENT: ComponentDescriptor = ComponentDescriptor {
    plane: 0,
    step: 0,
    offset: 0,
    container: 0,
    shift: 0,
    depth: 0,
};

const fn component(plane: u8, step: u8, offset: u8, container: u8, depth: u8) -> ComponentDescriptor {
    ComponentDescriptor {
        plane,
        step,
        offset,
        container,
        shift: 0,
        depth,
    }
}

const fn yuv_planar(
    log2_w: u8,
    log2_h: u8,
    depth: u8,
    big_endian: bool,
    alpha: bool,
    full_range: bool,
) -> FormatDescriptor {
    let bytes = if depth > 8 { 2 } else { 1 };
    let luma = PlaneDescriptor {
        shift_w: 0,
        shift_h: 0,
        step: bytes,
    };
    let chroma = PlaneDescriptor {
        shift_w: log2_w,
        shift_h: log2_h,
        step: bytes,
    };
    FormatDescriptor {
        family: ColourFamily::Yuv,
        plane_count: if alpha { 4 } else { 3 },
        plane_descriptors: [luma, chroma, chroma, if alpha { luma } else { NO_PLANE }],
        component_count: if alpha { 4 } else { 3 },
        component_descriptors: [
            component(0, bytes, 0, bytes, depth),
            component(1, bytes, 0, bytes, depth),
            component(2, bytes, 0, bytes, depth),
            if alpha {
                component(3, bytes, 0, bytes, depth)
            } else {
                NO_COMPONENT
            },
        ],
        log2_chroma_w: log2_w,
        log2_chroma_h: log2_h,
        big_endian,
        full_range,
        planar: true,
    }
}

/// Packed RGB; `offsets` are byte offsets of R, G, B and optionally A inside one pixel
const fn packed(
    family: ColourFamily,
    step: u8,
    container: u8,
    offsets: [u8; 4],
    alpha: bool,
    depth: u8,
    shift: u8,
    big_endian: bool,
) -> FormatDescriptor {
    let mut components = [
        component(0, step, offsets[0], container, depth),
        component(0, step, offsets[1], container, depth),
        component(0, step, offsets[2], container, depth),
        if alpha {
            component(0, step, offsets[3], container, depth)
        } else {
            NO_COMPONENT
        },
    ];
    let mut i = 0;
    while i < 4 {
        components[i].shift = shift;
        i += 1;
    }
    FormatDescriptor {
        family,
        plane_count: 1,
        plane_descriptors: [
            PlaneDescriptor {
                shift_w: 0,
                shift_h: 0,
                step,
            },
            NO_PLANE,
            NO_PLANE,
            NO_PLANE,
        ],
        component_count: if alpha { 4 } else { 3 },
        component_descriptors: components,
        log2_chroma_w: 0,
        log2_chroma_h: 0,
        big_endian,
        full_range: false,
        planar: false,
    }
}

static YUV420P: FormatDescriptor = yuv_planar(1, 1, 8, false, false, false);
static YUV422P: FormatDescriptor = yuv_planar(1, 0, 8, false, false, false);
static YUV444P: FormatDescriptor = yuv_planar(0, 0, 8, false, false, false);
static YUV411P: FormatDescriptor = yuv_planar(2, 0, 8, false, false, false);
static YUVJ420P: FormatDescriptor = yuv_planar(1, 1, 8, false, false, true);
static YUVJ422P: FormatDescriptor = yuv_planar(1, 0, 8, false, false, true);
static YUVJ444P: FormatDescriptor = yuv_planar(0, 0, 8, false, false, true);
static YUV420P10LE: FormatDescriptor = yuv_planar(1, 1, 10, false, false, false);
static YUV420P16LE: FormatDescriptor = yuv_planar(1, 1, 16, false, false, false);
static YUV422P9LE: FormatDescriptor = yuv_planar(1, 0, 9, false, false, false);
static YUV422P9BE: FormatDescriptor = yuv_planar(1, 0, 9, true, false, false);
static YUV422P10LE: FormatDescriptor = yuv_planar(1, 0, 10, false, false, false);
static YUV422P10BE: FormatDescriptor = yuv_planar(1, 0, 10, true, false, false);
static YUV422P16LE: FormatDescriptor = yuv_planar(1, 0, 16, false, false, false);
static YUV444P9LE: FormatDescriptor = yuv_planar(0, 0, 9, false, false, false);
static YUV444P9BE: FormatDescriptor = yuv_planar(0, 0, 9, true, false, false);
static YUV444P10LE: FormatDescriptor = yuv_planar(0, 0, 10, false, false, false);
static YUV444P10BE: FormatDescriptor = yuv_planar(0, 0, 10, true, false, false);
static YUV444P16LE: FormatDescriptor = yuv_planar(0, 0, 16, false, false, false);
static YUVA420P9LE: FormatDescriptor = yuv_planar(1, 1, 9, false, true, false);
static YUVA420P9BE: FormatDescriptor = yuv_planar(1, 1, 9, true, true, false);
static YUVA420P10LE: FormatDescriptor = yuv_planar(1, 1, 10, false, true, false);
static YUVA420P10BE: FormatDescriptor = yuv_planar(1, 1, 10, true, true, false);
static YUVA420P16LE: FormatDescriptor = yuv_planar(1, 1, 16, false, true, false);
static YUVA420P16BE: FormatDescriptor = yuv_planar(1, 1, 16, true, true, false);
static YUVA422P9LE: FormatDescriptor = yuv_planar(1, 0, 9, false, true, false);
static YUVA422P9BE: FormatDescriptor = yuv_planar(1, 0, 9, true, true, false);
static YUVA422P10LE: FormatDescriptor = yuv_planar(1, 0, 10, false, true, false);
static YUVA422P10BE: FormatDescriptor = yuv_planar(1, 0, 10, true, true, false);
static YUVA422P16LE: FormatDescriptor = yuv_planar(1, 0, 16, false, true, false);
static YUVA422P16BE: FormatDescriptor = yuv_planar(1, 0, 16, true, true, false);
static YUVA444P9LE: FormatDescriptor = yuv_planar(0, 0, 9, false, true, false);
static YUVA444P9BE: FormatDescriptor = yuv_planar(0, 0, 9, true, true, false);
static YUVA444P10LE: FormatDescriptor = yuv_planar(0, 0, 10, false, true, false);
static YUVA444P10BE: FormatDescriptor = yuv_planar(0, 0, 10, true, true, false);
static YUVA444P16LE: FormatDescriptor = yuv_planar(0, 0, 16, false, true, false);
static YUVA444P16BE: FormatDescriptor = yuv_planar(0, 0, 16, true, true, false);

static UYVY422: FormatDescriptor = FormatDescriptor {
    family: ColourFamily::Yuv,
    plane_count: 1,
    plane_descriptors: [
        PlaneDescriptor {
            shift_w: 0,
            shift_h: 0,
            step: 2,
        },
        NO_PLANE,
        NO_PLANE,
        NO_PLANE,
    ],
    component_count: 3,
    component_descriptors: [
        component(0, 2, 1, 1, 8),
        component(0, 4, 0, 1, 8),
        component(0, 4, 2, 1, 8),
        NO_COMPONENT,
    ],
    log2_chroma_w: 1,
    log2_chroma_h: 0,
    big_endian: false,
    full_range: false,
    planar: false,
};

static RGB24: FormatDescriptor = packed(ColourFamily::Rgb, 3, 1, [0, 1, 2, 0], false, 8, 0, false);
static ARGB: FormatDescriptor = packed(ColourFamily::Rgb, 4, 1, [1, 2, 3, 0], true, 8, 0, false);
static RGBA: FormatDescriptor = packed(ColourFamily::Rgb, 4, 1, [0, 1, 2, 3], true, 8, 0, false);
static ABGR: FormatDescriptor = packed(ColourFamily::Rgb, 4, 1, [3, 2, 1, 0], true, 8, 0, false);
static BGRA: FormatDescriptor = packed(ColourFamily::Rgb, 4, 1, [2, 1, 0, 3], true, 8, 0, false);
static RGB48LE: FormatDescriptor =
    packed(ColourFamily::Rgb, 6, 2, [0, 2, 4, 0], false, 16, 0, false);
static RGB48BE: FormatDescriptor =
    packed(ColourFamily::Rgb, 6, 2, [0, 2, 4, 0], false, 16, 0, true);
static RGBA64BE: FormatDescriptor =
    packed(ColourFamily::Rgb, 8, 2, [0, 2, 4, 6], true, 16, 0, true);
static XYZ12LE: FormatDescriptor =
    packed(ColourFamily::Xyz, 6, 2, [0, 2, 4, 0], false, 12, 4, false);

static RGB555LE: FormatDescriptor = {
    let mut descriptor = packed(ColourFamily::Rgb, 2, 2, [0, 0, 0, 0], false, 5, 0, false);
    descriptor.component_descriptors[0].shift = 10;
    descriptor.component_descriptors[1].shift = 5;
    descriptor
};

static GBRP12LE: FormatDescriptor = {
    let plane = PlaneDescriptor {
        shift_w: 0,
        shift_h: 0,
        step: 2,
    };
    FormatDescriptor {
        family: ColourFamily::Rgb,
        plane_count: 3,
        plane_descriptors: [plane, plane, plane, NO_PLANE],
        component_count: 3,
        component_descriptors: [
            component(2, 2, 0, 2, 12),
            component(0, 2, 0, 2, 12),
            component(1, 2, 0, 2, 12),
            NO_COMPONENT,
        ],
        log2_chroma_w: 0,
        log2_chroma_h: 0,
        big_endian: false,
        full_range: false,
        planar: true,
    }
};

impl PixelFormat {
    /// Static layout description of this format
    pub fn descriptor(self) -> &'static FormatDescriptor {
        match self {
            PixelFormat::Yuv420p => &YUV420P,
            PixelFormat::Yuv422p => &YUV422P,
            PixelFormat::Yuv444p => &YUV444P,
            PixelFormat::Yuv411p => &YUV411P,
            PixelFormat::Yuvj420p => &YUVJ420P,
            PixelFormat::Yuvj422p => &YUVJ422P,
            PixelFormat::Yuvj444p => &YUVJ444P,
            PixelFormat::Yuv420p10le => &YUV420P10LE,
            PixelFormat::Yuv420p16le => &YUV420P16LE,
            PixelFormat::Yuv422p9le => &YUV422P9LE,
            PixelFormat::Yuv422p9be => &YUV422P9BE,
            PixelFormat::Yuv422p10le => &YUV422P10LE,
            PixelFormat::Yuv422p10be => &YUV422P10BE,
            PixelFormat::Yuv422p16le => &YUV422P16LE,
            PixelFormat::Yuv444p9le => &YUV444P9LE,
            PixelFormat::Yuv444p9be => &YUV444P9BE,
            PixelFormat::Yuv444p10le => &YUV444P10LE,
            PixelFormat::Yuv444p10be => &YUV444P10BE,
            PixelFormat::Yuv444p16le => &YUV444P16LE,
            PixelFormat::Yuva420p9le => &YUVA420P9LE,
            PixelFormat::Yuva420p9be => &YUVA420P9BE,
            PixelFormat::Yuva420p10le => &YUVA420P10LE,
            PixelFormat::Yuva420p10be => &YUVA420P10BE,
            PixelFormat::Yuva420p16le => &YUVA420P16LE,
            PixelFormat::Yuva420p16be => &YUVA420P16BE,
            PixelFormat::Yuva422p9le => &YUVA422P9LE,
            PixelFormat::Yuva422p9be => &YUVA422P9BE,
            PixelFormat::Yuva422p10le => &YUVA422P10LE,
            PixelFormat::Yuva422p10be => &YUVA422P10BE,
            PixelFormat::Yuva422p16le => &YUVA422P16LE,
            PixelFormat::Yuva422p16be => &YUVA422P16BE,
            PixelFormat::Yuva444p9le => &YUVA444P9LE,
            PixelFormat::Yuva444p9be => &YUVA444P9BE,
            PixelFormat::Yuva444p10le => &YUVA444P10LE,
            PixelFormat::Yuva444p10be => &YUVA444P10BE,
            PixelFormat::Yuva444p16le => &YUVA444P16LE,
            PixelFormat::Yuva444p16be => &YUVA444P16BE,
            PixelFormat::Uyvy422 => &UYVY422,
            PixelFormat::Rgb24 => &RGB24,
            PixelFormat::Argb => &ARGB,
            PixelFormat::Rgba => &RGBA,
            PixelFormat::Abgr => &ABGR,
            PixelFormat::Bgra => &BGRA,
            PixelFormat::Rgb555le => &RGB555LE,
            PixelFormat::Rgb48le => &RGB48LE,
            PixelFormat::Rgb48be => &RGB48BE,
            PixelFormat::Rgba64be => &RGBA64BE,
            PixelFormat::Gbrp12le => &GBRP12LE,
            PixelFormat::Xyz12le => &XYZ12LE,
        }
    }
}

impl FormatDescriptor {
    #[inline]
    pub fn planes(&self) -> usize {
        self.plane_count as usize
    }

    #[inline]
    pub fn plane(&self, plane: usize) -> PlaneDescriptor {
        self.plane_descriptors[..self.planes()][plane]
    }

    #[inline]
    pub fn components(&self) -> &[ComponentDescriptor] {
        &self.component_descriptors[..self.component_count as usize]
    }

    #[inline]
    pub fn horizontal_factor(&self, plane: usize) -> usize {
        1 << self.plane(plane).shift_w
    }

    #[inline]
    pub fn vertical_factor(&self, plane: usize) -> usize {
        1 << self.plane(plane).shift_h
    }

    /// Addressable samples of `plane` for an image of `size`, rounding partial chroma up
    #[inline]
    pub fn sample_size(&self, plane: usize, size: Size) -> Size {
        let descriptor = self.plane(plane);
        Size::new(
            subsampled(size.width, descriptor.shift_w),
            subsampled(size.height, descriptor.shift_h),
        )
    }

    /// Bytes of sample data in one row of `plane` for an image `width` pixels wide
    #[inline]
    pub fn line_size(&self, plane: usize, width: usize) -> usize {
        let descriptor = self.plane(plane);
        subsampled(width, descriptor.shift_w) * descriptor.step as usize
    }

    /// Bytes per image pixel in `plane`, fractional for subsampled chroma.
    ///
    /// Returns 0 for planes the format does not have.
    pub fn bytes_per_pixel(&self, plane: usize) -> f32 {
        if plane >= self.planes() {
            return 0.;
        }
        let descriptor = self.plane(plane);
        descriptor.step as f32 / (1 << descriptor.shift_w) as f32
    }

    /// Bit depth of the first component
    #[inline]
    pub fn depth(&self) -> u8 {
        self.component_descriptors[0].depth
    }

    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.component_count == 4
    }

    #[inline]
    pub fn is_rgb(&self) -> bool {
        self.family == ColourFamily::Rgb
    }

    #[inline]
    pub fn is_yuv(&self) -> bool {
        self.family == ColourFamily::Yuv
    }

    /// Whether component `index` is addressed in subsampled coordinates
    #[inline]
    pub fn is_chroma_component(&self, index: usize) -> bool {
        self.family == ColourFamily::Yuv && (index == 1 || index == 2)
    }

    /// Chroma value that represents no colour, native endian
    pub fn chroma_neutral(&self) -> u16 {
        let depth = self.depth() as u32;
        let centre = 1u32 << (depth - 1);
        if self.full_range {
            centre as u16
        } else {
            (centre - 1) as u16
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_counts() {
        assert_eq!(PixelFormat::Rgb24.descriptor().planes(), 1);
        assert_eq!(PixelFormat::Rgba.descriptor().planes(), 1);
        assert_eq!(PixelFormat::Uyvy422.descriptor().planes(), 1);
        assert_eq!(PixelFormat::Yuv420p.descriptor().planes(), 3);
        assert_eq!(PixelFormat::Gbrp12le.descriptor().planes(), 3);
        assert_eq!(PixelFormat::Yuva444p10le.descriptor().planes(), 4);
    }

    #[test]
    fn bytes_per_pixel_matches_layout() {
        let cases: [(PixelFormat, [f32; 3]); 12] = [
            (PixelFormat::Rgb24, [3., 0., 0.]),
            (PixelFormat::Rgba, [4., 0., 0.]),
            (PixelFormat::Yuv420p, [1., 0.5, 0.5]),
            (PixelFormat::Yuv422p, [1., 0.5, 0.5]),
            (PixelFormat::Yuv422p10le, [2., 1., 1.]),
            (PixelFormat::Yuv422p16le, [2., 1., 1.]),
            (PixelFormat::Uyvy422, [2., 0., 0.]),
            (PixelFormat::Yuv444p, [1., 1., 1.]),
            (PixelFormat::Yuv444p9be, [2., 2., 2.]),
            (PixelFormat::Yuv444p9le, [2., 2., 2.]),
            (PixelFormat::Yuv444p10be, [2., 2., 2.]),
            (PixelFormat::Yuv444p10le, [2., 2., 2.]),
        ];
        for (format, bpp) in cases {
            let descriptor = format.descriptor();
            for (plane, expected) in bpp.iter().enumerate() {
                assert_eq!(
                    descriptor.bytes_per_pixel(plane),
                    *expected,
                    "{} plane {}",
                    format,
                    plane
                );
            }
        }
    }

    #[test]
    fn subsampling_shifts() {
        let yuv420 = PixelFormat::Yuv420p.descriptor();
        assert_eq!((yuv420.log2_chroma_w, yuv420.log2_chroma_h), (1, 1));
        assert_eq!(yuv420.vertical_factor(0), 1);
        assert_eq!(yuv420.vertical_factor(1), 2);
        let yuv411 = PixelFormat::Yuv411p.descriptor();
        assert_eq!(yuv411.horizontal_factor(2), 4);
        let alpha = PixelFormat::Yuva420p10le.descriptor();
        assert_eq!(alpha.horizontal_factor(3), 1);
        assert_eq!(alpha.vertical_factor(3), 1);
    }

    #[test]
    fn neutral_chroma_per_depth() {
        assert_eq!(PixelFormat::Yuv420p.descriptor().chroma_neutral(), 127);
        assert_eq!(PixelFormat::Yuvj420p.descriptor().chroma_neutral(), 128);
        assert_eq!(PixelFormat::Yuv422p9le.descriptor().chroma_neutral(), 255);
        assert_eq!(PixelFormat::Yuv422p10be.descriptor().chroma_neutral(), 511);
        assert_eq!(PixelFormat::Yuv444p16le.descriptor().chroma_neutral(), 32767);
    }

    #[test]
    fn every_format_has_consistent_components() {
        for &format in PixelFormat::ALL {
            let descriptor = format.descriptor();
            assert!(descriptor.planes() >= 1 && descriptor.planes() <= 4);
            for component in descriptor.components() {
                assert!((component.plane as usize) < descriptor.planes(), "{}", format);
                assert!(component.container == 1 || component.container == 2);
                assert!(component.depth as u32 + component.shift as u32 <= 8 * component.container as u32);
            }
        }
    }
}

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

/// `R = y·Y + cr·Cr`, `G = y·Y − g1·Cr − g2·Cb`, `B = y·Y + cb·Cb` with Cb, Cr centred on zero
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct CbCrInverseTransform<T> {
    pub y_coef: T,
    pub cr_coef: T,
    pub cb_coef: T,
    pub g_coeff_1: T,
    pub g_coeff_2: T,
}

/// Transformation YUV to RGB with coefficients as specified in [ITU-R](https://www.itu.int/rec/T-REC-H.273/en)
///
/// `range_rgba` is the RGB peak the result is expressed in, 1.0 gives normalized RGB.
pub fn get_inverse_transform(
    range_rgba: f32,
    range_y: f32,
    range_uv: f32,
    kr: f32,
    kb: f32,
) -> CbCrInverseTransform<f32> {
    let range_uv = range_rgba / range_uv;
    let y_coef = range_rgba / range_y;
    let cr_coeff = (2f32 * (1f32 - kr)) * range_uv;
    let cb_coeff = (2f32 * (1f32 - kb)) * range_uv;
    let kg = 1.0f32 - kr - kb;
    let g_coeff_1 = (2f32 * ((1f32 - kr) * kr / kg)) * range_uv;
    let g_coeff_2 = (2f32 * ((1f32 - kb) * kb / kg)) * range_uv;
    CbCrInverseTransform {
        y_coef,
        cr_coef: cr_coeff,
        cb_coef: cb_coeff,
        g_coeff_1,
        g_coeff_2,
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct CbCrForwardTransform<T> {
    pub yr: T,
    pub yg: T,
    pub yb: T,
    pub cb_r: T,
    pub cb_g: T,
    pub cb_b: T,
    pub cr_r: T,
    pub cr_g: T,
    pub cr_b: T,
}

/// Transformation RGB to YUV with coefficients as specified in [ITU-R](https://www.itu.int/rec/T-REC-H.273/en)
pub fn get_forward_transform(
    range_rgba: f32,
    range_y: f32,
    range_uv: f32,
    kr: f32,
    kb: f32,
) -> CbCrForwardTransform<f32> {
    let kg = 1.0f32 - kr - kb;

    let yr = kr * range_y / range_rgba;
    let yg = kg * range_y / range_rgba;
    let yb = kb * range_y / range_rgba;

    let cb_r = -0.5f32 * kr / (1f32 - kb) * range_uv / range_rgba;
    let cb_g = -0.5f32 * kg / (1f32 - kb) * range_uv / range_rgba;
    let cb_b = 0.5f32 * range_uv / range_rgba;

    let cr_r = 0.5f32 * range_uv / range_rgba;
    let cr_g = -0.5f32 * kg / (1f32 - kr) * range_uv / range_rgba;
    let cr_b = -0.5f32 * kb / (1f32 - kr) * range_uv / range_rgba;
    CbCrForwardTransform {
        yr,
        yg,
        yb,
        cb_r,
        cb_g,
        cb_b,
        cr_r,
        cr_g,
        cr_b,
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
/// Declares sample range: video (legal, limited) or full
pub enum VideoRange {
    /// Limited range Y ∈ [16 << (depth - 8), 235 << (depth - 8)], UV ∈ [16 << (depth - 8), 240 << (depth - 8)]
    #[default]
    Video,
    /// Full range, every code value from 0 to 2^bit_depth - 1 carries picture
    Full,
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct YuvChromaRange {
    pub bias_y: u32,
    pub bias_uv: u32,
    pub range_y: u32,
    pub range_uv: u32,
}

pub const fn get_yuv_range(depth: u32, range: VideoRange) -> YuvChromaRange {
    match range {
        VideoRange::Video => YuvChromaRange {
            bias_y: 16 << (depth - 8),
            bias_uv: 1 << (depth - 1),
            range_y: 219 << (depth - 8),
            range_uv: 224 << (depth - 8),
        },
        VideoRange::Full => YuvChromaRange {
            bias_y: 0,
            bias_uv: 1 << (depth - 1),
            range_uv: (1 << depth) - 1,
            range_y: (1 << depth) - 1,
        },
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
/// Declares matrix used between YUV and RGB, check [ITU-R](https://www.itu.int/rec/T-REC-H.273/en) for more info
pub enum YuvToRgb {
    Rec601,
    #[default]
    Rec709,
    Rec2020,
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct YuvBias {
    pub kr: f32,
    pub kb: f32,
}

impl YuvToRgb {
    pub const fn get_kr_kb(self) -> YuvBias {
        match self {
            YuvToRgb::Rec601 => YuvBias {
                kr: 0.299f32,
                kb: 0.114f32,
            },
            YuvToRgb::Rec709 => YuvBias {
                kr: 0.2126f32,
                kb: 0.0722f32,
            },
            YuvToRgb::Rec2020 => YuvBias {
                kr: 0.2627f32,
                kb: 0.0593f32,
            },
        }
    }
}

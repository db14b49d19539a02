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
use crate::yuv_support::{
    get_forward_transform, get_inverse_transform, get_yuv_range, VideoRange, YuvToRgb,
};
use linear_srgb::default::{linear_to_srgb, srgb_to_linear};

type Pixel = [f32; 4];

/// sRGB (D65) linear RGB to CIE XYZ
const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// DCI companding, 48 cd/m² peak over 52.37
const DCI_COMPANDING: f32 = 48. / 52.37;

const DCI_GAMMA: f32 = 2.6;

#[inline(always)]
fn mul3(m: &[[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Linear sRGB to companded linear XYZ clamped to [0, 1]
#[inline]
pub(crate) fn linear_rgb_to_dci_xyz(rgb: [f32; 3]) -> [f32; 3] {
    mul3(&SRGB_TO_XYZ, rgb).map(|v| (v * DCI_COMPANDING).clamp(0., 1.))
}

/// Encodes companded linear XYZ with the DCI 1/2.6 gamma
#[inline]
pub(crate) fn dci_gamma_encode(v: f32) -> f32 {
    v.powf(1. / DCI_GAMMA)
}

/// Gamma encoded sRGB to gamma encoded DCI XYZ
pub(crate) fn rgb_to_xyz(pixels: &mut [Pixel]) {
    for pixel in pixels.iter_mut() {
        let linear = [
            srgb_to_linear(pixel[0]),
            srgb_to_linear(pixel[1]),
            srgb_to_linear(pixel[2]),
        ];
        let xyz = linear_rgb_to_dci_xyz(linear);
        pixel[0] = dci_gamma_encode(xyz[0]);
        pixel[1] = dci_gamma_encode(xyz[1]);
        pixel[2] = dci_gamma_encode(xyz[2]);
    }
}

/// Gamma encoded DCI XYZ to gamma encoded sRGB, out of gamut values are clipped
pub(crate) fn xyz_to_rgb(pixels: &mut [Pixel]) {
    for pixel in pixels.iter_mut() {
        let xyz = [
            pixel[0].max(0.).powf(DCI_GAMMA) / DCI_COMPANDING,
            pixel[1].max(0.).powf(DCI_GAMMA) / DCI_COMPANDING,
            pixel[2].max(0.).powf(DCI_GAMMA) / DCI_COMPANDING,
        ];
        let rgb = mul3(&XYZ_TO_SRGB, xyz);
        pixel[0] = linear_to_srgb(rgb[0].clamp(0., 1.));
        pixel[1] = linear_to_srgb(rgb[1].clamp(0., 1.));
        pixel[2] = linear_to_srgb(rgb[2].clamp(0., 1.));
    }
}

/// Normalized YUV samples of `depth` bits in `range` to normalized RGB
pub(crate) fn yuv_to_rgb(pixels: &mut [Pixel], depth: u8, range: VideoRange, matrix: YuvToRgb) {
    let chroma_range = get_yuv_range(depth as u32, range);
    let bias = matrix.get_kr_kb();
    let transform = get_inverse_transform(
        1.,
        chroma_range.range_y as f32,
        chroma_range.range_uv as f32,
        bias.kr,
        bias.kb,
    );
    let max = ((1u32 << depth) - 1) as f32;
    let bias_y = chroma_range.bias_y as f32;
    let bias_uv = chroma_range.bias_uv as f32;
    for pixel in pixels.iter_mut() {
        let y = (pixel[0] * max - bias_y) * transform.y_coef;
        let cb = pixel[1] * max - bias_uv;
        let cr = pixel[2] * max - bias_uv;
        pixel[0] = (y + transform.cr_coef * cr).clamp(0., 1.);
        pixel[1] = (y - transform.g_coeff_1 * cr - transform.g_coeff_2 * cb).clamp(0., 1.);
        pixel[2] = (y + transform.cb_coef * cb).clamp(0., 1.);
    }
}

/// Normalized RGB to normalized YUV samples of `depth` bits in `range`
pub(crate) fn rgb_to_yuv(pixels: &mut [Pixel], depth: u8, range: VideoRange, matrix: YuvToRgb) {
    let chroma_range = get_yuv_range(depth as u32, range);
    let bias = matrix.get_kr_kb();
    let transform = get_forward_transform(
        1.,
        chroma_range.range_y as f32,
        chroma_range.range_uv as f32,
        bias.kr,
        bias.kb,
    );
    let max = ((1u32 << depth) - 1) as f32;
    let bias_y = chroma_range.bias_y as f32;
    let bias_uv = chroma_range.bias_uv as f32;
    for pixel in pixels.iter_mut() {
        let (r, g, b) = (pixel[0], pixel[1], pixel[2]);
        let y = transform.yr * r + transform.yg * g + transform.yb * b + bias_y;
        let cb = transform.cb_r * r + transform.cb_g * g + transform.cb_b * b + bias_uv;
        let cr = transform.cr_r * r + transform.cr_g * g + transform.cr_b * b + bias_uv;
        pixel[0] = (y / max).clamp(0., 1.);
        pixel[1] = (cb / max).clamp(0., 1.);
        pixel[2] = (cr / max).clamp(0., 1.);
    }
}

/// Re-expresses normalized YUV samples between bit depths and ranges
pub(crate) fn rescale_yuv(
    pixels: &mut [Pixel],
    from: (u8, VideoRange),
    to: (u8, VideoRange),
) {
    if from == to {
        return;
    }
    let src = get_yuv_range(from.0 as u32, from.1);
    let dst = get_yuv_range(to.0 as u32, to.1);
    let src_max = ((1u32 << from.0) - 1) as f32;
    let dst_max = ((1u32 << to.0) - 1) as f32;
    let luma_scale = dst.range_y as f32 / src.range_y as f32;
    let chroma_scale = dst.range_uv as f32 / src.range_uv as f32;
    for pixel in pixels.iter_mut() {
        let y = (pixel[0] * src_max - src.bias_y as f32) * luma_scale + dst.bias_y as f32;
        let cb = (pixel[1] * src_max - src.bias_uv as f32) * chroma_scale + dst.bias_uv as f32;
        let cr = (pixel[2] * src_max - src.bias_uv as f32) * chroma_scale + dst.bias_uv as f32;
        pixel[0] = (y / dst_max).clamp(0., 1.);
        pixel[1] = (cb / dst_max).clamp(0., 1.);
        pixel[2] = (cr / dst_max).clamp(0., 1.);
    }
}

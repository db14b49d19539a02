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
use crate::format_descriptor::{ComponentDescriptor, FormatDescriptor};
use crate::numerics::subsampled;
use crate::plane::Plane;
use crate::{Image, Size};
use num_traits::AsPrimitive;
use std::fmt::Debug;

/// Storage type of a sample inside a plane row
pub(crate) trait SampleStore:
    Copy + Debug + Default + AsPrimitive<i32> + AsPrimitive<f32> + 'static
{
    const BYTES: usize;

    fn load(bytes: &[u8], big_endian: bool) -> Self;

    fn store(self, bytes: &mut [u8], big_endian: bool);
}

impl SampleStore for u8 {
    const BYTES: usize = 1;

    #[inline(always)]
    fn load(bytes: &[u8], _: bool) -> Self {
        bytes[0]
    }

    #[inline(always)]
    fn store(self, bytes: &mut [u8], _: bool) {
        bytes[0] = self;
    }
}

impl SampleStore for u16 {
    const BYTES: usize = 2;

    #[inline(always)]
    fn load(bytes: &[u8], big_endian: bool) -> Self {
        let pair = [bytes[0], bytes[1]];
        if big_endian {
            u16::from_be_bytes(pair)
        } else {
            u16::from_le_bytes(pair)
        }
    }

    #[inline(always)]
    fn store(self, bytes: &mut [u8], big_endian: bool) {
        let pair = if big_endian {
            self.to_be_bytes()
        } else {
            self.to_le_bytes()
        };
        bytes[..2].copy_from_slice(&pair);
    }
}

/// Rewrites every valid sample of `plane` through `f`
pub(crate) fn map_samples<T: SampleStore>(
    plane: &mut Plane,
    big_endian: bool,
    f: impl Fn(T) -> T,
) {
    for row in plane.rows_mut() {
        map_row(row, big_endian, &f);
    }
}

#[inline]
fn map_row<T: SampleStore>(row: &mut [u8], big_endian: bool, f: impl Fn(T) -> T) {
    for sample in row.chunks_exact_mut(T::BYTES) {
        f(T::load(sample, big_endian)).store(sample, big_endian);
    }
}

/// Writes `value` into every sample of `row`
#[inline]
pub(crate) fn fill_row<T: SampleStore>(row: &mut [u8], big_endian: bool, value: T) {
    for sample in row.chunks_exact_mut(T::BYTES) {
        value.store(sample, big_endian);
    }
}

#[inline]
fn read_component(span: &[u8], x: usize, component: &ComponentDescriptor, big_endian: bool) -> u32 {
    let at = x * component.step as usize + component.offset as usize;
    let word: u32 = if component.container == 1 {
        span[at] as u32
    } else {
        u16::load(&span[at..], big_endian) as u32
    };
    (word >> component.shift) & ((1u32 << component.depth) - 1)
}

/// Bits of the container of component `index` owned by other components, as in `rgb555le`
fn foreign_bits(descriptor: &FormatDescriptor, index: usize) -> u32 {
    let own = descriptor.components()[index];
    descriptor
        .components()
        .iter()
        .enumerate()
        .filter(|(i, other)| *i != index && other.plane == own.plane && other.offset == own.offset)
        .fold(0u32, |acc, (_, other)| {
            acc | (((1u32 << other.depth) - 1) << other.shift)
        })
}

#[inline]
fn write_component(
    span: &mut [u8],
    x: usize,
    component: &ComponentDescriptor,
    big_endian: bool,
    keep: u32,
    value: u32,
) {
    let at = x * component.step as usize + component.offset as usize;
    let bits = (value << component.shift) & (((1u32 << component.depth) - 1) << component.shift);
    if component.container == 1 {
        let old = if keep != 0 { span[at] as u32 & keep } else { 0 };
        span[at] = (old | bits) as u8;
    } else {
        let old = if keep != 0 {
            u16::load(&span[at..], big_endian) as u32 & keep
        } else {
            0
        };
        ((old | bits) as u16).store(&mut span[at..], big_endian);
    }
}

/// Sets component `index` of every row of its plane to `value` for sample columns `x0..x1`
pub(crate) fn fill_component_columns(image: &mut Image, index: usize, x0: usize, x1: usize, value: u32) {
    let descriptor = image.descriptor();
    let component = descriptor.components()[index];
    let keep = foreign_bits(descriptor, index);
    let plane = image.plane_mut(component.plane as usize);
    for y in 0..plane.lines() {
        let span = plane.span_mut(y);
        for x in x0..x1 {
            write_component(span, x, &component, descriptor.big_endian, keep, value);
        }
    }
}

#[inline]
fn quantize(value: f32, max: f32) -> u32 {
    (value * max).round().clamp(0., max) as u32
}

/// Reads a `size` window at (`origin_x`, `origin_y`) of `image` into normalized 4 channel pixels.
///
/// Channels follow the descriptor's canonical component order; subsampled chroma is
/// repeated over its footprint, missing alpha reads as 1.
pub(crate) fn unpack(image: &Image, origin_x: usize, origin_y: usize, size: Size) -> Vec<[f32; 4]> {
    let descriptor = image.descriptor();
    let mut pixels = vec![[0f32, 0f32, 0f32, 1f32]; size.width * size.height];
    if size.width == 0 {
        return pixels;
    }
    for (index, component) in descriptor.components().iter().enumerate() {
        let (shift_w, shift_h) = if descriptor.is_chroma_component(index) {
            (descriptor.log2_chroma_w, descriptor.log2_chroma_h)
        } else {
            (0, 0)
        };
        let max = ((1u32 << component.depth) - 1) as f32;
        let plane = image.plane(component.plane as usize);
        for (y, row) in pixels.chunks_exact_mut(size.width).enumerate() {
            let span = plane.span((origin_y + y) >> shift_h);
            for (x, pixel) in row.iter_mut().enumerate() {
                let value = read_component(span, (origin_x + x) >> shift_w, component, descriptor.big_endian);
                pixel[index] = value as f32 / max;
            }
        }
    }
    pixels
}

/// Writes normalized pixels into a `size` window of `image` at (`origin_x`, `origin_y`).
///
/// Origin must sit on the chroma grid of the target; subsampled chroma is the mean
/// of the pixels of its footprint that fall inside the window.
pub(crate) fn pack(
    pixels: &[[f32; 4]],
    image: &mut Image,
    origin_x: usize,
    origin_y: usize,
    size: Size,
) {
    let descriptor = image.descriptor();
    debug_assert_eq!(pixels.len(), size.width * size.height);
    debug_assert_eq!(origin_x & ((1 << descriptor.log2_chroma_w) - 1), 0);
    debug_assert_eq!(origin_y & ((1 << descriptor.log2_chroma_h) - 1), 0);
    if size.width == 0 || size.height == 0 {
        return;
    }
    for (index, component) in descriptor.components().iter().enumerate() {
        let max = ((1u32 << component.depth) - 1) as f32;
        let keep = foreign_bits(descriptor, index);
        let plane = image.plane_mut(component.plane as usize);
        if !descriptor.is_chroma_component(index) {
            for (y, row) in pixels.chunks_exact(size.width).enumerate() {
                let span = plane.span_mut(origin_y + y);
                for (x, pixel) in row.iter().enumerate() {
                    write_component(
                        span,
                        origin_x + x,
                        component,
                        descriptor.big_endian,
                        keep,
                        quantize(pixel[index], max),
                    );
                }
            }
            continue;
        }
        let shift_w = descriptor.log2_chroma_w;
        let shift_h = descriptor.log2_chroma_h;
        let chroma_width = subsampled(size.width, shift_w);
        let chroma_height = subsampled(size.height, shift_h);
        for cy in 0..chroma_height {
            let y0 = cy << shift_h;
            let y1 = ((cy + 1) << shift_h).min(size.height);
            let span = plane.span_mut((origin_y >> shift_h) + cy);
            for cx in 0..chroma_width {
                let x0 = cx << shift_w;
                let x1 = ((cx + 1) << shift_w).min(size.width);
                let mut sum = 0f32;
                for row in pixels[y0 * size.width..y1 * size.width].chunks_exact(size.width) {
                    sum += row[x0..x1].iter().map(|pixel| pixel[index]).sum::<f32>();
                }
                let mean = sum / ((x1 - x0) * (y1 - y0)) as f32;
                write_component(
                    span,
                    (origin_x >> shift_w) + cx,
                    component,
                    descriptor.big_endian,
                    keep,
                    quantize(mean, max),
                );
            }
        }
    }
}

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
#![deny(unreachable_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! Planar pixel buffers for video frames.
//!
//! [Image] owns aligned planes in one of the [PixelFormat]s and implements crop, scale
//! and pad into a window ([Image::crop_scale_window]), alpha compositing of RGBA overlays
//! ([Image::alpha_blend], [merge]), black, transparent and fade fills, and legal to full
//! range expansion.
mod alpha_blend;
mod colour;
mod crop;
mod fill;
mod format_descriptor;
mod frame;
mod geometry;
mod image;
mod image_error;
mod merge;
mod numerics;
mod pixel_format;
mod plane;
mod range;
mod resample;
mod resize;
mod sample_io;
mod scale;
mod yuv_support;

pub use crop::Crop;

pub use format_descriptor::ColourFamily;
pub use format_descriptor::ComponentDescriptor;
pub use format_descriptor::FormatDescriptor;
pub use format_descriptor::PlaneDescriptor;
pub use pixel_format::PixelFormat;

pub use frame::FramePlane;
pub use frame::ImageFrame;
pub use image::Alignment;
pub use image::Image;
pub use plane::ALIGNMENT;

pub use geometry::Position;
pub use geometry::Rect;
pub use geometry::Size;

pub use image_error::ImageError;
pub use image_error::MismatchedSize;
pub use image_error::Result;

pub use merge::merge;
pub use merge::PositionImage;

pub use resample::ResampleParams;
pub use resample::ResampleQuality;
pub use resample::Resampler;
pub use resample::SoftwareResampler;
pub use resample::SourceRegion;
pub use resample::TargetRegion;
pub use scale::ScaleWindow;
pub use scale::DEFAULT_MIN_REMAINING;

pub use yuv_support::VideoRange;
pub use yuv_support::YuvToRgb;

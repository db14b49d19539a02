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
use crate::PixelFormat;

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct MismatchedSize {
    pub expected: usize,
    pub received: usize,
}

/// Error type for every fallible image operation
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ImageError {
    /// Operation has no implementation for this pixel format
    #[error("Pixel format {format} is not supported by {operation}")]
    UnsupportedFormat {
        operation: &'static str,
        format: PixelFormat,
    },
    /// Pixel format name is outside of the supported set
    #[error("Unknown pixel format {0:?}")]
    UnknownPixelFormat(String),
    #[error("Out of memory")]
    OutOfMemory,
    #[error("Image size overflow pointer capabilities")]
    PointerOverflow,
    #[error("Zero sized images is not supported")]
    ZeroBaseSize,
    #[error(
        "Plane have invalid size, it must be at least {}, but it was {}",
        .0.expected,
        .0.received
    )]
    PlaneSizeMismatch(MismatchedSize),
    #[error(
        "Plane stride must be at least {}, but it was {}",
        .0.expected,
        .0.received
    )]
    PlaneStrideMismatch(MismatchedSize),
    #[error("Frame must have {} planes, but it has {}", .0.expected, .0.received)]
    PlaneCountMismatch(MismatchedSize),
    /// Convolution backend rejected the images
    #[error("Resize failed: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ImageError> = std::result::Result<T, E>;

#[inline]
pub(crate) fn check_overflow_v2(v0: usize, v1: usize) -> Result<usize> {
    v0.checked_mul(v1).ok_or(ImageError::PointerOverflow)
}

#[inline]
pub(crate) fn check_overflow_v3(v0: usize, v1: usize, v2: usize) -> Result<usize> {
    check_overflow_v2(v0, v1)?
        .checked_add(v2)
        .ok_or(ImageError::PointerOverflow)
}

/// Checks that a borrowed plane holds `lines` rows of `line_size` bytes at `stride`
#[inline]
pub(crate) fn check_plane(
    data: &[u8],
    stride: usize,
    line_size: usize,
    lines: usize,
) -> Result<()> {
    if stride < line_size {
        return Err(ImageError::PlaneStrideMismatch(MismatchedSize {
            expected: line_size,
            received: stride,
        }));
    }
    if lines == 0 {
        return Ok(());
    }
    let required = check_overflow_v3(stride, lines - 1, line_size)?;
    if data.len() < required {
        return Err(ImageError::PlaneSizeMismatch(MismatchedSize {
            expected: required,
            received: data.len(),
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_plane_accepts_short_last_row() {
        let data = vec![0u8; 64 * 3 + 10];
        assert!(check_plane(&data, 64, 10, 4).is_ok());
    }

    #[test]
    fn check_plane_rejects_small_stride() {
        let data = vec![0u8; 100];
        match check_plane(&data, 8, 10, 2) {
            Err(ImageError::PlaneStrideMismatch(size)) => {
                assert_eq!(size.expected, 10);
                assert_eq!(size.received, 8);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn check_plane_rejects_truncated_data() {
        let data = vec![0u8; 20];
        assert!(matches!(
            check_plane(&data, 16, 16, 2),
            Err(ImageError::PlaneSizeMismatch(_))
        ));
    }

    #[test]
    fn unsupported_format_message_names_operation() {
        let error = ImageError::UnsupportedFormat {
            operation: "fade",
            format: PixelFormat::Uyvy422,
        };
        assert_eq!(
            error.to_string(),
            "Pixel format uyvy422 is not supported by fade"
        );
    }
}

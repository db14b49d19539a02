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
#![forbid(unsafe_code)]
use crate::image_error::{check_overflow_v3, ImageError, Result};

/// Alignment boundary of plane starts and padded strides, in bytes
pub const ALIGNMENT: usize = 64;

/// Owned memory of one plane.
///
/// The arena is larger than `stride * lines`: one extra row plus [ALIGNMENT] bytes
/// stay addressable past the last line so that wide row readers never leave the
/// allocation. Public accessors only expose the valid rows.
#[derive(Debug)]
pub(crate) struct Plane {
    arena: Vec<u8>,
    start: usize,
    line_size: usize,
    stride: usize,
    lines: usize,
}

impl Plane {
    /// Allocates a zeroed plane, reporting allocation failure instead of aborting
    pub(crate) fn try_alloc(line_size: usize, stride: usize, lines: usize) -> Result<Plane> {
        debug_assert!(stride >= line_size);
        let payload = check_overflow_v3(stride, lines + 1, ALIGNMENT)?;
        let total = payload
            .checked_add(ALIGNMENT)
            .ok_or(ImageError::PointerOverflow)?;
        let mut arena = Vec::new();
        arena
            .try_reserve_exact(total)
            .map_err(|_| ImageError::OutOfMemory)?;
        arena.resize(total, 0u8);
        Ok(Plane::with_arena(arena, line_size, stride, lines))
    }

    fn with_arena(arena: Vec<u8>, line_size: usize, stride: usize, lines: usize) -> Plane {
        let start = arena.as_ptr().align_offset(ALIGNMENT).min(ALIGNMENT);
        Plane {
            arena,
            start,
            line_size,
            stride,
            lines,
        }
    }

    #[inline]
    pub(crate) fn line_size(&self) -> usize {
        self.line_size
    }

    #[inline]
    pub(crate) fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub(crate) fn lines(&self) -> usize {
        self.lines
    }

    /// `stride * lines` bytes starting at the first row
    #[inline]
    pub(crate) fn valid(&self) -> &[u8] {
        &self.arena[self.start..self.start + self.stride * self.lines]
    }

    #[inline]
    pub(crate) fn valid_mut(&mut self) -> &mut [u8] {
        &mut self.arena[self.start..self.start + self.stride * self.lines]
    }

    /// `line_size` bytes of row `y`
    #[inline]
    pub(crate) fn row(&self, y: usize) -> &[u8] {
        assert!(y < self.lines, "Row {} is out of {} lines", y, self.lines);
        let offset = self.start + y * self.stride;
        &self.arena[offset..offset + self.line_size]
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(y < self.lines, "Row {} is out of {} lines", y, self.lines);
        let offset = self.start + y * self.stride;
        &mut self.arena[offset..offset + self.line_size]
    }

    /// Row `y` up to the end of the arena, covering packed samples that straddle
    /// `line_size`
    #[inline]
    pub(crate) fn span(&self, y: usize) -> &[u8] {
        assert!(y < self.lines, "Row {} is out of {} lines", y, self.lines);
        &self.arena[self.start + y * self.stride..]
    }

    #[inline]
    pub(crate) fn span_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(y < self.lines, "Row {} is out of {} lines", y, self.lines);
        let offset = self.start + y * self.stride;
        &mut self.arena[offset..]
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let line_size = self.line_size;
        self.valid()
            .chunks(self.stride.max(1))
            .map(move |row| &row[..line_size])
            .take(if self.stride == 0 { 0 } else { self.lines })
    }

    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> + '_ {
        let line_size = self.line_size;
        let lines = if self.stride == 0 { 0 } else { self.lines };
        let stride = self.stride.max(1);
        self.valid_mut()
            .chunks_mut(stride)
            .map(move |row| &mut row[..line_size])
            .take(lines)
    }

    /// Copies the valid region of `other` row by row, both must have equal `line_size`
    pub(crate) fn copy_rows_from(&mut self, other: &Plane) {
        debug_assert_eq!(self.line_size, other.line_size);
        for (dst, src) in self.rows_mut().zip(other.rows()) {
            dst.copy_from_slice(src);
        }
    }
}

impl Clone for Plane {
    fn clone(&self) -> Self {
        let mut plane = Plane::with_arena(
            vec![0u8; self.arena.len()],
            self.line_size,
            self.stride,
            self.lines,
        );
        plane.copy_rows_from(self);
        plane
    }
}

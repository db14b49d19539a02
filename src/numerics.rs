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

#[inline(always)]
/// Rounds to nearest, ties to even, the way C `lrintf` does under the default rounding mode
pub(crate) fn lrint(v: f32) -> i64 {
    v.round_ties_even() as i64
}

#[inline(always)]
/// Rounds `value` down to a multiple of `1 << log2`
pub(crate) const fn round_down_pow2(value: usize, log2: u8) -> usize {
    value & !((1usize << log2) - 1)
}

#[inline(always)]
/// Number of subsampled samples covering `value` full resolution samples
pub(crate) const fn subsampled(value: usize, log2: u8) -> usize {
    value.div_ceil(1usize << log2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lrint_rounds_half_to_even() {
        assert_eq!(lrint(0.5), 0);
        assert_eq!(lrint(1.5), 2);
        assert_eq!(lrint(2.5), 2);
        assert_eq!(lrint(-0.5), 0);
        assert_eq!(lrint(254.6), 255);
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round_down_pow2(7, 1), 6);
        assert_eq!(round_down_pow2(7, 2), 4);
        assert_eq!(round_down_pow2(7, 0), 7);
        assert_eq!(subsampled(7, 1), 4);
        assert_eq!(subsampled(8, 1), 4);
        assert_eq!(subsampled(9, 2), 3);
    }
}

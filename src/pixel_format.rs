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
use crate::image_error::ImageError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

macro_rules! pixel_formats {
    ($($(#[$meta:meta])* $variant:ident => $name:literal,)+) => {
        /// Every pixel layout an [Image](crate::Image) can hold.
        ///
        /// Names follow FFmpeg naming, so `Yuv422p10le` is planar YUV 4:2:2 with 10 bit samples
        /// stored in little endian 16 bit containers.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum PixelFormat {
            $($(#[$meta])* $variant,)+
        }

        impl PixelFormat {
            /// Full supported set, in declaration order
            pub const ALL: &'static [PixelFormat] = &[$(PixelFormat::$variant,)+];

            /// FFmpeg style name of the format
            pub const fn name(self) -> &'static str {
                match self {
                    $(PixelFormat::$variant => $name,)+
                }
            }
        }

        impl FromStr for PixelFormat {
            type Err = ImageError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(PixelFormat::$variant),)+
                    _ => Err(ImageError::UnknownPixelFormat(s.to_string())),
                }
            }
        }
    };
}

pixel_formats! {
    Yuv420p => "yuv420p",
    Yuv422p => "yuv422p",
    Yuv444p => "yuv444p",
    Yuv411p => "yuv411p",
    /// JPEG (full) range variant of `Yuv420p`
    Yuvj420p => "yuvj420p",
    Yuvj422p => "yuvj422p",
    Yuvj444p => "yuvj444p",
    Yuv420p10le => "yuv420p10le",
    Yuv420p16le => "yuv420p16le",
    Yuv422p9le => "yuv422p9le",
    Yuv422p9be => "yuv422p9be",
    Yuv422p10le => "yuv422p10le",
    Yuv422p10be => "yuv422p10be",
    Yuv422p16le => "yuv422p16le",
    Yuv444p9le => "yuv444p9le",
    Yuv444p9be => "yuv444p9be",
    Yuv444p10le => "yuv444p10le",
    Yuv444p10be => "yuv444p10be",
    Yuv444p16le => "yuv444p16le",
    Yuva420p9le => "yuva420p9le",
    Yuva420p9be => "yuva420p9be",
    Yuva420p10le => "yuva420p10le",
    Yuva420p10be => "yuva420p10be",
    Yuva420p16le => "yuva420p16le",
    Yuva420p16be => "yuva420p16be",
    Yuva422p9le => "yuva422p9le",
    Yuva422p9be => "yuva422p9be",
    Yuva422p10le => "yuva422p10le",
    Yuva422p10be => "yuva422p10be",
    Yuva422p16le => "yuva422p16le",
    Yuva422p16be => "yuva422p16be",
    Yuva444p9le => "yuva444p9le",
    Yuva444p9be => "yuva444p9be",
    Yuva444p10le => "yuva444p10le",
    Yuva444p10be => "yuva444p10be",
    Yuva444p16le => "yuva444p16le",
    Yuva444p16be => "yuva444p16be",
    /// Packed 4:2:2, byte order U Y0 V Y1
    Uyvy422 => "uyvy422",
    Rgb24 => "rgb24",
    Argb => "argb",
    Rgba => "rgba",
    Abgr => "abgr",
    Bgra => "bgra",
    /// Packed 5-5-5 in little endian 16 bit words, top bit unused
    Rgb555le => "rgb555le",
    Rgb48le => "rgb48le",
    Rgb48be => "rgb48be",
    Rgba64be => "rgba64be",
    /// Planar RGB with planes ordered G, B, R; 12 bit samples in little endian 16 bit containers
    Gbrp12le => "gbrp12le",
    /// Packed CIE XYZ, 12 bit samples in the top bits of little endian 16 bit containers
    Xyz12le => "xyz12le",
}

impl Display for PixelFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for &format in PixelFormat::ALL {
            assert_eq!(format.name().parse::<PixelFormat>().unwrap(), format);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        match "nv12".parse::<PixelFormat>() {
            Err(ImageError::UnknownPixelFormat(name)) => assert_eq!(name, "nv12"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn display_uses_ffmpeg_name() {
        assert_eq!(PixelFormat::Yuv422p10le.to_string(), "yuv422p10le");
        assert_eq!(format!("{}", PixelFormat::Rgba64be), "rgba64be");
    }
}

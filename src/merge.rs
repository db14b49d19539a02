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
use crate::{Alignment, Image, ImageError, Position, Rect, Result, Size};
use log::debug;

/// Image placed at an integer position
#[derive(Debug, Clone, PartialEq)]
pub struct PositionImage {
    pub image: Image,
    pub position: Position,
}

impl PositionImage {
    pub fn new(image: Image, position: Position) -> PositionImage {
        PositionImage { image, position }
    }

    fn rect(&self) -> Result<Rect> {
        let size = self.image.size();
        let width = i32::try_from(size.width).map_err(|_| ImageError::PointerOverflow)?;
        let height = i32::try_from(size.height).map_err(|_| ImageError::PointerOverflow)?;
        Ok(Rect::new(self.position, width, height))
    }
}

/// Flattens `images` into one image covering all of them.
///
/// Images are blended in order onto a transparent canvas in the pixel format of the
/// first one, so later images are drawn over earlier ones. Returns `None` for no input,
/// a single image is only re-aligned.
pub fn merge(mut images: Vec<PositionImage>, alignment: Alignment) -> Result<Option<PositionImage>> {
    if images.len() <= 1 {
        return match images.pop() {
            None => Ok(None),
            Some(single) => Ok(Some(PositionImage::new(
                Image::ensure_alignment(single.image, alignment)?,
                single.position,
            ))),
        };
    }

    let mut all = images[0].rect()?;
    for image in images.iter().skip(1) {
        all = all
            .union(&image.rect()?)
            .ok_or(ImageError::PointerOverflow)?;
    }
    debug!(
        "Merging {} images into {}x{} at ({}, {})",
        images.len(),
        all.width,
        all.height,
        all.x,
        all.y
    );

    let mut merged = Image::new(
        images[0].image.pixel_format(),
        Size::new(
            usize::try_from(all.width).map_err(|_| ImageError::PointerOverflow)?,
            usize::try_from(all.height).map_err(|_| ImageError::PointerOverflow)?,
        ),
        alignment,
    )?;
    merged.make_transparent()?;
    for image in images.iter() {
        let offset = image
            .position
            .checked_sub(all.position())
            .ok_or(ImageError::PointerOverflow)?;
        merged.alpha_blend(&image.image, offset)?;
    }

    Ok(Some(PositionImage::new(merged, all.position())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelFormat;
    use rand::Rng;

    fn opaque(size: Size) -> Image {
        let mut image = Image::new(PixelFormat::Rgba, size, Alignment::Compact).unwrap();
        let mut rng = rand::rng();
        for y in 0..size.height {
            for pixel in image.row_mut(0, y).chunks_exact_mut(4) {
                pixel[..3].iter_mut().for_each(|v| *v = rng.random());
                pixel[3] = 255;
            }
        }
        image
    }

    #[test]
    fn nothing_to_merge() {
        assert!(merge(Vec::new(), Alignment::Padded).unwrap().is_none());
    }

    #[test]
    fn single_image_is_realigned() {
        let image = opaque(Size::new(5, 3));
        let merged = merge(
            vec![PositionImage::new(image.clone(), Position::new(-3, 7))],
            Alignment::Padded,
        )
        .unwrap()
        .unwrap();
        assert_eq!(merged.position, Position::new(-3, 7));
        assert_eq!(merged.image.alignment(), Alignment::Padded);
        assert_eq!(merged.image.stride(0), 64);
        for y in 0..3 {
            assert_eq!(merged.image.row(0, y), image.row(0, y));
        }
    }

    #[test]
    fn bounding_box_holds_both_images() {
        let _ = env_logger::builder().is_test(true).try_init();
        let a = opaque(Size::new(10, 10));
        let b = opaque(Size::new(10, 10));
        let merged = merge(
            vec![
                PositionImage::new(a.clone(), Position::new(0, 0)),
                PositionImage::new(b.clone(), Position::new(20, 20)),
            ],
            Alignment::Compact,
        )
        .unwrap()
        .unwrap();
        assert_eq!(merged.position, Position::new(0, 0));
        assert_eq!(merged.image.size(), Size::new(30, 30));
        for y in 0..10 {
            assert_eq!(&merged.image.row(0, y)[..40], a.row(0, y));
            assert!(merged.image.row(0, y)[40..].iter().all(|&v| v == 0));
            assert_eq!(&merged.image.row(0, y + 20)[80..], b.row(0, y));
            assert!(merged.image.row(0, y + 20)[..80].iter().all(|&v| v == 0));
        }
        assert!(merged.image.row(0, 15).iter().all(|&v| v == 0));
    }

    #[test]
    fn later_images_are_drawn_on_top() {
        let a = opaque(Size::new(4, 4));
        let b = opaque(Size::new(4, 4));
        let merged = merge(
            vec![
                PositionImage::new(a.clone(), Position::new(-2, -2)),
                PositionImage::new(b.clone(), Position::new(0, 0)),
            ],
            Alignment::Padded,
        )
        .unwrap()
        .unwrap();
        assert_eq!(merged.position, Position::new(-2, -2));
        assert_eq!(merged.image.size(), Size::new(6, 6));
        assert_eq!(&merged.image.row(0, 0)[..16], a.row(0, 0));
        assert_eq!(&merged.image.row(0, 2)[..8], &a.row(0, 2)[..8]);
        assert_eq!(&merged.image.row(0, 2)[8..], b.row(0, 0));
        assert_eq!(&merged.image.row(0, 5)[8..], b.row(0, 3));
    }

    #[test]
    fn bounding_box_past_i32_is_rejected() {
        let result = merge(
            vec![
                PositionImage::new(opaque(Size::new(2, 2)), Position::new(i32::MIN, 0)),
                PositionImage::new(opaque(Size::new(2, 2)), Position::new(i32::MAX - 10, 0)),
            ],
            Alignment::Compact,
        );
        assert!(matches!(result, Err(ImageError::PointerOverflow)));

        let result = merge(
            vec![
                PositionImage::new(opaque(Size::new(2, 2)), Position::new(0, 0)),
                PositionImage::new(opaque(Size::new(8, 2)), Position::new(i32::MAX - 3, 0)),
            ],
            Alignment::Compact,
        );
        assert!(matches!(result, Err(ImageError::PointerOverflow)));
    }

    #[test]
    fn canvas_format_must_allow_transparency() {
        let rgb = Image::new(PixelFormat::Rgb24, Size::new(2, 2), Alignment::Compact).unwrap();
        let result = merge(
            vec![
                PositionImage::new(rgb.clone(), Position::new(0, 0)),
                PositionImage::new(rgb, Position::new(1, 1)),
            ],
            Alignment::Compact,
        );
        assert!(matches!(
            result,
            Err(ImageError::UnsupportedFormat {
                operation: "make_transparent",
                format: PixelFormat::Rgb24
            })
        ));
    }
}

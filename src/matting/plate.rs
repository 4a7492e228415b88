use std::fmt;

use image::{Pixel, Rgba};
use imageproc::definitions::Image;
use itertools::Itertools;

use crate::matting::key::KeyColor;
use crate::matting::pixel::PixelSample;

/// A raster plate: one full-resolution exposure of the scene against a
/// specific background, row-major RGBA.
pub type Plate = Image<Rgba<u8>>;

/// Bytes per sample in a plate's backing buffer.
pub(crate) const SAMPLE_STRIDE: usize = <Rgba<u8> as Pixel>::CHANNEL_COUNT as usize;

/// A color-key plate tagged with the key it was photographed against.
#[derive(Debug, Clone)]
pub struct ColorPlate {
    pub image: Plate,
    pub key: KeyColor,
}

impl ColorPlate {
    pub fn new(image: Plate, key: KeyColor) -> Self {
        Self { image, key }
    }
}

/// Names a plate slot in validation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlateId {
    White,
    Black,
    ColorA,
    ColorB,
}

impl fmt::Display for PlateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::White => "white",
            Self::Black => "black",
            Self::ColorA => "colorA",
            Self::ColorB => "colorB",
        };
        f.write_str(name)
    }
}

/// Builds a plate from a row-major buffer of packed 32-bit ARGB samples.
///
/// Returns `None` when `packed` does not hold exactly `width * height`
/// samples.
pub fn plate_from_packed_argb(width: u32, height: u32, packed: &[u32]) -> Option<Plate> {
    if packed.len() != width as usize * height as usize {
        return None;
    }

    let mut plate = Plate::new(width, height);
    plate.pixels_mut().zip_eq(packed).for_each(|(pixel, &argb)| {
        *pixel = Rgba::from(PixelSample::unpack(argb));
    });

    Some(plate)
}

/// Flattens a plate back into the row-major packed 32-bit ARGB form.
pub fn plate_to_packed_argb(plate: &Plate) -> Vec<u32> {
    plate
        .pixels()
        .map(|&pixel| PixelSample::from(pixel).pack())
        .collect()
}

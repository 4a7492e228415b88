use image::Rgba;
use itertools::Itertools;

use crate::matting::key::KeyColor;

/// A single fixed-point ARGB sample, the atomic unit of the matting
/// computation.
///
/// Every plate is a buffer of these and the per-pixel kernels consume and
/// produce them. A sample packs to and from a 32-bit integer with alpha in
/// the most significant byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PixelSample {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl PixelSample {
    /// Fully transparent black, emitted for unmixed background pixels.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }

    /// Packs the sample into a 32-bit ARGB integer, alpha in the most
    /// significant byte.
    #[inline]
    pub const fn pack(self) -> u32 {
        (self.alpha as u32) << 24
            | (self.red as u32) << 16
            | (self.green as u32) << 8
            | self.blue as u32
    }

    /// Unpacks a 32-bit ARGB integer. Lossless inverse of [`pack`](Self::pack).
    #[inline]
    pub const fn unpack(argb: u32) -> Self {
        Self {
            alpha: (argb >> 24) as u8,
            red: (argb >> 16) as u8,
            green: (argb >> 8) as u8,
            blue: argb as u8,
        }
    }

    /// Reads the channel a key color names directly (Red → red, Green →
    /// green, Blue → blue).
    #[inline]
    pub const fn channel(self, key: KeyColor) -> u8 {
        key.dominant_channel().of(self)
    }

    const fn fields(self) -> [u8; 4] {
        [self.alpha, self.red, self.green, self.blue]
    }

    /// True when every field of the two samples differs by at most
    /// `tolerance`.
    pub fn is_within_tolerance(self, other: Self, tolerance: i32) -> bool {
        self.fields()
            .into_iter()
            .zip_eq(other.fields())
            .all(|(a, b)| (i32::from(a) - i32::from(b)).abs() <= tolerance)
    }

    /// True when the sample is close to the pure saturated key color: the
    /// dominant channel within `tolerance` of 255 and the other two color
    /// channels within `tolerance` of 0.
    ///
    /// Detects "this pixel is unmixed background". Alpha is not inspected
    /// here; callers check it separately.
    pub fn is_within_key_tolerance(self, key: KeyColor, tolerance: i32) -> bool {
        [Channel::Red, Channel::Green, Channel::Blue]
            .into_iter()
            .all(|channel| {
                let target = if channel == key.dominant_channel() {
                    255
                } else {
                    0
                };
                (i32::from(channel.of(self)) - target).abs() <= tolerance
            })
    }

    /// Three-way comparator detecting partial key spill: true when the
    /// sample and `reference` differ by at most `tolerance` along both of
    /// `key`'s cross channels (the non-dominant ones).
    ///
    /// The dominant channel and alpha are left unconstrained — divergence
    /// there is exactly the spill signal the blended branches measure.
    pub fn is_spill_within_tolerance(
        self,
        reference: Self,
        key: KeyColor,
        tolerance: i32,
    ) -> bool {
        [key.primary_cross_channel(), key.secondary_cross_channel()]
            .into_iter()
            .all(|channel| channel.abs_delta(self, reference) <= tolerance)
    }
}

impl From<Rgba<u8>> for PixelSample {
    fn from(Rgba([red, green, blue, alpha]): Rgba<u8>) -> Self {
        Self::new(alpha, red, green, blue)
    }
}

impl From<PixelSample> for Rgba<u8> {
    fn from(sample: PixelSample) -> Self {
        Rgba([sample.red, sample.green, sample.blue, sample.alpha])
    }
}

/// Named accessor for one color channel of a [`PixelSample`].
///
/// The key-color lookup tables resolve to these, keeping channel dispatch
/// a plain value instead of per-branch control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    #[inline]
    pub const fn of(self, sample: PixelSample) -> u8 {
        match self {
            Self::Red => sample.red,
            Self::Green => sample.green,
            Self::Blue => sample.blue,
        }
    }

    /// Absolute difference of this channel between two samples.
    #[inline]
    pub fn abs_delta(self, a: PixelSample, b: PixelSample) -> i32 {
        (i32::from(self.of(a)) - i32::from(self.of(b))).abs()
    }
}

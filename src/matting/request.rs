use crate::error::MattingError;
use crate::matting::engine;
use crate::matting::key::KeyColor;
use crate::matting::plate::{ColorPlate, Plate, PlateId};

/// Outcome of one matting pass: the alpha-carrying output plate, or the
/// validation failure that stopped it before any pixel was touched.
pub type MattingResult = Result<Plate, MattingError>;

/// Immutable snapshot of one matting computation's inputs.
///
/// Up to four plates participate: `white` and `black` grayscale exposures
/// plus one or two color-key exposures. All plates and scalars are captured
/// before the pass begins; the engine never mutates them, so a background
/// plate cannot "become unavailable" mid-pass.
///
/// The two scalars are clamped into `[0.0, 1.0]` by their setters:
/// tolerance (scaled to integer steps in `[0, 100]` before comparisons) and
/// the white/black balance weighting the two grayscale estimates.
///
/// # Examples
///
/// ```
/// use difference_matting::{KeyColor, MattingRequest, Plate};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let white = Plate::from_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
/// let green = Plate::from_pixel(4, 4, image::Rgba([0, 255, 0, 255]));
///
/// let cutout = MattingRequest::new()
///     .with_white(white)
///     .with_color_a(green, KeyColor::Green)
///     .compute()?;
///
/// // The whole frame was unmixed green backdrop: fully transparent.
/// assert_eq!(cutout.get_pixel(0, 0)[3], 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MattingRequest {
    pub(crate) white: Option<Plate>,
    pub(crate) black: Option<Plate>,
    pub(crate) color_a: Option<ColorPlate>,
    pub(crate) color_b: Option<ColorPlate>,
    tolerance: f32,
    white_black_balance: f32,
}

impl Default for MattingRequest {
    fn default() -> Self {
        Self {
            white: None,
            black: None,
            color_a: None,
            color_b: None,
            tolerance: 0.0,
            white_black_balance: 0.5,
        }
    }
}

impl MattingRequest {
    /// An empty request with no plates, zero tolerance and an even
    /// white/black balance.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_white(mut self, plate: Plate) -> Self {
        self.white = Some(plate);
        self
    }

    pub fn with_black(mut self, plate: Plate) -> Self {
        self.black = Some(plate);
        self
    }

    pub fn with_color_a(mut self, plate: Plate, key: KeyColor) -> Self {
        self.color_a = Some(ColorPlate::new(plate, key));
        self
    }

    pub fn with_color_b(mut self, plate: Plate, key: KeyColor) -> Self {
        self.color_b = Some(ColorPlate::new(plate, key));
        self
    }

    /// Maximum allowed per-channel deviation when matching backdrop
    /// colors, as a fraction of the full scale. Clamped into `[0.0, 1.0]`.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.clamp(0.0, 1.0);
        self
    }

    /// Blend weight favoring the white-background estimate over the black
    /// one in three- and four-plate modes. Clamped into `[0.0, 1.0]`.
    pub fn with_white_black_balance(mut self, balance: f32) -> Self {
        self.white_black_balance = balance.clamp(0.0, 1.0);
        self
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn white_black_balance(&self) -> f32 {
        self.white_black_balance
    }

    /// The tolerance scalar scaled to integer comparison steps by
    /// truncation.
    pub(crate) fn tolerance_steps(&self) -> i32 {
        (self.tolerance * 100.0) as i32
    }

    /// Runs the matting pass for this snapshot.
    ///
    /// # Errors
    ///
    /// Any [`MattingError`] detected during validation; no partial output
    /// is produced.
    pub fn compute(&self) -> MattingResult {
        engine::compute(self)
    }

    /// Checks plate presence and pairwise dimensions.
    ///
    /// Pairs are checked in a fixed order (white/black, colorA/white,
    /// colorA/black, colorB/white, colorB/black) and the first failure
    /// short-circuits.
    ///
    /// # Errors
    ///
    /// * [`MattingError::MissingGrayscalePlate`] - neither white nor black supplied
    /// * [`MattingError::MissingColorKeyPlate`] - neither color plate supplied
    /// * [`MattingError::SizeMismatch`] - a supplied pair disagrees in size
    pub fn validate(&self) -> Result<(), MattingError> {
        if self.white.is_none() && self.black.is_none() {
            return Err(MattingError::MissingGrayscalePlate);
        }
        if self.color_a.is_none() && self.color_b.is_none() {
            return Err(MattingError::MissingColorKeyPlate);
        }

        if let (Some(white), Some(black)) = (&self.white, &self.black) {
            check_pair((PlateId::White, white), (PlateId::Black, black))?;
        }

        if let Some(color) = &self.color_a {
            if let Some(white) = &self.white {
                check_pair((PlateId::ColorA, &color.image), (PlateId::White, white))?;
            }
            if let Some(black) = &self.black {
                check_pair((PlateId::ColorA, &color.image), (PlateId::Black, black))?;
            }
        }

        if let Some(color) = &self.color_b {
            if let Some(white) = &self.white {
                check_pair((PlateId::ColorB, &color.image), (PlateId::White, white))?;
            }
            if let Some(black) = &self.black {
                check_pair((PlateId::ColorB, &color.image), (PlateId::Black, black))?;
            }
        }

        Ok(())
    }
}

fn check_pair(
    (first_id, first): (PlateId, &Plate),
    (second_id, second): (PlateId, &Plate),
) -> Result<(), MattingError> {
    if first.dimensions() == second.dimensions() {
        Ok(())
    } else {
        Err(MattingError::SizeMismatch {
            first: first_id,
            second: second_id,
            first_dimensions: first.dimensions(),
            second_dimensions: second.dimensions(),
        })
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn plate(width: u32, height: u32) -> Plate {
        Plate::from_pixel(width, height, Rgba([128, 128, 128, 255]))
    }

    #[test]
    fn scalars_are_clamped_into_unit_range() {
        let request = MattingRequest::new()
            .with_tolerance(1.5)
            .with_white_black_balance(-0.25);

        assert_eq!(request.tolerance(), 1.0);
        assert_eq!(request.white_black_balance(), 0.0);
    }

    #[test]
    fn tolerance_steps_truncate() {
        assert_eq!(MattingRequest::new().with_tolerance(0.0).tolerance_steps(), 0);
        assert_eq!(
            MattingRequest::new().with_tolerance(0.999).tolerance_steps(),
            99
        );
        assert_eq!(MattingRequest::new().with_tolerance(1.0).tolerance_steps(), 100);
    }

    #[test]
    fn missing_grayscale_plate_is_reported_first() {
        let empty = MattingRequest::new();
        assert_eq!(empty.validate(), Err(MattingError::MissingGrayscalePlate));

        let color_only = MattingRequest::new().with_color_a(plate(2, 2), KeyColor::Green);
        assert_eq!(
            color_only.validate(),
            Err(MattingError::MissingGrayscalePlate)
        );
    }

    #[test]
    fn missing_color_plate_is_reported() {
        let grayscale_only = MattingRequest::new()
            .with_white(plate(2, 2))
            .with_black(plate(2, 2));
        assert_eq!(
            grayscale_only.validate(),
            Err(MattingError::MissingColorKeyPlate)
        );
    }

    #[test]
    fn white_black_size_mismatch_names_that_pair() {
        let request = MattingRequest::new()
            .with_white(plate(4, 4))
            .with_black(plate(4, 5))
            .with_color_a(plate(4, 4), KeyColor::Green);

        assert_eq!(
            request.validate(),
            Err(MattingError::SizeMismatch {
                first: PlateId::White,
                second: PlateId::Black,
                first_dimensions: (4, 4),
                second_dimensions: (4, 5),
            })
        );
    }

    #[test]
    fn color_a_mismatch_is_checked_against_white_before_black() {
        let request = MattingRequest::new()
            .with_white(plate(4, 4))
            .with_black(plate(4, 4))
            .with_color_a(plate(8, 4), KeyColor::Green);

        assert_eq!(
            request.validate(),
            Err(MattingError::SizeMismatch {
                first: PlateId::ColorA,
                second: PlateId::White,
                first_dimensions: (8, 4),
                second_dimensions: (4, 4),
            })
        );
    }

    #[test]
    fn color_b_mismatch_short_circuits_like_every_other_pair() {
        let request = MattingRequest::new()
            .with_white(plate(4, 4))
            .with_black(plate(4, 4))
            .with_color_a(plate(4, 4), KeyColor::Green)
            .with_color_b(plate(2, 2), KeyColor::Blue);

        assert_eq!(
            request.validate(),
            Err(MattingError::SizeMismatch {
                first: PlateId::ColorB,
                second: PlateId::White,
                first_dimensions: (2, 2),
                second_dimensions: (4, 4),
            })
        );
    }

    #[test]
    fn complete_consistent_request_validates() {
        let request = MattingRequest::new()
            .with_white(plate(4, 4))
            .with_black(plate(4, 4))
            .with_color_a(plate(4, 4), KeyColor::Green)
            .with_color_b(plate(4, 4), KeyColor::Blue);

        assert_eq!(request.validate(), Ok(()));
    }
}

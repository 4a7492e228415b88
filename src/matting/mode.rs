use crate::error::MattingError;
use crate::matting::key::KeyColor;
use crate::matting::plate::Plate;
use crate::matting::request::MattingRequest;

/// The algorithm a request resolves to, borrowing the plates the pass will
/// read.
#[derive(Debug)]
pub enum Mode<'a> {
    /// One grayscale plate against one color plate.
    TwoPlate {
        reference: &'a Plate,
        color: &'a Plate,
        key: KeyColor,
    },
    /// White and black plates against one color plate.
    ThreePlate {
        white: &'a Plate,
        black: &'a Plate,
        color: &'a Plate,
        key: KeyColor,
    },
    /// White and black plates against both color plates.
    FourPlate {
        white: &'a Plate,
        black: &'a Plate,
        color_a: &'a Plate,
        key_a: KeyColor,
        color_b: &'a Plate,
        key_b: KeyColor,
    },
}

/// Validates the request and picks the algorithm for its plate set.
///
/// When only one grayscale plate exists and both color plates are present,
/// colorA wins and colorB is ignored.
///
/// # Errors
///
/// Any validation failure from [`MattingRequest::validate`], or
/// [`MattingError::IncompleteMaterial`] when the present plates satisfy no
/// mode's precondition.
pub fn select_mode(request: &MattingRequest) -> Result<Mode<'_>, MattingError> {
    request.validate()?;

    let white = request.white.as_ref();
    let black = request.black.as_ref();
    let color_a = request.color_a.as_ref();
    let color_b = request.color_b.as_ref();

    let mode = match (white, black, color_a, color_b) {
        (Some(reference), None, Some(color), _) | (None, Some(reference), Some(color), _) => {
            Mode::TwoPlate {
                reference,
                color: &color.image,
                key: color.key,
            }
        }
        (Some(reference), None, None, Some(color))
        | (None, Some(reference), None, Some(color)) => Mode::TwoPlate {
            reference,
            color: &color.image,
            key: color.key,
        },
        (Some(white), Some(black), Some(color), None)
        | (Some(white), Some(black), None, Some(color)) => Mode::ThreePlate {
            white,
            black,
            color: &color.image,
            key: color.key,
        },
        (Some(white), Some(black), Some(color_a), Some(color_b)) => Mode::FourPlate {
            white,
            black,
            color_a: &color_a.image,
            key_a: color_a.key,
            color_b: &color_b.image,
            key_b: color_b.key,
        },
        _ => return Err(MattingError::IncompleteMaterial),
    };

    Ok(mode)
}

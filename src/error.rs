use thiserror::Error;

use crate::matting::plate::PlateId;

/// Validation failures of a matting request.
///
/// Every variant is detected before any pixel is processed; a failing
/// request produces no output buffer. The engine never raises these as
/// panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MattingError {
    /// Neither the white nor the black plate was supplied.
    #[error("at least one grayscale plate (white or black) is required")]
    MissingGrayscalePlate,

    /// Neither color-key plate was supplied.
    #[error("at least one color-key plate (colorA or colorB) is required")]
    MissingColorKeyPlate,

    /// Two supplied plates disagree in width or height.
    ///
    /// Reported per offending pair, named in the order the pair was
    /// checked.
    #[error("{first} plate dimensions {first_dimensions:?} do not match {second} plate dimensions {second_dimensions:?}")]
    SizeMismatch {
        first: PlateId,
        second: PlateId,
        /// Dimensions (width, height) of the `first` plate
        first_dimensions: (u32, u32),
        /// Dimensions (width, height) of the `second` plate
        second_dimensions: (u32, u32),
    },

    /// The supplied plates satisfy no matting mode's precondition.
    #[error("supplied plates do not satisfy any matting mode")]
    IncompleteMaterial,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_mismatch_names_the_offending_pair() {
        let error = MattingError::SizeMismatch {
            first: PlateId::ColorA,
            second: PlateId::White,
            first_dimensions: (4, 4),
            second_dimensions: (8, 8),
        };

        let message = error.to_string();
        assert!(message.contains("colorA"));
        assert!(message.contains("white"));
        assert!(message.contains("(4, 4)"));
        assert!(message.contains("(8, 8)"));
    }
}

//! Difference matting over multiple known-background exposures.
//!
//! The subject is photographed several times with identical framing
//! against different backdrops: white, black, and one or two saturated
//! key colors. Fusing the exposures recovers a per-pixel alpha channel and
//! true foreground color even where the subject itself contains colors
//! close to the key — the weakness of single-backdrop chroma keying.
//!
//! Build a [`MattingRequest`] from the available plates, then call
//! [`MattingRequest::compute`]. The engine picks the two-, three- or
//! four-plate algorithm from the plates present and returns one output
//! plate, or a typed [`MattingError`] when the material is inconsistent.
//! Decoding images into plates and encoding the result are the caller's
//! concern; the crate performs no I/O.

mod error;
mod matting;

pub use error::MattingError;
pub use matting::engine::compute;
pub use matting::key::KeyColor;
pub use matting::mode::{select_mode, Mode};
pub use matting::pixel::{Channel, PixelSample};
pub use matting::plate::{
    plate_from_packed_argb, plate_to_packed_argb, ColorPlate, Plate, PlateId,
};
pub use matting::request::{MattingRequest, MattingResult};
pub use matting::zip::{PlateZip2, PlateZip3, PlateZip4};

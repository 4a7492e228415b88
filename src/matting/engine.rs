//! The per-pixel matting algorithms.
//!
//! Each mode is a pure function over aligned samples: a tolerance gate
//! decides between "unmixed backdrop" (fully transparent), "no spill"
//! (reference sample unchanged) and a blended branch that derives alpha
//! from cross-channel divergence between the color exposure and the
//! grayscale reference. Coordinates are independent; there is no
//! cross-pixel state.

use image::Rgba;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::matting::key::KeyColor;
use crate::matting::mode::{select_mode, Mode};
use crate::matting::pixel::PixelSample;
use crate::matting::plate::{Plate, SAMPLE_STRIDE};
use crate::matting::request::{MattingRequest, MattingResult};
use crate::matting::zip::{PlateZip2, PlateZip3, PlateZip4};

/// Runs the matting pass described by `request`.
///
/// Validates the snapshot, picks the mode for the present plates and
/// produces one output plate of the input dimensions. With the `rayon`
/// feature the pass is partitioned by rows; results are byte-identical to
/// the sequential build.
///
/// # Errors
///
/// Any [`crate::MattingError`] detected during validation; no output is
/// produced then.
pub fn compute(request: &MattingRequest) -> MattingResult {
    let tolerance = request.tolerance_steps();
    let white_balance = request.white_black_balance();

    let output = match select_mode(request)? {
        Mode::TwoPlate {
            reference,
            color,
            key,
        } => two_plate(reference, color, key, tolerance),
        Mode::ThreePlate {
            white,
            black,
            color,
            key,
        } => three_plate(white, black, color, key, tolerance, white_balance),
        Mode::FourPlate {
            white,
            black,
            color_a,
            key_a,
            color_b,
            key_b,
        } => four_plate(
            white,
            black,
            color_a,
            key_a,
            color_b,
            key_b,
            tolerance,
            white_balance,
        ),
    };

    Ok(output)
}

fn two_plate(reference: &Plate, color: &Plate, key: KeyColor, tolerance: i32) -> Plate {
    let (width, height) = color.dimensions();
    render_rows(width, height, |y, row| {
        for (x, _, reference_sample, color_sample) in PlateZip2::rows(reference, color, y, y + 1) {
            write_sample(
                row,
                x,
                two_plate_sample(reference_sample, color_sample, key, tolerance),
            );
        }
    })
}

fn three_plate(
    white: &Plate,
    black: &Plate,
    color: &Plate,
    key: KeyColor,
    tolerance: i32,
    white_balance: f32,
) -> Plate {
    let (width, height) = white.dimensions();
    render_rows(width, height, |y, row| {
        for (x, _, white_sample, black_sample, color_sample) in
            PlateZip3::rows(white, black, color, y, y + 1)
        {
            write_sample(
                row,
                x,
                three_plate_sample(
                    white_sample,
                    black_sample,
                    color_sample,
                    key,
                    tolerance,
                    white_balance,
                ),
            );
        }
    })
}

#[allow(clippy::too_many_arguments)]
fn four_plate(
    white: &Plate,
    black: &Plate,
    color_a: &Plate,
    key_a: KeyColor,
    color_b: &Plate,
    key_b: KeyColor,
    tolerance: i32,
    white_balance: f32,
) -> Plate {
    let (width, height) = white.dimensions();
    render_rows(width, height, |y, row| {
        for (x, _, white_sample, black_sample, a_sample, b_sample) in
            PlateZip4::rows(white, black, color_a, color_b, y, y + 1)
        {
            write_sample(
                row,
                x,
                four_plate_sample(
                    white_sample,
                    black_sample,
                    a_sample,
                    b_sample,
                    key_a,
                    key_b,
                    tolerance,
                    white_balance,
                ),
            );
        }
    })
}

fn two_plate_sample(
    reference: PixelSample,
    color: PixelSample,
    key: KeyColor,
    tolerance: i32,
) -> PixelSample {
    if color.alpha == 255 && color.is_within_key_tolerance(key, tolerance) {
        return PixelSample::TRANSPARENT;
    }
    if color == reference {
        return reference;
    }
    if color.is_spill_within_tolerance(reference, key, tolerance) {
        let delta = key.primary_cross_channel().abs_delta(color, reference);
        return PixelSample::new(
            (255 - delta) as u8,
            reference.red,
            reference.green,
            reference.blue,
        );
    }
    reference
}

fn three_plate_sample(
    white: PixelSample,
    black: PixelSample,
    color: PixelSample,
    key: KeyColor,
    tolerance: i32,
    white_balance: f32,
) -> PixelSample {
    if color.alpha == 255 && color.is_within_key_tolerance(key, tolerance) {
        return PixelSample::TRANSPARENT;
    }
    if color == white {
        return white;
    }
    if color.is_spill_within_tolerance(white, key, tolerance) {
        let black_balance = 1.0 - white_balance;
        let white_alpha = 255 - key.primary_cross_channel().abs_delta(color, white);
        let black_alpha = 255 - key.secondary_cross_channel().abs_delta(color, white);
        return blended_sample(white, black, white_alpha, black_alpha, white_balance, black_balance);
    }
    white
}

#[allow(clippy::too_many_arguments)]
fn four_plate_sample(
    white: PixelSample,
    black: PixelSample,
    color_a: PixelSample,
    color_b: PixelSample,
    key_a: KeyColor,
    key_b: KeyColor,
    tolerance: i32,
    white_balance: f32,
) -> PixelSample {
    if white.alpha == 255
        && black.alpha == 255
        && color_a.is_within_key_tolerance(key_a, tolerance)
        && color_b.is_within_key_tolerance(key_b, tolerance)
    {
        return PixelSample::TRANSPARENT;
    }
    if white == black && black == color_a && color_a == color_b {
        return white;
    }
    if color_a.is_spill_within_tolerance(white, key_a, tolerance)
        || color_a.is_spill_within_tolerance(black, key_a, tolerance)
        || color_b.is_spill_within_tolerance(white, key_b, tolerance)
        || color_b.is_spill_within_tolerance(black, key_b, tolerance)
    {
        let black_balance = 1.0 - white_balance;
        // One selector per plate/key pairing; averaging the two color
        // plates' divergence against each grayscale reference.
        let white_alpha = 255
            - (key_a.primary_cross_channel().abs_delta(color_a, white)
                + key_b.secondary_cross_channel().abs_delta(color_b, white))
                / 2;
        let black_alpha = 255
            - (key_a.dominant_channel().abs_delta(color_a, black)
                + key_b.dominant_channel().abs_delta(color_b, black))
                / 2;
        return blended_sample(white, black, white_alpha, black_alpha, white_balance, black_balance);
    }
    white
}

/// Weighted combination of the two alpha estimates and the two grayscale
/// references. Arithmetic truncates, matching the fixed-point contract.
fn blended_sample(
    white: PixelSample,
    black: PixelSample,
    white_alpha: i32,
    black_alpha: i32,
    white_balance: f32,
    black_balance: f32,
) -> PixelSample {
    PixelSample::new(
        (white_alpha as f32 * white_balance + black_alpha as f32 * black_balance) as u8,
        blend_channel(white.red, black.red, white_balance, black_balance),
        blend_channel(white.green, black.green, white_balance, black_balance),
        blend_channel(white.blue, black.blue, white_balance, black_balance),
    )
}

fn blend_channel(white: u8, black: u8, white_balance: f32, black_balance: f32) -> u8 {
    (f32::from(white) * white_balance + f32::from(black) * black_balance) as u8
}

/// Fills an output plate row by row. With the `rayon` feature the rows are
/// distributed across the pool; each row writes a disjoint slice, so the
/// only synchronization is the final join.
fn render_rows<F>(width: u32, height: u32, fill_row: F) -> Plate
where
    F: Fn(u32, &mut [u8]) + Sync,
{
    let mut output = Plate::new(width, height);
    if width == 0 || height == 0 {
        return output;
    }

    let stride = width as usize * SAMPLE_STRIDE;
    let buffer: &mut [u8] = &mut output;

    #[cfg(feature = "rayon")]
    buffer
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| fill_row(y as u32, row));

    #[cfg(not(feature = "rayon"))]
    buffer
        .chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| fill_row(y as u32, row));

    output
}

fn write_sample(row: &mut [u8], x: u32, sample: PixelSample) {
    let offset = x as usize * SAMPLE_STRIDE;
    row[offset..offset + SAMPLE_STRIDE].copy_from_slice(&Rgba::from(sample).0);
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn two_plate_pure_backdrop_goes_transparent() {
        let reference = PixelSample::new(255, 255, 255, 255);
        let pure_green = PixelSample::new(255, 0, 255, 0);

        assert_eq!(
            two_plate_sample(reference, pure_green, KeyColor::Green, 0),
            PixelSample::TRANSPARENT
        );
    }

    #[test]
    fn two_plate_identical_samples_pass_through() {
        let sample = PixelSample::new(255, 200, 100, 50);
        assert_eq!(
            two_plate_sample(sample, sample, KeyColor::Green, 0),
            sample
        );
    }

    #[test]
    fn two_plate_spill_derives_alpha_from_primary_cross_delta() {
        let reference = PixelSample::new(255, 200, 100, 50);
        // Green key: red is the primary cross channel, delta 5.
        let color = PixelSample::new(255, 195, 230, 55);

        assert_eq!(
            two_plate_sample(reference, color, KeyColor::Green, 10),
            PixelSample::new(250, 200, 100, 50)
        );
    }

    #[test]
    fn two_plate_without_spill_signal_stays_opaque() {
        let reference = PixelSample::new(255, 200, 100, 50);
        // Red diverges by 50, far past tolerance: real foreground change.
        let color = PixelSample::new(255, 150, 230, 55);

        assert_eq!(
            two_plate_sample(reference, color, KeyColor::Green, 10),
            reference
        );
    }

    #[test]
    fn three_plate_blends_alpha_and_color_by_balance() {
        let white = PixelSample::new(255, 200, 200, 200);
        let black = PixelSample::new(255, 100, 100, 100);
        // Red delta 5 (alpha 250), blue delta 8 (alpha 247).
        let color = PixelSample::new(255, 195, 40, 208);

        assert_eq!(
            three_plate_sample(white, black, color, KeyColor::Green, 10, 0.5),
            PixelSample::new(248, 150, 150, 150)
        );
    }

    #[test]
    fn three_plate_balance_extremes_pick_one_estimate() {
        let white = PixelSample::new(255, 200, 200, 200);
        let black = PixelSample::new(255, 100, 100, 100);
        let color = PixelSample::new(255, 195, 40, 208);

        assert_eq!(
            three_plate_sample(white, black, color, KeyColor::Green, 10, 1.0),
            PixelSample::new(250, 200, 200, 200)
        );
        assert_eq!(
            three_plate_sample(white, black, color, KeyColor::Green, 10, 0.0),
            PixelSample::new(247, 100, 100, 100)
        );
    }

    #[test]
    fn three_plate_unmatched_pixel_keeps_white_reference() {
        let white = PixelSample::new(255, 200, 200, 200);
        let black = PixelSample::new(255, 100, 100, 100);
        let color = PixelSample::new(255, 20, 40, 60);

        assert_eq!(
            three_plate_sample(white, black, color, KeyColor::Green, 10, 0.5),
            white
        );
    }

    #[test]
    fn four_plate_pure_backdrops_go_transparent() {
        let white = PixelSample::new(255, 255, 255, 255);
        let black = PixelSample::new(255, 0, 0, 0);
        let green = PixelSample::new(255, 0, 255, 0);
        let blue = PixelSample::new(255, 0, 0, 255);

        assert_eq!(
            four_plate_sample(
                white,
                black,
                green,
                blue,
                KeyColor::Green,
                KeyColor::Blue,
                0,
                0.5
            ),
            PixelSample::TRANSPARENT
        );
    }

    #[test]
    fn four_plate_identical_samples_pass_through() {
        let sample = PixelSample::new(255, 120, 130, 140);
        assert_eq!(
            four_plate_sample(
                sample,
                sample,
                sample,
                sample,
                KeyColor::Green,
                KeyColor::Blue,
                0,
                0.5
            ),
            sample
        );
    }

    #[test]
    fn four_plate_averages_both_color_plates_per_reference() {
        let white = PixelSample::new(255, 200, 200, 200);
        let black = PixelSample::new(255, 100, 100, 100);
        // vs white: red deltas 5 and 2 -> white alpha 252.
        // vs black: green delta 60, blue delta 70 -> black alpha 190.
        let color_a = PixelSample::new(255, 195, 40, 205);
        let color_b = PixelSample::new(255, 198, 202, 30);

        assert_eq!(
            four_plate_sample(
                white,
                black,
                color_a,
                color_b,
                KeyColor::Green,
                KeyColor::Blue,
                10,
                0.5
            ),
            PixelSample::new(221, 150, 150, 150)
        );
    }

    #[test]
    fn four_plate_without_any_spill_signal_keeps_white() {
        let white = PixelSample::new(255, 200, 200, 200);
        let black = PixelSample::new(255, 100, 100, 100);
        let color_a = PixelSample::new(255, 20, 40, 60);
        let color_b = PixelSample::new(255, 60, 40, 20);

        assert_eq!(
            four_plate_sample(
                white,
                black,
                color_a,
                color_b,
                KeyColor::Green,
                KeyColor::Blue,
                10,
                0.5
            ),
            white
        );
    }

    #[test]
    fn compute_two_plate_single_green_pixel_scenario() {
        let request = crate::MattingRequest::new()
            .with_white(Plate::from_pixel(1, 1, Rgba([255, 255, 255, 255])))
            .with_color_a(Plate::from_pixel(1, 1, Rgba([0, 255, 0, 255])), KeyColor::Green);

        let output = compute(&request).unwrap();
        assert_eq!(*output.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn compute_two_plate_identical_pixel_scenario() {
        let pixel = Rgba([200, 100, 50, 255]);
        let request = crate::MattingRequest::new()
            .with_white(Plate::from_pixel(1, 1, pixel))
            .with_color_a(Plate::from_pixel(1, 1, pixel), KeyColor::Green);

        let output = compute(&request).unwrap();
        assert_eq!(*output.get_pixel(0, 0), pixel);
    }

    #[test]
    fn compute_preserves_dimensions() {
        let request = crate::MattingRequest::new()
            .with_white(Plate::from_pixel(7, 3, Rgba([255, 255, 255, 255])))
            .with_black(Plate::from_pixel(7, 3, Rgba([0, 0, 0, 255])))
            .with_color_a(Plate::from_pixel(7, 3, Rgba([0, 255, 0, 255])), KeyColor::Green);

        assert_eq!(compute(&request).unwrap().dimensions(), (7, 3));
    }

    #[test]
    fn compute_accepts_empty_plates() {
        let request = crate::MattingRequest::new()
            .with_white(Plate::new(0, 0))
            .with_color_a(Plate::new(0, 0), KeyColor::Green);

        assert_eq!(compute(&request).unwrap().dimensions(), (0, 0));
    }
}

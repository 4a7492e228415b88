//! Lock-step walkers over 2–4 equal-dimension plates.
//!
//! Each iterator yields the aligned samples for one coordinate at a time,
//! row-major, together with the coordinate itself. A walker can be
//! restricted to a row range so parallel passes can partition the image
//! without any per-pixel synchronization.

use std::slice::ChunksExact;

use crate::matting::pixel::PixelSample;
use crate::matting::plate::{Plate, SAMPLE_STRIDE};

/// Row-major coordinate bookkeeping shared by the walkers.
struct Coordinates {
    width: u32,
    x: u32,
    y: u32,
}

impl Coordinates {
    fn new(width: u32, start_row: u32) -> Self {
        Self {
            width,
            x: 0,
            y: start_row,
        }
    }

    fn advance(&mut self) -> (u32, u32) {
        let at = (self.x, self.y);
        self.x += 1;
        if self.x == self.width {
            self.x = 0;
            self.y += 1;
        }
        at
    }
}

fn row_samples(plate: &Plate, start_row: u32, end_row: u32) -> ChunksExact<'_, u8> {
    let stride = plate.width() as usize * SAMPLE_STRIDE;
    let bytes: &[u8] = plate;
    bytes[start_row as usize * stride..end_row as usize * stride].chunks_exact(SAMPLE_STRIDE)
}

fn sample_from_bytes(bytes: &[u8]) -> PixelSample {
    PixelSample::new(bytes[3], bytes[0], bytes[1], bytes[2])
}

/// Walks two plates in lock-step, yielding `(x, y, a, b)` per coordinate.
pub struct PlateZip2<'a> {
    at: Coordinates,
    a: ChunksExact<'a, u8>,
    b: ChunksExact<'a, u8>,
}

impl<'a> PlateZip2<'a> {
    pub fn new(a: &'a Plate, b: &'a Plate) -> Self {
        Self::rows(a, b, 0, a.height())
    }

    /// Restricts the walk to rows `start_row..end_row`.
    pub fn rows(a: &'a Plate, b: &'a Plate, start_row: u32, end_row: u32) -> Self {
        debug_assert_eq!(a.dimensions(), b.dimensions());
        Self {
            at: Coordinates::new(a.width(), start_row),
            a: row_samples(a, start_row, end_row),
            b: row_samples(b, start_row, end_row),
        }
    }
}

impl Iterator for PlateZip2<'_> {
    type Item = (u32, u32, PixelSample, PixelSample);

    fn next(&mut self) -> Option<Self::Item> {
        let a = sample_from_bytes(self.a.next()?);
        let b = sample_from_bytes(self.b.next()?);
        let (x, y) = self.at.advance();
        Some((x, y, a, b))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.a.size_hint()
    }
}

impl ExactSizeIterator for PlateZip2<'_> {}

/// Walks three plates in lock-step.
pub struct PlateZip3<'a> {
    at: Coordinates,
    a: ChunksExact<'a, u8>,
    b: ChunksExact<'a, u8>,
    c: ChunksExact<'a, u8>,
}

impl<'a> PlateZip3<'a> {
    pub fn new(a: &'a Plate, b: &'a Plate, c: &'a Plate) -> Self {
        Self::rows(a, b, c, 0, a.height())
    }

    /// Restricts the walk to rows `start_row..end_row`.
    pub fn rows(a: &'a Plate, b: &'a Plate, c: &'a Plate, start_row: u32, end_row: u32) -> Self {
        debug_assert_eq!(a.dimensions(), b.dimensions());
        debug_assert_eq!(a.dimensions(), c.dimensions());
        Self {
            at: Coordinates::new(a.width(), start_row),
            a: row_samples(a, start_row, end_row),
            b: row_samples(b, start_row, end_row),
            c: row_samples(c, start_row, end_row),
        }
    }
}

impl Iterator for PlateZip3<'_> {
    type Item = (u32, u32, PixelSample, PixelSample, PixelSample);

    fn next(&mut self) -> Option<Self::Item> {
        let a = sample_from_bytes(self.a.next()?);
        let b = sample_from_bytes(self.b.next()?);
        let c = sample_from_bytes(self.c.next()?);
        let (x, y) = self.at.advance();
        Some((x, y, a, b, c))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.a.size_hint()
    }
}

impl ExactSizeIterator for PlateZip3<'_> {}

/// Walks four plates in lock-step.
pub struct PlateZip4<'a> {
    at: Coordinates,
    a: ChunksExact<'a, u8>,
    b: ChunksExact<'a, u8>,
    c: ChunksExact<'a, u8>,
    d: ChunksExact<'a, u8>,
}

impl<'a> PlateZip4<'a> {
    pub fn new(a: &'a Plate, b: &'a Plate, c: &'a Plate, d: &'a Plate) -> Self {
        Self::rows(a, b, c, d, 0, a.height())
    }

    /// Restricts the walk to rows `start_row..end_row`.
    pub fn rows(
        a: &'a Plate,
        b: &'a Plate,
        c: &'a Plate,
        d: &'a Plate,
        start_row: u32,
        end_row: u32,
    ) -> Self {
        debug_assert_eq!(a.dimensions(), b.dimensions());
        debug_assert_eq!(a.dimensions(), c.dimensions());
        debug_assert_eq!(a.dimensions(), d.dimensions());
        Self {
            at: Coordinates::new(a.width(), start_row),
            a: row_samples(a, start_row, end_row),
            b: row_samples(b, start_row, end_row),
            c: row_samples(c, start_row, end_row),
            d: row_samples(d, start_row, end_row),
        }
    }
}

impl Iterator for PlateZip4<'_> {
    type Item = (
        u32,
        u32,
        PixelSample,
        PixelSample,
        PixelSample,
        PixelSample,
    );

    fn next(&mut self) -> Option<Self::Item> {
        let a = sample_from_bytes(self.a.next()?);
        let b = sample_from_bytes(self.b.next()?);
        let c = sample_from_bytes(self.c.next()?);
        let d = sample_from_bytes(self.d.next()?);
        let (x, y) = self.at.advance();
        Some((x, y, a, b, c, d))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.a.size_hint()
    }
}

impl ExactSizeIterator for PlateZip4<'_> {}

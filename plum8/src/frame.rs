use bitvec::prelude::*;
#[cfg(feature = "embedded-graphics")]
use embedded_graphics::{image::ImageRaw, pixelcolor::BinaryColor};

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;
pub(crate) const MEM_LENGTH: usize = WIDTH * HEIGHT / 8;

/// Pixel grid in a caller chosen representation, indexed `[y][x]`
pub type Grid<P> = [[P; WIDTH]; HEIGHT];

/// An opaque struct holding frame of Plum8 display
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Frame([u8; MEM_LENGTH]);

/// A shared view over a `Frame`
///
/// Has different accessors for the content of frames, which can be used independently
/// to fulfill the needs.
///
/// Each pixel is represented either by a corresponding bit being set, or by `true` value.
/// Internally, the data is stored in a form of concatenating rows from top to bottom of the frame.
/// Rows are represented as an individual bits of continuous memory, matching the state of pixels
/// from left to the right.
///
/// #Note:
/// Can return ImageRaw instance with `embedded-graphics` feature on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FrameView<'a>(&'a [u8; MEM_LENGTH]);

impl<'a> FrameView<'a> {
    /// View the raw memory of a frame
    pub fn as_raw(&self) -> &[u8] {
        self.0
    }

    /// Create an immutable copy of a frame
    pub fn copy_frame(self) -> Frame {
        Frame(*self.0)
    }

    /// Access frame's bits by indexes
    pub fn get_bit(&self, x: usize, y: usize) -> Option<&bool> {
        self.iter_rows_as_bitslices()
            .nth(y)
            .map(|row| row.get(x))
            .flatten()
    }

    /// Get iterator over rows in a form of a `BitSlice`s
    pub fn iter_rows_as_bitslices(&self) -> impl Iterator<Item = &'a BitSlice<Msb0, u8>> {
        self.0.chunks(WIDTH / 8).map(|row| row.view_bits::<Msb0>())
    }

    /// Expand the frame into a grid of caller's pixels
    pub fn to_grid<P: Copy>(&self, on: P, off: P) -> Grid<P> {
        let mut grid = [[off; WIDTH]; HEIGHT];
        self.iter_rows_as_bitslices()
            .zip(grid.iter_mut())
            .for_each(|(bits, row)| {
                row.iter_mut()
                    .zip(bits)
                    .filter(|(_, bit)| **bit)
                    .for_each(|(px, _)| *px = on)
            });
        grid
    }

    /// Number of pixels turned on
    pub fn count_lit(&self) -> usize {
        self.0.iter().map(|byte| byte.count_ones() as usize).sum()
    }

    /// Get `ImageRaw` structure from frame's data
    #[cfg(feature = "embedded-graphics")]
    pub fn as_raw_image(&self) -> ImageRaw<'_, BinaryColor> {
        ImageRaw::new(self.as_raw(), WIDTH as u32, HEIGHT as u32)
    }
}

impl Frame {
    pub(crate) fn new() -> Self {
        Self([0; MEM_LENGTH])
    }

    /// Get view over frame
    pub fn view(&self) -> FrameView<'_> {
        FrameView(&self.0)
    }

    pub(crate) fn clear(&mut self) {
        self.0.iter_mut().for_each(|byte| *byte = 0);
    }

    /// Flip a bit if `val` is set, returns whether a lit pixel got erased
    pub(crate) fn xor_bit(&mut self, x: usize, y: usize, val: bool) -> Result<bool, &'static str> {
        self.iter_rows_as_bitslices_mut()
            .nth(y)
            .map(|row| {
                row.get_mut(x).map(|mut bit| {
                    let erased = *bit && val;
                    *bit ^= val;
                    erased
                })
            })
            .flatten()
            .ok_or("Pixel index out of bounds")
    }

    /// XOR a sprite row at `(x, y)`, wrapping every pixel around the edges on its own
    ///
    /// Returns whether any lit pixel was erased.
    pub(crate) fn xor_sprite_row(&mut self, x: usize, y: usize, row: u8) -> bool {
        let y = y % HEIGHT;
        let mut erased = false;
        for (dx, &px) in row.view_bits::<Msb0>().iter().enumerate() {
            if px {
                // Indices are reduced modulo the frame size, the lookup cannot miss
                erased |= self.xor_bit((x + dx) % WIDTH, y, true).unwrap_or(false);
            }
        }
        erased
    }

    pub(crate) fn iter_rows_as_bitslices_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut BitSlice<Msb0, u8>> {
        self.0
            .chunks_mut(WIDTH / 8)
            .map(|row| row.view_bits_mut::<Msb0>())
    }
}

#[cfg(test)]
impl<'a> FrameView<'a> {
    pub(crate) fn new(frame: &'a [u8; MEM_LENGTH]) -> Self {
        Self(frame)
    }
}

#[cfg(test)]
impl Frame {
    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

#[cfg(test)]
mod frame_test {
    use super::*;

    #[test]
    fn get_bit() {
        let mut frame = Frame::new();
        frame.as_raw_mut()[0] = 0b1000_0000;

        assert_eq!(frame.view().get_bit(0, 0), Some(&true));
        assert_eq!(frame.view().get_bit(1, 0), Some(&false));
        assert_eq!(frame.view().get_bit(0, 1), Some(&false));
        assert_eq!(frame.view().get_bit(WIDTH, 0), None);
        assert_eq!(frame.view().get_bit(0, HEIGHT), None);
    }

    #[test]
    fn xor_bit() {
        let mut frame = Frame::new();
        assert_eq!(frame.xor_bit(0, 0, false), Ok(false));
        assert_eq!(frame.view().get_bit(0, 0), Some(&false));
        assert_eq!(frame.xor_bit(0, 0, true), Ok(false));
        assert_eq!(frame.view().get_bit(0, 0), Some(&true));
        assert_eq!(frame.xor_bit(0, 0, false), Ok(false));
        assert_eq!(frame.view().get_bit(0, 0), Some(&true));
        assert_eq!(frame.xor_bit(0, 0, true), Ok(true));
        assert_eq!(frame.view().get_bit(0, 0), Some(&false));
        assert_eq!(frame.xor_bit(WIDTH, 0, true), Err("Pixel index out of bounds"));
    }

    #[test]
    fn sprite_row_wraps_per_pixel() {
        let mut frame = Frame::new();
        assert!(!frame.xor_sprite_row(60, 31, 0b1111_1111));

        let view = frame.view();
        for x in 60..64 {
            assert_eq!(view.get_bit(x, 31), Some(&true));
        }
        for x in 0..4 {
            assert_eq!(view.get_bit(x, 31), Some(&true));
        }
        assert_eq!(view.get_bit(4, 31), Some(&false));
        assert_eq!(view.get_bit(59, 31), Some(&false));
        assert_eq!(view.count_lit(), 8);
    }

    #[test]
    fn sprite_row_reports_erased_pixels() {
        let mut frame = Frame::new();
        assert!(!frame.xor_sprite_row(0, 0, 0b1010_0000));
        assert!(!frame.xor_sprite_row(0, 0, 0b0101_0000));
        assert_eq!(frame.view().as_raw()[0], 0b1111_0000);
        assert!(frame.xor_sprite_row(0, 0, 0b0001_0000));
        assert_eq!(frame.view().as_raw()[0], 0b1110_0000);
    }

    #[test]
    fn clear() {
        let mut frame = Frame::new();
        frame.as_raw_mut().iter_mut().for_each(|byte| *byte = 0xFF);
        assert_eq!(frame.view().count_lit(), WIDTH * HEIGHT);
        frame.clear();
        assert_eq!(frame, Frame::new());
    }

    #[test]
    fn to_grid() {
        let mut frame = Frame::new();
        frame.as_raw_mut()[0] = 0b0100_0000;
        frame.as_raw_mut()[MEM_LENGTH - 1] = 0b0000_0001;

        let grid = FrameView::new(&frame.0).to_grid([255u8; 3], [0u8; 3]);
        assert_eq!(grid[0][0], [0, 0, 0]);
        assert_eq!(grid[0][1], [255, 255, 255]);
        assert_eq!(grid[HEIGHT - 1][WIDTH - 1], [255, 255, 255]);
        assert_eq!(grid.iter().flatten().filter(|&&px| px == [255; 3]).count(), 2);
    }
}

use plum8::FrameView;

/// Rows of `#` (lit) and `.` (dark), each terminated by a newline
pub fn render_ascii(view: FrameView<'_>) -> String {
    view.to_grid('#', '.')
        .iter()
        .flat_map(|row| row.iter().copied().chain(std::iter::once('\n')))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HostContext;
    use plum8::{Plum8, HEIGHT, WIDTH};

    #[test]
    fn blank_frame() {
        let chip = Plum8::new(HostContext::new(Some(0)));
        let ascii = render_ascii(chip.frame());
        assert_eq!(ascii.lines().count(), HEIGHT);
        assert!(ascii.lines().all(|row| row == ".".repeat(WIDTH)));
        assert!(ascii.ends_with('\n'));
    }

    #[test]
    fn glyph_zero() {
        #[rustfmt::skip]
        let rom = [
            0xA0, 0x00, // I = glyph 0
            0xD0, 0x05, // draw 5 rows at V0, V0
        ];
        let mut chip = Plum8::new(HostContext::new(Some(0)));
        chip.load(&rom).unwrap();
        chip.step_n(2).unwrap();

        let ascii = render_ascii(chip.frame());
        let rows: Vec<&str> = ascii.lines().take(6).map(|row| &row[..5]).collect();
        assert_eq!(rows, ["####.", "#..#.", "#..#.", "#..#.", "####.", "....."]);
    }
}

use crate::grid::Grid;

/// Glyph drawn for wall cells.
pub const WALL_GLYPH: char = 'X';

/// Maps a water height in `[0, 1]` to its display glyph.
pub fn height_to_glyph(h: f32) -> char {
    if h > 0.80 {
        '@'
    } else if h > 0.65 {
        '#'
    } else if h > 0.50 {
        '*'
    } else if h > 0.35 {
        '='
    } else if h > 0.20 {
        '-'
    } else if h > 0.05 {
        '.'
    } else {
        ' '
    }
}

/// Renders the whole grid, one newline-terminated line per row.
pub fn render(grid: &Grid) -> String {
    let mut out = String::new();
    render_into(grid, &mut out);
    out
}

/// Like [`render`], reusing `out`'s allocation.
pub fn render_into(grid: &Grid, out: &mut String) {
    out.clear();
    out.reserve((grid.width() + 1) * grid.height());

    let heights = grid.heights();
    let walls = grid.obstacles();
    for (hs, ws) in heights
        .chunks_exact(grid.width())
        .zip(walls.chunks_exact(grid.width()))
    {
        for (&h, &wall) in hs.iter().zip(ws) {
            out.push(if wall { WALL_GLYPH } else { height_to_glyph(h) });
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::initialize;
    use crate::params::{Domain, SimParams};

    #[test]
    fn glyph_ladder() {
        let cases = [
            (0.9, '@'),
            (0.7, '#'),
            (0.55, '*'),
            (0.4, '='),
            (0.25, '-'),
            (0.1, '.'),
            (0.0, ' '),
        ];
        for (h, glyph) in cases {
            assert_eq!(height_to_glyph(h), glyph, "h = {h}");
        }
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(height_to_glyph(0.80), '#');
        assert_eq!(height_to_glyph(0.50), '=');
        assert_eq!(height_to_glyph(0.05), ' ');
        assert_eq!(height_to_glyph(1.0), '@');
        assert_eq!(height_to_glyph(f32::NAN), ' ');
    }

    #[test]
    fn frame_has_walls_and_water() {
        let mut g = Grid::allocate(Domain::new(6, 4).unwrap()).unwrap();
        initialize(
            &mut g,
            &SimParams {
                initial_level: 0.55,
                initial_tilt: 0.0,
                ..SimParams::default()
            },
        );
        let frame = render(&g);
        assert_eq!(frame, "XXXXXX\nX****X\nX**@*X\nXXXXXX\n");
    }

    #[test]
    fn render_into_reuses_buffer() {
        let mut g = Grid::allocate(Domain::new(3, 3).unwrap()).unwrap();
        initialize(&mut g, &SimParams::default());
        let mut buf = String::from("stale contents");
        render_into(&g, &mut buf);
        assert_eq!(buf.lines().count(), 3);
        assert!(buf.lines().all(|line| line.chars().count() == 3));
        assert!(!buf.contains("stale"));
    }
}

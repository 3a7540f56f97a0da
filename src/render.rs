use crate::types::PackingResult;

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// Draws the `bin_width x total_height` envelope with every placement
/// outlined and labelled. Overflowing placements widen the canvas so they
/// stay visible.
pub fn render_packing(result: &PackingResult) -> String {
    let width = result
        .placements
        .iter()
        .map(|p| p.right())
        .fold(result.bin_width, u64::max);
    let height = result.total_height;
    if width == 0 || height == 0 {
        return String::new();
    }

    let scale = f64::min(MAX_WIDTH / width as f64, MAX_HEIGHT / height as f64);
    let cells = |v: u64| (v as f64 * scale).round() as usize;
    let grid_w = cells(result.bin_width);
    let grid_h = cells(height);
    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; cells(width) + 1]; grid_h + 1];

    // Bin outline first
    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for p in &result.placements {
        let sx = cells(p.x);
        let sy = cells(p.y);
        let sw = cells(p.width);
        let sh = cells(p.height);

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh);

        let label: Vec<char> = p.item().to_string().chars().collect();
        if sw > 2 && sh > 1 {
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            let start_x = cx.saturating_sub(label.len() / 2);

            for (i, &ch) in label.iter().enumerate() {
                let x = start_x + i;
                if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
                    grid[cy][x] = ch;
                }
            }
        }
    }

    let mut out = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = match grid.first() {
        Some(row) => row.len(),
        None => return,
    };

    let mut mark = |r: usize, c: usize, edge: char| {
        if r >= rows || c >= cols {
            return;
        }
        let cell = &mut grid[r][c];
        *cell = match (*cell, edge) {
            ('+', _) => '+',
            ('|', '-') | ('-', '|') => '+',
            _ => edge,
        };
    };

    for c in x..=x + w {
        mark(y, c, '-');
        mark(y + h, c, '-');
    }
    for r in y..=y + h {
        mark(r, x, '|');
        mark(r, x + w, '|');
    }
    for (r, c) in [(y, x), (y, x + w), (y + h, x), (y + h, x + w)] {
        mark(r, c, '+');
    }
}

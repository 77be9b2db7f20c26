use crate::braille::BrailleCanvas;

/// Bresenham line between two pixel positions, endpoints included
pub fn draw_line(canvas: &mut BrailleCanvas, from: (i32, i32), to: (i32, i32)) {
    let (mut x, mut y) = from;
    let (x1, y1) = to;
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let step_x = if x < x1 { 1 } else { -1 };
    let step_y = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        canvas.set_pixel_signed(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += step_x;
        }
        if e2 <= dx {
            err += dx;
            y += step_y;
        }
    }
}

/// Filled disc, used for small markers and the selected country
pub fn draw_disc(canvas: &mut BrailleCanvas, center: (i32, i32), radius: i32) {
    let (cx, cy) = center;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Circle outline (midpoint algorithm), so coastlines stay readable under
/// large markers
pub fn draw_ring(canvas: &mut BrailleCanvas, center: (i32, i32), radius: i32) {
    let (cx, cy) = center;
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        for (px, py) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            canvas.set_pixel_signed(cx + px, cy + py);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

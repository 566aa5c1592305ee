use super::font;
use image::{Rgb, RgbImage};

/// Drawing primitives on top of an `RgbImage`.
/// Coordinates are signed so shapes may hang off the edges,
/// anything outside the image is clipped.
pub struct Canvas {
    img_buffer: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Canvas {
            img_buffer: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> i64 {
        self.img_buffer.width() as i64
    }

    pub fn height(&self) -> i64 {
        self.img_buffer.height() as i64
    }

    pub fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && x < self.width() && y < self.height() {
            self.img_buffer.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Inclusive on both corners.
    pub fn fill_rect(
        &mut self,
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
        color: Rgb<u8>,
    ) {
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                self.put(x, y, color);
            }
        }
    }

    pub fn stroke_rect(
        &mut self,
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
        color: Rgb<u8>,
    ) {
        self.line(x0, y0, x1, y0, 1, color);
        self.line(x1, y0, x1, y1, 1, color);
        self.line(x1, y1, x0, y1, 1, color);
        self.line(x0, y1, x0, y0, 1, color);
    }

    /// Bresenham, each step stamps a `thickness` wide square.
    pub fn line(
        &mut self,
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
        thickness: i64,
        color: Rgb<u8>,
    ) {
        let lo = -(thickness - 1) / 2;
        let hi = thickness / 2;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.fill_rect(x + lo, y + lo, x + hi, y + hi, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn fill_circle(
        &mut self,
        cx: i64,
        cy: i64,
        radius: i64,
        color: Rgb<u8>,
    ) {
        for y in -radius..=radius {
            for x in -radius..=radius {
                if x * x + y * y <= radius * radius {
                    self.put(cx + x, cy + y, color);
                }
            }
        }
    }

    /// Draw `text` with its top left corner at (x, y).
    pub fn text(
        &mut self,
        x: i64,
        y: i64,
        text: &str,
        scale: u32,
        color: Rgb<u8>,
    ) {
        let s = scale as i64;
        for (i, c) in text.chars().enumerate() {
            let glyph = font::glyph(c);
            let origin = x + (i as i64) * (font::GLYPH_ADVANCE as i64) * s;
            for gy in 0..font::GLYPH_HEIGHT {
                for gx in 0..font::GLYPH_WIDTH {
                    if font::is_set(&glyph, gx, gy) {
                        let px = origin + gx as i64 * s;
                        let py = y + gy as i64 * s;
                        self.fill_rect(px, py, px + s - 1, py + s - 1, color);
                    }
                }
            }
        }
    }

    pub fn text_centered(
        &mut self,
        cx: i64,
        y: i64,
        text: &str,
        scale: u32,
        color: Rgb<u8>,
    ) {
        let w = font::text_width(text, scale) as i64;
        self.text(cx - w / 2, y, text, scale, color);
    }

    pub fn text_right(
        &mut self,
        right: i64,
        y: i64,
        text: &str,
        scale: u32,
        color: Rgb<u8>,
    ) {
        let w = font::text_width(text, scale) as i64;
        self.text(right - w, y, text, scale, color);
    }

    pub fn into_image(self) -> RgbImage {
        self.img_buffer
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    #[test]
    fn clipping() {
        let mut canvas = Canvas::new(10, 10, WHITE);
        canvas.put(-1, 3, RED);
        canvas.put(10, 3, RED);
        canvas.fill_circle(0, 0, 3, RED);
        let img = canvas.into_image();
        assert_eq!(*img.get_pixel(0, 0), RED);
        assert_eq!(*img.get_pixel(9, 9), WHITE);
    }

    #[test]
    fn line_endpoints() {
        let mut canvas = Canvas::new(20, 20, WHITE);
        canvas.line(2, 3, 17, 11, 1, RED);
        let img = canvas.into_image();
        assert_eq!(*img.get_pixel(2, 3), RED);
        assert_eq!(*img.get_pixel(17, 11), RED);
        // One pixel per column for a shallow line
        let in_column =
            (0..20).filter(|&y| *img.get_pixel(10, y) == RED).count();
        assert_eq!(in_column, 1);
    }

    #[test]
    fn thick_line() {
        let mut canvas = Canvas::new(20, 20, WHITE);
        canvas.line(0, 10, 19, 10, 3, RED);
        let img = canvas.into_image();
        for y in 9..=11 {
            assert_eq!(*img.get_pixel(5, y), RED);
        }
        assert_eq!(*img.get_pixel(5, 8), WHITE);
        assert_eq!(*img.get_pixel(5, 12), WHITE);
    }

    #[test]
    fn text_pixels() {
        let mut canvas = Canvas::new(40, 20, WHITE);
        canvas.text(1, 1, "L", 2, RED);
        let img = canvas.into_image();
        // Top left of the L stem, scaled
        assert_eq!(*img.get_pixel(1, 1), RED);
        assert_eq!(*img.get_pixel(2, 2), RED);
        // Right end of the foot
        assert_eq!(*img.get_pixel(1 + 4 * 2, 1 + 6 * 2), RED);
        assert_eq!(*img.get_pixel(1 + 4 * 2, 1), WHITE);
    }
}

//! Debug overlay: pointer position and current wind.

use glam::Vec2;

use crate::canvas::Canvas;
use crate::color::Color;

const POINTER_COLOR: Color = Color::rgb(255.0, 255.0, 255.0);
const WIND_COLOR: Color = Color::rgb(200.0, 200.0, 200.0);

/// Text lines for the overlay, in drawing order: `(text, x, baseline, size, colour)`.
pub fn overlay_lines(pointer: Vec2, wind: Vec2) -> [(String, f32, f32, f32, Color); 3] {
    [
        (format!("{}:{}", pointer.x as i32, pointer.y as i32), 20.0, 30.0, 16.0, POINTER_COLOR),
        (format!("windX: {:.2}", wind.x), 20.0, 55.0, 14.0, WIND_COLOR),
        (format!("windY: {:.2}", wind.y), 20.0, 75.0, 14.0, WIND_COLOR),
    ]
}

pub fn draw_overlay<C: Canvas + ?Sized>(canvas: &mut C, pointer: Vec2, wind: Vec2) {
    for (text, x, y, size, color) in overlay_lines(pointer, wind) {
        canvas.draw_text(&text, x, y, size, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_text() {
        let lines = overlay_lines(Vec2::new(812.7, 33.2), Vec2::new(-0.456, 0.0));
        assert_eq!(lines[0].0, "812:33");
        assert_eq!(lines[1].0, "windX: -0.46");
        assert_eq!(lines[2].0, "windY: 0.00");
    }
}

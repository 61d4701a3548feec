/// ## Display surface
///
/// What the graphics and keyboard built-ins talk to. A windowed backend
/// lives outside this crate; `Headless` stands in when there is none.

pub trait Surface {
    fn is_key_pressed(&self, key: i64) -> bool;
    fn width(&self) -> i64;
    fn height(&self) -> i64;
    fn clear(&mut self);
    fn set_color(&mut self, r: i64, g: i64, b: i64);
    fn draw_rectangle(&mut self, x: i64, y: i64, w: i64, h: i64);
    fn draw_circle(&mut self, x: i64, y: i64, radius: i64);
    fn draw_line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64);
}

/// No keys held, fixed size, drawing discarded.
#[derive(Debug, Clone)]
pub struct Headless {
    width: i64,
    height: i64,
}

impl Headless {
    pub fn new(width: i64, height: i64) -> Headless {
        Headless { width, height }
    }
}

impl Default for Headless {
    fn default() -> Headless {
        Headless::new(800, 600)
    }
}

impl Surface for Headless {
    fn is_key_pressed(&self, _key: i64) -> bool {
        false
    }
    fn width(&self) -> i64 {
        self.width
    }
    fn height(&self) -> i64 {
        self.height
    }
    fn clear(&mut self) {}
    fn set_color(&mut self, _r: i64, _g: i64, _b: i64) {}
    fn draw_rectangle(&mut self, _x: i64, _y: i64, _w: i64, _h: i64) {}
    fn draw_circle(&mut self, _x: i64, _y: i64, _radius: i64) {}
    fn draw_line(&mut self, _x1: i64, _y1: i64, _x2: i64, _y2: i64) {}
}

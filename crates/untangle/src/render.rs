//! Drawing surface used by `Network::render`.
//!
//! The library owns no pixels; a `Canvas` implementation decides colors, stroke
//! widths and the output format.

use nalgebra::Vector2;

/// Diameter of a drawn node.
pub const NODE_DIAMETER: f64 = 20.0;

pub trait Canvas {
    fn line(&mut self, from: Vector2<f64>, to: Vector2<f64>);
    fn circle(&mut self, center: Vector2<f64>, diameter: f64);
}

/// Draw call captured by `Recorder`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Line(Vector2<f64>, Vector2<f64>),
    Circle(Vector2<f64>, f64),
}

/// Canvas that keeps the draw calls in order, for tests and offline export.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub shapes: Vec<Shape>,
}

impl Canvas for Recorder {
    fn line(&mut self, from: Vector2<f64>, to: Vector2<f64>) {
        self.shapes.push(Shape::Line(from, to));
    }

    fn circle(&mut self, center: Vector2<f64>, diameter: f64) {
        self.shapes.push(Shape::Circle(center, diameter));
    }
}

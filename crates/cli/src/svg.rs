//! SVG canvas for offline snapshots.

use std::fmt::Write;

use nalgebra::Vector2;
use untangle::Canvas;

const BACKGROUND: &str = "#000000";
const EDGE: &str = "#45dfe3";
const NODE_FILL: &str = "#45dfe3";
const NODE_STROKE: &str = "#f0f0f0";

pub struct SvgCanvas {
    width: f64,
    height: f64,
    body: String,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n\
             <rect width=\"100%\" height=\"100%\" fill=\"{BACKGROUND}\"/>\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

impl Canvas for SvgCanvas {
    fn line(&mut self, from: Vector2<f64>, to: Vector2<f64>) {
        let _ = writeln!(
            self.body,
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{EDGE}\" stroke-opacity=\"0.75\" stroke-width=\"0.3\"/>",
            from.x, from.y, to.x, to.y
        );
    }

    fn circle(&mut self, center: Vector2<f64>, diameter: f64) {
        let _ = writeln!(
            self.body,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{NODE_FILL}\" fill-opacity=\"0.25\" stroke=\"{NODE_STROKE}\" stroke-width=\"0.75\"/>",
            center.x,
            center.y,
            diameter / 2.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn shapes_in_call_order() {
        let mut c = SvgCanvas::new(100.0, 50.0);
        c.line(vector![0.0, 0.0], vector![10.0, 5.0]);
        c.circle(vector![10.0, 5.0], 20.0);
        let svg = c.finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("viewBox=\"0 0 100 50\""));
        let line = svg.find("<line").unwrap();
        let circle = svg.find("<circle").unwrap();
        assert!(line < circle);
        assert!(svg.contains("r=\"10.00\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}

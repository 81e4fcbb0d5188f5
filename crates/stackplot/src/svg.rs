use crate::stackplot::{Anchor, Arrow, Connector, Figure, FontConfig, Label, Mark, Rect, Rule};
use std::{fs, path::Path};

pub fn generate_string(figure: &Figure) -> String {
    let mut generator = Generator::new();
    generator.generate(figure);
    generator.buffer
}

pub fn render_from_string(svg_content: &str, path: &Path) -> Result<(), String> {
    fs::write(path, svg_content).map_err(|e| e.to_string())
}

struct Generator {
    buffer: String,
}

impl Generator {
    fn new() -> Self {
        Self {
            buffer: String::with_capacity(10_000),
        }
    }

    pub fn generate(&mut self, figure: &Figure) {
        self.start_svg(figure.width, figure.height);
        self.add_background();
        self.add_line(r#"<g style="fill-opacity:1.0; stroke:black; stroke-width:1;">"#);
        for mark in &figure.marks {
            match mark {
                Mark::Rect(rect) => self.add_rect(rect),
                Mark::Rule(rule) => self.add_rule(rule),
                Mark::Connector(connector) => self.add_connector(connector),
                Mark::Arrow(arrow) => self.add_arrow(arrow),
                Mark::Label(label) => self.add_label(label, &figure.font),
            }
        }
        self.add_line("</g>");
        self.end_svg();
    }

    fn add_line(&mut self, line: &str) {
        self.buffer.reserve(line.len() + 1);
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    fn add_rect(&mut self, rect: &Rect) {
        let pos = format!("x=\"{}\" y=\"{}\"", rect.x, rect.y);
        let dim = format!("width=\"{}\" height=\"{}\"", rect.width, rect.height);
        let style = format!(r#"fill="{}" stroke-width="0""#, rect.fill);
        let line = format!("<rect {} {} {} />", pos, dim, style);
        self.add_line(&line);
    }

    fn add_rule(&mut self, rule: &Rule) {
        let x1y1 = format!("x1=\"{}\" y1=\"{}\"", rule.from.0, rule.from.1);
        let x2y2 = format!("x2=\"{}\" y2=\"{}\"", rule.to.0, rule.to.1);
        let style = format!(
            r#"stroke="{}" stroke-width="{}" stroke-linecap="round""#,
            rule.color, rule.stroke_width
        );
        let line = format!("<line {} {} {} />", x1y1, x2y2, style);
        self.add_line(&line);
    }

    fn add_connector(&mut self, connector: &Connector) {
        let Some(((x0, y0), rest)) = connector.points.split_first() else {
            return;
        };
        let mut path = format!("M{} {}", x0, y0);
        for (x, y) in rest {
            path.push_str(&format!(" L{} {}", x, y));
        }
        let style = format!(
            r#"stroke="{}" stroke-width="{}" stroke-opacity="{}" stroke-linecap="butt" fill="none""#,
            connector.color, connector.stroke_width, connector.opacity
        );
        let line = format!(r#"<path d="{}" {} />"#, path, style);
        self.add_line(&line);
    }

    fn add_arrow(&mut self, arrow: &Arrow) {
        let Arrow {
            x,
            y,
            width,
            height,
            ..
        } = *arrow;
        let tip_x = x + width;
        let tip_y = y + height / 2.0;
        let head_x = x + width - height / 2.0;
        let height = height - 1.0;

        let points = if width > height / 2.0 {
            vec![
                (x, y + height / 4.0),
                (head_x, y + height / 4.0),
                (head_x, y),
                (tip_x, tip_y),
                (head_x, y + height),
                (head_x, y + 3.0 * height / 4.0),
                (x, y + 3.0 * height / 4.0),
            ]
        } else {
            // Too short for a shaft, draw the head only
            vec![(x, y), (x, y + height), (tip_x, tip_y)]
        };
        let points = points
            .iter()
            .map(|(px, py)| format!("{},{}", px, py))
            .collect::<Vec<_>>()
            .join(" ");
        let line = format!(
            r##"<polygon fill="{}" stroke="#000000" stroke-width="1" points="{}" />"##,
            arrow.fill, points
        );
        self.add_line(&line);
    }

    fn add_label(&mut self, label: &Label, font: &FontConfig) {
        let anchor = match label.anchor {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        };
        let font_style = format!(
            r#"font-family="{}" font-weight="{}" font-size="{}px""#,
            font.family, font.weight, label.size
        );
        let transform = if label.vertical {
            format!(r#" transform="rotate(90 {} {})""#, label.x, label.y)
        } else {
            String::new()
        };
        let line = format!(
            r#"<text x="{}" y="{}" {} fill="{}" stroke="none" text-anchor="{}"{}>{}</text>"#,
            label.x,
            label.y,
            font_style,
            label.color,
            anchor,
            transform,
            escape_text(&label.text)
        );
        self.add_line(&line);
    }

    fn start_svg(&mut self, width: f64, height: f64) {
        self.add_line(r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#);
        let line = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{}" height="{}">"#,
            width, height
        );
        self.add_line(&line);
    }

    fn end_svg(&mut self) {
        self.add_line("</svg>");
    }

    fn add_background(&mut self) {
        self.add_line(r#"<rect width="100%" height="100%" fill="white"/>"#);
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub type Color = String;

/// Horizontal alignment of a text label relative to its anchor point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
}

/// A straight stroke between two points
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub stroke_width: f64,
    pub color: Color,
}

/// An open polyline, used to tie a genome coordinate to its column
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub points: Vec<(f64, f64)>,
    pub stroke_width: f64,
    pub color: Color,
    pub opacity: f64,
}

/// A right-pointing block arrow (gene on the genome map)
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub text: String,
    pub color: Color,
    pub anchor: Anchor,
    /// Rotate 90 degrees clockwise around (x, y) so the text reads downwards
    pub vertical: bool,
}

impl Label {
    pub fn new(text: impl Into<String>, x: f64, y: f64, size: f64) -> Self {
        Self {
            x,
            y,
            size,
            text: text.into(),
            color: "#000000".to_string(),
            anchor: Anchor::Start,
            vertical: false,
        }
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }
}

/// Marks are drawn in insertion order
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Rect(Rect),
    Rule(Rule),
    Connector(Connector),
    Arrow(Arrow),
    Label(Label),
}

#[derive(Debug)]
pub struct FontConfig {
    pub family: String,
    pub weight: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            weight: "normal".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Figure {
    pub width: f64,
    pub height: f64,
    pub marks: Vec<Mark>,
    pub font: FontConfig,
}

impl Figure {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            marks: Vec::new(),
            font: FontConfig::default(),
        }
    }

    pub fn set_font_family(&mut self, font_family: &str) {
        self.font.family = font_family.to_owned();
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str) {
        self.push(Mark::Rect(Rect {
            x,
            y,
            width,
            height,
            fill: fill.to_string(),
        }));
    }

    pub fn rule(&mut self, from: (f64, f64), to: (f64, f64), stroke_width: f64) {
        self.push(Mark::Rule(Rule {
            from,
            to,
            stroke_width,
            color: "#000000".to_string(),
        }));
    }

    pub fn label(&mut self, label: Label) {
        self.push(Mark::Label(label));
    }
}

use crate::core::types::{PlotRect, ScreenPoint};
use crate::core::Viewport;
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, MarkerStyle, RenderContext, StrokeStyle, TextStyle};

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        points: Vec<ScreenPoint>,
        stroke: StrokeStyle,
    },
    Polygon {
        points: Vec<ScreenPoint>,
        fill: Color,
        stroke: StrokeStyle,
    },
    Rectangle {
        rect: PlotRect,
        fill: Color,
        stroke: StrokeStyle,
    },
    Markers {
        points: Vec<ScreenPoint>,
        style: MarkerStyle,
    },
    Text {
        position: ScreenPoint,
        text: String,
        style: TextStyle,
    },
    Clip(PlotRect),
    ResetClip,
}

impl DrawCommand {
    fn validate(&self) -> PlotResult<()> {
        match self {
            Self::Line { points, stroke } => {
                validate_points(points, "line")?;
                stroke.validate()
            }
            Self::Polygon {
                points,
                fill,
                stroke,
            } => {
                validate_points(points, "polygon")?;
                fill.validate()?;
                stroke.validate()
            }
            Self::Rectangle { rect, fill, stroke } => {
                validate_rect(*rect)?;
                fill.validate()?;
                stroke.validate()
            }
            Self::Markers { points, style } => {
                validate_points(points, "marker")?;
                style.validate()
            }
            Self::Text {
                position, style, ..
            } => {
                validate_points(std::slice::from_ref(position), "text")?;
                style.validate()
            }
            Self::Clip(rect) => validate_rect(*rect),
            Self::ResetClip => Ok(()),
        }
    }
}

fn validate_points(points: &[ScreenPoint], what: &str) -> PlotResult<()> {
    if points.iter().all(|point| point.is_defined()) {
        Ok(())
    } else {
        Err(PlotError::InvalidData(format!(
            "{what} coordinates must be finite"
        )))
    }
}

fn validate_rect(rect: PlotRect) -> PlotResult<()> {
    let finite = [rect.left, rect.top, rect.width, rect.height]
        .iter()
        .all(|value| value.is_finite());
    if finite && rect.width >= 0.0 && rect.height >= 0.0 {
        Ok(())
    } else {
        Err(PlotError::InvalidData(
            "rectangle must be finite with non-negative size".to_owned(),
        ))
    }
}

/// Backend-agnostic recording of one plot draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.viewport.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for command in &self.commands {
            command.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = (&[ScreenPoint], &StrokeStyle)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { points, stroke } => Some((points.as_slice(), stroke)),
            _ => None,
        })
    }

    pub fn polygons(&self) -> impl Iterator<Item = (&[ScreenPoint], Color)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Polygon { points, fill, .. } => Some((points.as_slice(), *fill)),
            _ => None,
        })
    }

    pub fn rectangles(&self) -> impl Iterator<Item = (PlotRect, Color)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Rectangle { rect, fill, .. } => Some((*rect, *fill)),
            _ => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = (&[ScreenPoint], &MarkerStyle)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Markers { points, style } => Some((points.as_slice(), style)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (ScreenPoint, &str)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { position, text, .. } => Some((*position, text.as_str())),
            _ => None,
        })
    }
}

impl RenderContext for RenderFrame {
    fn draw_line(&mut self, points: &[ScreenPoint], stroke: &StrokeStyle) {
        if points.len() < 2 || !stroke.is_visible() {
            return;
        }
        self.commands.push(DrawCommand::Line {
            points: points.to_vec(),
            stroke: stroke.clone(),
        });
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: &StrokeStyle) {
        if points.len() < 3 || (!fill.is_visible() && !stroke.is_visible()) {
            return;
        }
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            fill,
            stroke: stroke.clone(),
        });
    }

    fn draw_rectangle(&mut self, rect: PlotRect, fill: Color, stroke: &StrokeStyle) {
        if !fill.is_visible() && !stroke.is_visible() {
            return;
        }
        self.commands.push(DrawCommand::Rectangle {
            rect,
            fill,
            stroke: stroke.clone(),
        });
    }

    fn draw_markers(&mut self, points: &[ScreenPoint], style: &MarkerStyle) {
        if points.is_empty() || style.marker_type == crate::render::MarkerType::None {
            return;
        }
        self.commands.push(DrawCommand::Markers {
            points: points.to_vec(),
            style: style.clone(),
        });
    }

    fn draw_text(&mut self, position: ScreenPoint, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_owned(),
            style: style.clone(),
        });
    }

    fn set_clip(&mut self, rect: PlotRect) {
        self.commands.push(DrawCommand::Clip(rect));
    }

    fn reset_clip(&mut self) {
        self.commands.push(DrawCommand::ResetClip);
    }
}

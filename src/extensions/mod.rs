//! Decorations drawn with the series and observer hooks for the engine.

pub mod annotations;
pub mod plugins;

pub use annotations::{
    Annotation, AnnotationLayer, LineAnnotation, LineAnnotationType, RectangleAnnotation,
    TextAnnotation,
};
pub use plugins::{PlotContext, PlotEvent, PlotPlugin};

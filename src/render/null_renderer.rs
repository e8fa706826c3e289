use crate::error::PlotResult;
use crate::render::{DrawCommand, RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_command_count: usize,
    pub last_text_count: usize,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()> {
        frame.validate()?;
        self.last_command_count = frame.commands.len();
        self.last_text_count = frame
            .commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Text { .. }))
            .count();
        self.frames_rendered += 1;
        Ok(())
    }
}

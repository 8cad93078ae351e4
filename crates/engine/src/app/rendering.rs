use tracing::debug;

/// Drawing backend the simulation talks to. The core never draws by itself.
pub trait Renderer {
    fn clear(&mut self);
    fn draw_sprite(&mut self, id: &str, x: f32, y: f32);
    fn present(&mut self);
}

/// Headless backend: records nothing, only traces the calls.
#[derive(Debug, Default)]
pub struct NullRenderer {
    frames_presented: u64,
}

impl NullRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Renderer for NullRenderer {
    fn clear(&mut self) {
        debug!("renderer_clear");
    }

    fn draw_sprite(&mut self, id: &str, x: f32, y: f32) {
        debug!(sprite = id, x, y, "renderer_draw_sprite");
    }

    fn present(&mut self) {
        self.frames_presented = self.frames_presented.saturating_add(1);
        debug!(frame = self.frames_presented, "renderer_present");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_renderer_counts_presented_frames() {
        let mut renderer = NullRenderer::new();
        renderer.clear();
        renderer.draw_sprite("player", 1.0, 2.0);
        renderer.present();
        renderer.present();

        assert_eq!(renderer.frames_presented(), 2);
    }
}

use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use trigon_engine::core::{App, AppControl, FrameCtx};
use trigon_engine::paint::Color;
use trigon_engine::render::{TriangleRenderer, TriangleSource};

/// Windowed driver: one triangle, redrawn only when the window asks.
pub struct TriangleApp {
    renderer: TriangleRenderer,
    clear: Color,
    frames: u64,
}

impl TriangleApp {
    pub fn new(source: TriangleSource, clear: Color) -> Self {
        Self {
            renderer: TriangleRenderer::new(source),
            clear,
            frames: 0,
        }
    }
}

impl App for TriangleApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let clear = self.clear;
        let renderer = &mut self.renderer;
        let control = ctx.render(|rctx, target| renderer.render(rctx, target, clear));

        self.frames += 1;
        let (w, h) = ctx.window.physical_size();
        log::debug!("frame {} drawn at {w}x{h}", self.frames);

        control
    }
}

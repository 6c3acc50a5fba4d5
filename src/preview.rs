//! On-screen preview of the finished canvas.
//!
//! A software-rendered window the exact size of the canvas: the packed
//! ARGB32 pixels are copied straight into a softbuffer surface. The event
//! loop blocks until the window is closed.

use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{Context, Result};
use softbuffer::{Context as SoftContext, Surface};
use tracing::error;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::raster::Raster;

/// Display the canvas until the window is closed.
pub fn show(canvas: &Raster) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialise the windowing subsystem")?;
    let mut app = PreviewApp::new(canvas);
    event_loop.run_app(&mut app)?;
    Ok(())
}

type WindowHandle = Arc<Window>;

struct PreviewApp<'a> {
    canvas: &'a Raster,
    window: Option<WindowHandle>,
    context: Option<SoftContext<WindowHandle>>,
    surface: Option<Surface<WindowHandle, WindowHandle>>,
    surface_size: PhysicalSize<u32>,
}

impl<'a> PreviewApp<'a> {
    fn new(canvas: &'a Raster) -> Self {
        Self {
            canvas,
            window: None,
            context: None,
            surface: None,
            surface_size: PhysicalSize::new(canvas.width(), canvas.height()),
        }
    }

    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("text-to-stereogram")
            .with_inner_size(PhysicalSize::new(self.canvas.width(), self.canvas.height()))
            .with_resizable(false);
        let window = event_loop
            .create_window(attrs)
            .expect("failed to create window");
        let window = WindowHandle::new(window);

        let context =
            SoftContext::new(window.clone()).expect("failed to create softbuffer context");
        let surface =
            Surface::new(&context, window.clone()).expect("failed to create softbuffer surface");

        self.context = Some(context);
        self.surface = Some(surface);
        self.handle_resize(window.inner_size());
        window.request_redraw();
        self.window = Some(window);
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(surface) = self.surface.as_mut() {
            if let (Some(width), Some(height)) = (
                NonZeroU32::new(size.width.max(1)),
                NonZeroU32::new(size.height.max(1)),
            ) {
                let _ = surface.resize(width, height);
                self.surface_size = PhysicalSize::new(size.width.max(1), size.height.max(1));
            }
        }
    }

    fn present(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        match surface.buffer_mut() {
            Ok(mut buffer) => {
                let width = self.surface_size.width.min(self.canvas.width());
                let rows = self.surface_size.height.min(self.canvas.height());
                for y in 0..rows {
                    let dst_start = (y * self.surface_size.width) as usize;
                    buffer[dst_start..dst_start + width as usize]
                        .copy_from_slice(&self.canvas.row(y)[..width as usize]);
                }
                if let Err(err) = buffer.present() {
                    error!("softbuffer present error: {err:?}");
                }
            }
            Err(err) => {
                error!("softbuffer buffer access error: {err:?}");
            }
        }
    }
}

impl ApplicationHandler for PreviewApp<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_window(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().map(|window| window.id()) != Some(window_id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.handle_resize(size);
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.present(),
            _ => {}
        }
    }
}

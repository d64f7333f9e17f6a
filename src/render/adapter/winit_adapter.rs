// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Windowed backend: winit for window management, glutin for the OpenGL
//! context, glow for the calls. Presentation is a single textured quad
//! carrying the offscreen surface (see `gl::GlBlit`).
//!
//! winit only hands out an `ActiveEventLoop` inside its callbacks, so the
//! window and GL context are created by a bootstrap handler during the
//! first event-loop pump. After that the loop is pumped once per canvas
//! update; the canvas API is poll-based and the caller drives the frame.

use crate::config::{CanvasConfig, WindowFlags};
use crate::error::CanvasError;
use crate::event::{CanvasEvent, MouseButton};
use crate::render::adapter::{gl::GlBlit, Adapter, AdapterBase};
use crate::render::surface::PixelBuffer;
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version},
    display::GetGlDisplay,
    prelude::*,
    surface::{Surface as GlutinSurface, SurfaceAttributesBuilder, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use log::info;
use raw_window_handle::HasWindowHandle;
use std::any::Any;
use std::num::NonZeroU32;
use std::time::Duration;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::EventLoopExtPumpEvents,
    window::{Window, WindowId},
};

struct GlParts {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: GlutinSurface<WindowSurface>,
    gl: glow::Context,
    blit: GlBlit,
}

pub struct WinitAdapter {
    pub base: AdapterBase,
    event_loop: Option<EventLoop<()>>,
    parts: Option<GlParts>,
}

impl WinitAdapter {
    pub fn new() -> Self {
        Self {
            base: AdapterBase::new(),
            event_loop: None,
            parts: None,
        }
    }
}

impl Default for WinitAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for WinitAdapter {
    fn init(&mut self, conf: &CanvasConfig) -> Result<(), CanvasError> {
        info!("initializing winit adapter...");
        self.base.title = conf.title.clone();
        self.base.window_w = conf.window_width;
        self.base.window_h = conf.window_height;
        self.base.res_w = conf.resolution_width;
        self.base.res_h = conf.resolution_height;

        let mut event_loop =
            EventLoop::new().map_err(|e| CanvasError::Backend(e.to_string()))?;

        let mut boot = Bootstrap {
            conf: conf.clone(),
            result: None,
        };
        // the first pump delivers `resumed`, where the window is created;
        // allow a few rounds for platforms that stagger startup events
        for _ in 0..8 {
            let _ = event_loop.pump_app_events(Some(Duration::ZERO), &mut boot);
            if boot.result.is_some() {
                break;
            }
        }
        match boot.result.take() {
            Some(Ok(parts)) => {
                self.parts = Some(parts);
                self.event_loop = Some(event_loop);
                info!("winit window & OpenGL context initialized");
                Ok(())
            }
            Some(Err(e)) => Err(e),
            None => Err(CanvasError::Backend(
                "event loop never resumed, no window created".to_string(),
            )),
        }
    }

    fn get_base(&mut self) -> &mut AdapterBase {
        &mut self.base
    }

    fn poll_events(&mut self, out: &mut Vec<CanvasEvent>) {
        let start = out.len();
        if let Some(event_loop) = self.event_loop.as_mut() {
            let mut sink = EventSink { out };
            let _ = event_loop.pump_app_events(Some(Duration::ZERO), &mut sink);
        }
        for ev in &out[start..] {
            if let CanvasEvent::Resized { width, height } = ev {
                self.base.window_w = *width;
                self.base.window_h = *height;
            }
        }
    }

    fn present(&mut self, frame: &PixelBuffer) -> Result<(), CanvasError> {
        let parts = self
            .parts
            .as_ref()
            .ok_or_else(|| CanvasError::Backend("adapter not initialized".to_string()))?;

        let size = parts.window.inner_size();
        parts.gl_surface.resize(
            &parts.gl_context,
            NonZeroU32::new(size.width.max(1)).unwrap(),
            NonZeroU32::new(size.height.max(1)).unwrap(),
        );
        parts
            .blit
            .draw(&parts.gl, frame.data(), size.width as i32, size.height as i32);
        parts
            .gl_surface
            .swap_buffers(&parts.gl_context)
            .map_err(|e| CanvasError::Backend(e.to_string()))?;
        parts.window.request_redraw();
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.base.title = title.to_string();
        if let Some(parts) = &self.parts {
            parts.window.set_title(title);
        }
    }

    fn set_window_size(&mut self, w: u32, h: u32) {
        self.base.window_w = w;
        self.base.window_h = h;
        if let Some(parts) = &self.parts {
            let _ = parts.window.request_inner_size(LogicalSize::new(w, h));
        }
    }

    fn window_size(&self) -> (u32, u32) {
        (self.base.window_w, self.base.window_h)
    }

    fn screen_size(&self) -> (u32, u32) {
        match self.parts.as_ref().and_then(|p| p.window.current_monitor()) {
            Some(monitor) => {
                let size = monitor.size();
                (size.width, size.height)
            }
            None => (0, 0),
        }
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}

impl Drop for WinitAdapter {
    fn drop(&mut self) {
        if let Some(parts) = &self.parts {
            parts.blit.cleanup(&parts.gl);
        }
    }
}

/// Creates the window and the whole GL stack on `resumed`.
struct Bootstrap {
    conf: CanvasConfig,
    result: Option<Result<GlParts, CanvasError>>,
}

impl ApplicationHandler for Bootstrap {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.result.is_none() {
            self.result = Some(create_gl_parts(event_loop, &self.conf));
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        _event: WindowEvent,
    ) {
    }
}

fn create_gl_parts(
    event_loop: &ActiveEventLoop,
    conf: &CanvasConfig,
) -> Result<GlParts, CanvasError> {
    let window_size = LogicalSize::new(conf.window_width, conf.window_height);
    let template = ConfigTemplateBuilder::new()
        .with_alpha_size(8)
        .with_transparency(false);

    let display_builder = DisplayBuilder::new().with_window_attributes(Some(
        Window::default_attributes()
            .with_title(&conf.title)
            .with_inner_size(window_size)
            .with_decorations(conf.flags.contains(WindowFlags::DECORATED))
            .with_resizable(conf.flags.contains(WindowFlags::RESIZABLE)),
    ));

    let (window, gl_config) = display_builder
        .build(event_loop, template, |configs| {
            configs
                .reduce(|accum, config| {
                    if config.num_samples() > accum.num_samples() {
                        config
                    } else {
                        accum
                    }
                })
                .unwrap()
        })
        .map_err(|e| CanvasError::Backend(e.to_string()))?;

    let window = window.ok_or_else(|| CanvasError::Backend("no window created".to_string()))?;

    let gl_display = gl_config.display();
    let raw_window_handle = window
        .window_handle()
        .map_err(|e| CanvasError::Backend(e.to_string()))?
        .as_raw();

    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .build(Some(raw_window_handle));

    let not_current_gl_context = unsafe {
        gl_display
            .create_context(&gl_config, &context_attributes)
            .map_err(|e| CanvasError::Backend(e.to_string()))?
    };

    let size = window.inner_size();
    let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_window_handle,
        NonZeroU32::new(size.width.max(1)).unwrap(),
        NonZeroU32::new(size.height.max(1)).unwrap(),
    );

    let gl_surface = unsafe {
        gl_display
            .create_window_surface(&gl_config, &attrs)
            .map_err(|e| CanvasError::Backend(e.to_string()))?
    };

    let gl_context = not_current_gl_context
        .make_current(&gl_surface)
        .map_err(|e| CanvasError::Backend(e.to_string()))?;

    let gl = unsafe {
        glow::Context::from_loader_function(|s| {
            let s = std::ffi::CString::new(s)
                .expect("failed to construct C string from string for gl proc address");
            gl_display.get_proc_address(s.as_c_str())
        })
    };

    let blit = GlBlit::new(
        &gl,
        "#version 330 core",
        conf.resolution_width,
        conf.resolution_height,
        conf.flags.contains(WindowFlags::LINEAR_PRESENT),
    )?;

    Ok(GlParts {
        window,
        gl_context,
        gl_surface,
        gl,
        blit,
    })
}

struct EventSink<'a> {
    out: &'a mut Vec<CanvasEvent>,
}

impl ApplicationHandler for EventSink<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(ev) = canvas_event_from_winit(&event) {
            self.out.push(ev);
        }
    }
}

/// Convert a winit window event into the unified event type.
pub fn canvas_event_from_winit(event: &WindowEvent) -> Option<CanvasEvent> {
    match event {
        WindowEvent::CloseRequested => Some(CanvasEvent::CloseRequested),
        WindowEvent::CursorMoved { position, .. } => Some(CanvasEvent::CursorMoved {
            x: position.x,
            y: position.y,
        }),
        WindowEvent::MouseInput { state, button, .. } => {
            let button = match button {
                winit::event::MouseButton::Left => MouseButton::Left,
                winit::event::MouseButton::Right => MouseButton::Right,
                winit::event::MouseButton::Middle => MouseButton::Middle,
                _ => return None,
            };
            Some(match state {
                ElementState::Pressed => CanvasEvent::MouseDown(button),
                ElementState::Released => CanvasEvent::MouseUp(button),
            })
        }
        WindowEvent::Resized(size) => Some(CanvasEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        _ => None,
    }
}

// src/renderer/egl.rs

//! EGL display/surface/context triple bound to the Wayland window.
//!
//! The triple is created once and only `swap_buffers` is called per frame
//! afterwards. Teardown happens in `Drop`, after the GL objects that depend
//! on the context are gone.

use anyhow::{anyhow, Context as _, Result};
use khronos_egl as egl;
use log::{debug, info, warn};
use std::ffi::c_void;

/// Pixel-format requirements: window-renderable, ES2-class, at least eight
/// bits per color channel.
const CONFIG_ATTRIBUTES: [egl::Int; 11] = [
    egl::SURFACE_TYPE,
    egl::WINDOW_BIT,
    egl::RENDERABLE_TYPE,
    egl::OPENGL_ES2_BIT,
    egl::RED_SIZE,
    8,
    egl::GREEN_SIZE,
    8,
    egl::BLUE_SIZE,
    8,
    egl::NONE,
];

const CONTEXT_ATTRIBUTES: [egl::Int; 3] = [egl::CONTEXT_CLIENT_VERSION, 2, egl::NONE];

pub struct EglContext {
    egl: egl::Instance<egl::Static>,
    display: egl::Display,
    context: egl::Context,
    surface: egl::Surface,
}

impl EglContext {
    /// Builds the triple against the native Wayland display and window and
    /// makes it current. Each sub-step failure carries its own context so
    /// the fatal log line names the step that refused.
    pub fn new(native_display: *mut c_void, native_window: *mut c_void) -> Result<Self> {
        let egl = egl::Instance::new(egl::Static);

        // SAFETY: the pointers come from a live Wayland connection and
        // wl_egl_window owned by the caller, which outlive this context.
        let display = unsafe { egl.get_display(native_display as egl::NativeDisplayType) }
            .ok_or_else(|| anyhow!("no EGL display available for the Wayland connection"))?;

        let (major, minor) = egl
            .initialize(display)
            .context("eglInitialize failed")?;
        debug!("EGL {}.{} initialized.", major, minor);

        let config = egl
            .choose_first_config(display, &CONFIG_ATTRIBUTES)
            .context("eglChooseConfig failed")?
            .ok_or_else(|| anyhow!("no EGL configuration matches RGB8/window/ES2"))?;

        // SAFETY: native_window is a valid wl_egl_window for the lifetime of
        // this context (see above).
        let surface = unsafe {
            egl.create_window_surface(display, config, native_window as egl::NativeWindowType, None)
        }
        .context("eglCreateWindowSurface failed")?;

        let context = egl
            .create_context(display, config, None, &CONTEXT_ATTRIBUTES)
            .context("eglCreateContext failed")?;

        egl.make_current(display, Some(surface), Some(surface), Some(context))
            .context("eglMakeCurrent failed")?;

        info!("EGL context created and made current.");
        Ok(EglContext {
            egl,
            display,
            context,
            surface,
        })
    }

    /// Presents the back buffer. On Wayland this also commits the surface.
    pub fn swap_buffers(&self) -> Result<()> {
        self.egl
            .swap_buffers(self.display, self.surface)
            .context("eglSwapBuffers failed")
    }

    /// GL symbol loader for `glow`.
    pub fn get_proc_address(&self, name: &str) -> *const c_void {
        match self.egl.get_proc_address(name) {
            Some(f) => f as *const c_void,
            None => std::ptr::null(),
        }
    }
}

impl Drop for EglContext {
    fn drop(&mut self) {
        if let Err(e) = self.egl.make_current(self.display, None, None, None) {
            warn!("Failed to release the EGL context: {}", e);
        }
        if let Err(e) = self.egl.destroy_surface(self.display, self.surface) {
            warn!("Failed to destroy the EGL surface: {}", e);
        }
        if let Err(e) = self.egl.destroy_context(self.display, self.context) {
            warn!("Failed to destroy the EGL context: {}", e);
        }
        if let Err(e) = self.egl.terminate(self.display) {
            warn!("Failed to terminate the EGL display: {}", e);
        }
    }
}

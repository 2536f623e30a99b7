// src/platform/wayland/state.rs

//! Protocol-side state for the Wayland backend: the bound globals, the
//! window objects, and the queue of translated `WindowEvent`s.

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::ffi::c_void;

use wayland_client::{
    protocol::{wl_compositor, wl_keyboard, wl_region, wl_seat, wl_surface},
    Proxy, QueueHandle,
};
use wayland_egl::WlEglSurface;
use wayland_protocols::xdg::shell::client::{xdg_surface, xdg_toplevel, xdg_wm_base};
use xkbcommon::xkb;

use crate::config::WindowConfig;
use crate::keys::Modifiers;
use crate::platform::WindowEvent;

/// Everything the Wayland event queue dispatches into.
///
/// Owned by `WaylandDriver`; the `Dispatch` implementations in
/// `super::event` mutate it and push translated events onto `pending`,
/// which the driver drains after each dispatch.
pub struct WaylandState {
    qh: QueueHandle<WaylandState>,

    // Globals discovered through the registry.
    pub(super) compositor: Option<wl_compositor::WlCompositor>,
    pub(super) wm_base: Option<xdg_wm_base::XdgWmBase>,
    pub(super) seat: Option<wl_seat::WlSeat>,

    // Window objects, created once by `create_window`.
    surface: Option<wl_surface::WlSurface>,
    xdg_surface: Option<xdg_surface::XdgSurface>,
    toplevel: Option<xdg_toplevel::XdgToplevel>,
    opaque_region: Option<wl_region::WlRegion>,
    egl_window: Option<WlEglSurface>,
    pub(super) configured: bool,

    // Last-applied surface size in pixels.
    width: u32,
    height: u32,

    // Input.
    pub(super) keyboard: Option<wl_keyboard::WlKeyboard>,
    pub(super) xkb_context: xkb::Context,
    pub(super) xkb_state: Option<xkb::State>,
    pub(super) modifiers: Modifiers,

    // Translated events awaiting the driver's drain.
    pending: Vec<WindowEvent>,
}

impl WaylandState {
    pub fn new(qh: QueueHandle<WaylandState>, width: u32, height: u32) -> Self {
        WaylandState {
            qh,
            compositor: None,
            wm_base: None,
            seat: None,
            surface: None,
            xdg_surface: None,
            toplevel: None,
            opaque_region: None,
            egl_window: None,
            configured: false,
            width,
            height,
            keyboard: None,
            xkb_context: xkb::Context::new(xkb::CONTEXT_NO_FLAGS),
            xkb_state: None,
            modifiers: Modifiers::empty(),
            pending: Vec::new(),
        }
    }

    /// Verifies that the three required globals were advertised during the
    /// discovery round-trip. There is no retry: a compositor that does not
    /// offer all of them cannot host this client.
    pub fn require_globals(&self) -> Result<()> {
        if self.compositor.is_none() {
            return Err(anyhow!("wl_compositor not advertised by the compositor"));
        }
        if self.wm_base.is_none() {
            return Err(anyhow!("xdg_wm_base not advertised by the compositor"));
        }
        if self.seat.is_none() {
            return Err(anyhow!("wl_seat not advertised by the compositor"));
        }
        Ok(())
    }

    /// Creates the surface, gives it the toplevel role, and wraps it in an
    /// EGL window of the requested size.
    ///
    /// Called exactly once; the window is never recreated.
    pub fn create_window(&mut self, config: &WindowConfig) -> Result<()> {
        debug_assert!(self.surface.is_none(), "window created twice");

        let compositor = self
            .compositor
            .as_ref()
            .ok_or_else(|| anyhow!("cannot create a window without wl_compositor"))?;
        let wm_base = self
            .wm_base
            .as_ref()
            .ok_or_else(|| anyhow!("cannot create a window without xdg_wm_base"))?;

        let surface = compositor.create_surface(&self.qh, ());
        let xdg_surface = wm_base.get_xdg_surface(&surface, &self.qh, ());
        let toplevel = xdg_surface.get_toplevel(&self.qh, ());

        toplevel.set_title(config.title.clone());
        toplevel.set_app_id(config.app_id.clone());

        // The scene is fully opaque; telling the compositor lets it skip
        // blending the window.
        let region = compositor.create_region(&self.qh, ());
        region.add(0, 0, config.width as i32, config.height as i32);
        surface.set_opaque_region(Some(&region));

        surface.commit();

        let egl_window = WlEglSurface::new(surface.id(), config.width as i32, config.height as i32)
            .context("failed to create the wl_egl_window for the surface")?;

        info!(
            "Wayland window created ({}x{}, title \"{}\")",
            config.width, config.height, config.title
        );

        self.surface = Some(surface);
        self.xdg_surface = Some(xdg_surface);
        self.toplevel = Some(toplevel);
        self.opaque_region = Some(region);
        self.egl_window = Some(egl_window);
        self.width = config.width;
        self.height = config.height;
        Ok(())
    }

    /// Applies a toplevel configure event.
    ///
    /// Zero-sized and repeated configures are no-ops; a real change resizes
    /// the EGL window in place, commits the surface, and reports a
    /// `Resized` event.
    pub fn apply_configure(&mut self, width: i32, height: i32) {
        let Some((width, height)) = resize_decision((self.width, self.height), (width, height))
        else {
            return;
        };

        if let Some(egl_window) = &self.egl_window {
            egl_window.resize(width as i32, height as i32, 0, 0);
        }
        if let Some(surface) = &self.surface {
            surface.commit();
        }

        debug!(
            "Surface resized {}x{} -> {}x{}",
            self.width, self.height, width, height
        );
        self.width = width;
        self.height = height;
        self.push_event(WindowEvent::Resized { width, height });
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw `wl_egl_window` pointer for EGL surface creation.
    ///
    /// Valid for as long as this state (and thus the `WlEglSurface`) lives.
    pub fn egl_window_ptr(&self) -> Result<*mut c_void> {
        self.egl_window
            .as_ref()
            .map(|w| w.ptr() as *mut c_void)
            .ok_or_else(|| anyhow!("egl_window_ptr called before the window exists"))
    }

    pub(super) fn push_event(&mut self, event: WindowEvent) {
        self.pending.push(event);
    }

    pub fn take_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Destroys the window objects in role-before-surface order. Idempotent.
    pub fn destroy_window(&mut self) {
        // Drop the EGL window wrapper before the surface it points at.
        self.egl_window.take();
        if let Some(toplevel) = self.toplevel.take() {
            toplevel.destroy();
        }
        if let Some(xdg_surface) = self.xdg_surface.take() {
            xdg_surface.destroy();
        }
        if let Some(region) = self.opaque_region.take() {
            region.destroy();
        }
        if let Some(surface) = self.surface.take() {
            surface.destroy();
        }
        // The keyboard was bound at version 1, which has no release request;
        // dropping the proxy is all a v1 client can do.
        self.keyboard.take();
    }
}

/// Decides whether a configure event becomes a resize.
///
/// A zero dimension means the compositor is leaving the size up to us, and a
/// proposal equal to the last-applied size has nothing to do; a change in
/// either dimension is applied.
fn resize_decision(current: (u32, u32), proposed: (i32, i32)) -> Option<(u32, u32)> {
    let (width, height) = proposed;
    if width <= 0 || height <= 0 {
        return None;
    }
    let (width, height) = (width as u32, height as u32);
    if width == current.0 && height == current.1 {
        return None;
    }
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn zero_sized_configures_are_ignored() {
        assert_eq!(resize_decision((1920, 1080), (0, 0)), None);
        assert_eq!(resize_decision((1920, 1080), (0, 720)), None);
        assert_eq!(resize_decision((1920, 1080), (1280, 0)), None);
    }

    #[test_log::test]
    fn repeated_configures_are_deduplicated() {
        assert_eq!(resize_decision((1920, 1080), (1920, 1080)), None);
    }

    #[test_log::test]
    fn a_change_in_both_dimensions_resizes() {
        assert_eq!(resize_decision((1920, 1080), (1280, 720)), Some((1280, 720)));
    }

    #[test_log::test]
    fn a_change_in_a_single_dimension_resizes() {
        // Width-only and height-only changes must not be dropped.
        assert_eq!(resize_decision((1920, 1080), (1280, 1080)), Some((1280, 1080)));
        assert_eq!(resize_decision((1920, 1080), (1920, 720)), Some((1920, 720)));
    }

    #[test_log::test]
    fn negative_dimensions_are_ignored() {
        assert_eq!(resize_decision((1920, 1080), (-1, 600)), None);
    }
}

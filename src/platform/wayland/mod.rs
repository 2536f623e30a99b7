// src/platform/wayland/mod.rs

//! Wayland backend driver.
//!
//! This module owns the connection to the compositor and drives the event
//! queue. Discovery happens in `new` with a single registry round-trip.
//! Per-frame event draining flushes, polls the connection fd with a zero
//! timeout, reads if data is pending (cancelling otherwise), and dispatches,
//! so the main loop's liveness check is never stalled behind an empty
//! socket.

use anyhow::{anyhow, Context as _, Result};
use log::{debug, error, info, warn};
use std::ffi::c_void;
use std::os::unix::io::AsRawFd;

use wayland_client::{Connection, EventQueue};

use crate::config::Config;
use crate::platform::{Driver, WindowEvent};

pub mod event;
pub mod state;

use state::WaylandState;

pub struct WaylandDriver {
    conn: Connection,
    event_queue: EventQueue<WaylandState>,
    state: WaylandState,
    cleaned_up: bool,
}

impl WaylandDriver {
    /// Connects to the compositor, binds the required globals, and creates
    /// the toplevel window.
    ///
    /// Any failure here is fatal to the process: there is no retry or
    /// degraded mode for a demo whose whole job is to put this window on
    /// screen.
    pub fn new(config: &Config) -> Result<Self> {
        let conn = Connection::connect_to_env()
            .context("failed to connect to the Wayland display (is WAYLAND_DISPLAY set?)")?;
        info!("Connected to the Wayland display.");

        let mut event_queue = conn.new_event_queue();
        let qh = event_queue.handle();

        let mut state = WaylandState::new(qh.clone(), config.window.width, config.window.height);

        // One discovery round-trip; the registry dispatch binds the globals
        // as they are advertised.
        let _registry = conn.display().get_registry(&qh, ());
        event_queue
            .roundtrip(&mut state)
            .context("Wayland registry round-trip failed")?;
        state.require_globals()?;
        info!("Bound wl_compositor, xdg_wm_base and wl_seat.");

        state.create_window(&config.window)?;

        // Flush the role assignment and pick up the compositor's first
        // configure (acked in dispatch) before rendering starts.
        event_queue
            .roundtrip(&mut state)
            .context("Wayland round-trip after window creation failed")?;
        if !state.configured {
            debug!("No configure event yet; proceeding with the requested size.");
        }

        Ok(WaylandDriver {
            conn,
            event_queue,
            state,
            cleaned_up: false,
        })
    }

    /// Raw `wl_display` pointer for EGL display acquisition.
    pub fn native_display_ptr(&self) -> *mut c_void {
        self.conn.backend().display_ptr() as *mut c_void
    }

    /// Raw `wl_egl_window` pointer for EGL surface creation.
    pub fn native_window_ptr(&self) -> Result<*mut c_void> {
        self.state.egl_window_ptr()
    }
}

impl Driver for WaylandDriver {
    fn process_events(&mut self) -> Result<Vec<WindowEvent>> {
        // Flush our own requests first so the compositor can answer them.
        self.conn
            .flush()
            .context("failed to flush the Wayland connection")?;

        // `prepare_read` returns None when events are already queued; in
        // that case dispatching below is all that is needed.
        if let Some(guard) = self.conn.prepare_read() {
            let mut poll_fd = libc::pollfd {
                fd: self.conn.backend().poll_fd().as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            };
            // Zero timeout: the drain must never block the loop.
            let ret = unsafe { libc::poll(&mut poll_fd, 1, 0) };
            if ret < 0 {
                let err = std::io::Error::last_os_error();
                if err.kind() != std::io::ErrorKind::Interrupted {
                    return Err(anyhow!("poll on the Wayland socket failed: {}", err));
                }
                // Interrupted: dropping the guard cancels the read.
            } else if ret > 0 && poll_fd.revents & libc::POLLIN != 0 {
                guard
                    .read()
                    .context("failed to read events from the Wayland socket")?;
            }
            // Guard dropped here cancels the read if we did not perform it.
        }

        self.event_queue
            .dispatch_pending(&mut self.state)
            .context("failed to dispatch Wayland events")?;

        Ok(self.state.take_events())
    }

    fn surface_size(&self) -> (u32, u32) {
        self.state.surface_size()
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        self.cleaned_up = true;
        self.state.destroy_window();
        if let Err(e) = self.conn.flush() {
            warn!("Failed to flush destruction requests: {}", e);
        }
        info!("Wayland window destroyed; connection closes on drop.");
        Ok(())
    }
}

impl Drop for WaylandDriver {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            error!("Error during Wayland driver cleanup: {}", e);
        }
    }
}

// src/platform/mod.rs

//! Defines the `Driver` trait for windowing backends and the common
//! `WindowEvent` type the application loop consumes.

use crate::keys::{KeySymbol, Modifiers};
use anyhow::Result;

#[cfg(test)]
pub mod mock;
pub mod wayland;

/// Events originating from the windowing system.
///
/// Backends translate their native notifications into this closed set; the
/// application handles them in one place instead of registering a callback
/// per notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The compositor applied a new surface size. Emitted only for real
    /// changes: zero-sized and repeated configures are filtered out by the
    /// backend before they get here.
    Resized { width: u32, height: u32 },
    /// The user invoked the window's close control.
    CloseRequested,
    /// A key was pressed while the surface had keyboard focus.
    Key {
        symbol: KeySymbol,
        modifiers: Modifiers,
    },
}

/// Defines the interface between the application loop and a windowing
/// backend.
///
/// A `Driver` owns the display connection and the window, translates native
/// events into `WindowEvent`s, and applies surface-level effects (such as
/// resizing the drawable) itself before reporting them.
pub trait Driver {
    /// Drains and translates any pending native events.
    ///
    /// Must not block: an empty queue returns an empty vector so the caller
    /// can go on to draw the next frame.
    fn process_events(&mut self) -> Result<Vec<WindowEvent>>;

    /// Current drawable size in pixels.
    fn surface_size(&self) -> (u32, u32);

    /// Releases windowing resources. Idempotent; called once before exit.
    fn cleanup(&mut self) -> Result<()>;
}

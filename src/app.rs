// src/app.rs

//! Application context and event-cycle logic.
//!
//! `App` owns the pieces of state the main loop cares about — the liveness
//! flag and the quit keybinding — and applies each batch of window events to
//! them. It is written against the `Driver` trait so the event handling can
//! be exercised in tests with a scripted backend.

use crate::config::{Config, KeyCombination};
use crate::platform::{Driver, WindowEvent};
use anyhow::Result;
use log::{debug, info};

/// Status of the application after one event cycle.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AppStatus {
    /// Events were applied; the caller should draw the next frame.
    Running,
    /// A close request or the quit key was observed; stop the loop.
    Shutdown,
}

/// Holds the per-process application state.
///
/// There is exactly one window and one scene, so this amounts to the
/// liveness flag plus the quit binding it is toggled by. All windowing and
/// rendering handles live in the driver and renderer respectively.
pub struct App {
    alive: bool,
    quit_binding: KeyCombination,
}

impl App {
    pub fn new(config: &Config) -> Self {
        App {
            alive: true,
            quit_binding: config.keybindings.quit.clone(),
        }
    }

    /// Drains the driver's pending events and applies them.
    ///
    /// All events are applied before the status is returned, so the caller
    /// never draws a frame with stale events still queued. The liveness flag
    /// is sticky: once cleared, later events in the same batch cannot set it
    /// again.
    pub fn process_events(&mut self, driver: &mut dyn Driver) -> Result<AppStatus> {
        for event in driver.process_events()? {
            self.handle_event(event);
        }

        if self.alive {
            Ok(AppStatus::Running)
        } else {
            Ok(AppStatus::Shutdown)
        }
    }

    fn handle_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Resized { width, height } => {
                // The backend has already resized the drawable; the renderer
                // picks the new size up from `surface_size` next frame.
                debug!("Window resized to {}x{}", width, height);
            }
            WindowEvent::CloseRequested => {
                info!("Close requested by the compositor.");
                self.alive = false;
            }
            WindowEvent::Key { symbol, modifiers } => {
                if symbol == self.quit_binding.symbol && modifiers == self.quit_binding.modifiers {
                    info!("Quit key pressed.");
                    self.alive = false;
                } else {
                    debug!("Ignoring key {:?} (modifiers {:?})", symbol, modifiers);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{KeySymbol, Modifiers};
    use crate::platform::mock::MockDriver;

    fn app() -> App {
        App::new(&Config::default())
    }

    #[test_log::test]
    fn it_keeps_running_with_no_events() {
        let mut driver = MockDriver::new();
        let mut app = app();

        let status = app.process_events(&mut driver).unwrap();
        assert_eq!(status, AppStatus::Running);
    }

    #[test_log::test]
    fn it_shuts_down_on_close_request() {
        let mut driver = MockDriver::new();
        driver.push_event(WindowEvent::CloseRequested);
        let mut app = app();

        let status = app.process_events(&mut driver).unwrap();
        assert_eq!(status, AppStatus::Shutdown);
    }

    #[test_log::test]
    fn it_shuts_down_on_the_quit_key() {
        let mut driver = MockDriver::new();
        driver.push_event(WindowEvent::Key {
            symbol: KeySymbol::Char('q'),
            modifiers: Modifiers::empty(),
        });
        let mut app = app();

        let status = app.process_events(&mut driver).unwrap();
        assert_eq!(status, AppStatus::Shutdown);
    }

    #[test_log::test]
    fn it_ignores_other_keys() {
        let mut driver = MockDriver::new();
        driver.push_event(WindowEvent::Key {
            symbol: KeySymbol::Char('w'),
            modifiers: Modifiers::empty(),
        });
        driver.push_event(WindowEvent::Key {
            symbol: KeySymbol::Escape,
            modifiers: Modifiers::empty(),
        });
        let mut app = app();

        let status = app.process_events(&mut driver).unwrap();
        assert_eq!(status, AppStatus::Running);
    }

    #[test_log::test]
    fn it_requires_matching_modifiers_for_the_quit_key() {
        let mut driver = MockDriver::new();
        driver.push_event(WindowEvent::Key {
            symbol: KeySymbol::Char('q'),
            modifiers: Modifiers::CONTROL,
        });
        let mut app = app();

        let status = app.process_events(&mut driver).unwrap();
        assert_eq!(status, AppStatus::Running);
    }

    #[test_log::test]
    fn it_applies_the_whole_batch_before_reporting() {
        let mut driver = MockDriver::new();
        driver.push_event(WindowEvent::CloseRequested);
        driver.push_event(WindowEvent::Resized {
            width: 640,
            height: 480,
        });
        let mut app = app();

        // The close request earlier in the batch wins even though a resize
        // follows it.
        let status = app.process_events(&mut driver).unwrap();
        assert_eq!(status, AppStatus::Shutdown);
    }

    #[test_log::test]
    fn resizes_alone_do_not_stop_the_loop() {
        let mut driver = MockDriver::new();
        driver.push_event(WindowEvent::Resized {
            width: 1024,
            height: 768,
        });
        let mut app = app();

        let status = app.process_events(&mut driver).unwrap();
        assert_eq!(status, AppStatus::Running);
    }
}

// src/platform/mock.rs

use crate::platform::{Driver, WindowEvent};
use anyhow::Result;

/// Scriptable `Driver` for tests: events pushed in are drained by the next
/// `process_events` call, mirroring how a real backend's queue behaves.
pub struct MockDriver {
    events: Vec<WindowEvent>,
    size: (u32, u32),
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            size: (800, 600),
        }
    }

    pub fn push_event(&mut self, event: WindowEvent) {
        self.events.push(event);
    }
}

impl Driver for MockDriver {
    fn process_events(&mut self) -> Result<Vec<WindowEvent>> {
        Ok(self.events.drain(..).collect())
    }

    fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }
}

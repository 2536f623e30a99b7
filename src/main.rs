// src/main.rs

// Declare modules
pub mod app;
pub mod config;
pub mod keys;
pub mod platform;
pub mod renderer;

use crate::{
    app::{App, AppStatus},
    config::Config,
    platform::wayland::WaylandDriver,
    platform::Driver,
    renderer::Renderer,
};

use anyhow::Context;
use log::info;

/// Main entry point for `waytri`.
///
/// Every initialization failure propagates out of `main` as an error, which
/// terminates the process with status 1 after the error chain is printed; a
/// normal close or quit keypress exits with status 0.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting waytri...");

    let config = Config::default();
    info!("Configuration loaded (using defaults).");

    let mut driver =
        WaylandDriver::new(&config).context("failed to initialize the Wayland session")?;

    let renderer = Renderer::new(
        driver.native_display_ptr(),
        driver.native_window_ptr()?,
        &config,
    )
    .context("failed to initialize the rendering context")?;

    let mut app = App::new(&config);
    info!("Initialization complete; entering the main loop.");

    loop {
        // Pending events are always applied before the next frame is drawn.
        match app.process_events(&mut driver)? {
            AppStatus::Running => {
                let (width, height) = driver.surface_size();
                renderer.draw(width, height)?;
                renderer.present()?;
            }
            AppStatus::Shutdown => {
                info!("Shutdown requested; leaving the main loop.");
                break;
            }
        }
    }

    // Tear down GL before the surface it draws to.
    drop(renderer);
    driver.cleanup().context("failed to shut down the Wayland session")?;

    info!("waytri exited cleanly.");
    Ok(())
}

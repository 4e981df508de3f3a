use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Starhop".to_string(),
            width: 800,
            height: 600,
        }
    }
}

pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    // The simulation assumes a fixed 800x600 logical space, so the window
    // is not resizable.
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
        .with_resizable(false);

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    log::info!("Window created: {}x{}", config.width, config.height);
    Arc::new(window)
}

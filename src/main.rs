mod app;
mod config;
mod shell;

use crate::app::App;
use crate::config::AppConfig;
use arplace_runtime::GraphicsEvent;
use std::path::Path;
use winit::event_loop::EventLoop;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load_or_default(Path::new(AppConfig::FILE_NAME));
    let event_loop = EventLoop::<GraphicsEvent>::with_user_event().build()?;

    let mut app = App::new(&event_loop, &config);
    event_loop.run_app(&mut app)?;
    Ok(())
}

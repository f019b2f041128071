//! Standalone demo: opens a window with the color picker and its themes,
//! saved to the user's config directory.

use std::cell::RefCell;
use std::rc::Rc;

use floem::prelude::*;
use floem::window::WindowConfig;
use floem_swatches::{
    ColorPickerArgs, ConfigStore, FileConfig, LinearColor, MemoryConfig, PickerContext,
    color_picker,
};
use tracing_subscriber::EnvFilter;

fn run<C: ConfigStore + 'static>(config: C) {
    let mut ctx = PickerContext::new(config);
    ctx.open_picker(ColorPickerArgs::new(LinearColor::new(0.2, 0.45, 0.9, 1.0)));
    let ctx = Rc::new(RefCell::new(ctx));

    let on_close = ctx.clone();
    floem::Application::new()
        .window(
            move |_| {
                let on_close = on_close.clone();
                color_picker(ctx.clone()).on_event_stop(
                    floem::event::EventListener::WindowClosed,
                    move |_| {
                        if let Some(color) = on_close.borrow_mut().close_picker(true) {
                            tracing::info!(%color, "picked");
                        }
                        floem::quit_app()
                    },
                )
            },
            Some(
                WindowConfig::default()
                    .size((280.0, 560.0))
                    .title("floem-swatches"),
            ),
        )
        .run();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match FileConfig::open_default() {
        Ok(config) => {
            tracing::info!(path = %config.path().display(), "using config file");
            run(config);
        }
        Err(e) => {
            tracing::warn!(error = %e, "config unreadable, themes will not be saved");
            run(MemoryConfig::new());
        }
    }
}

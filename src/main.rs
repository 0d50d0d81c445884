#![allow(warnings)]
//! Eval Template Items Frontend Entry Point

mod models;
mod error;
mod config;
mod messages;
mod text;
mod store;
mod events;
mod commands;
mod registry;
mod order;
mod aggregates;
mod grouping;
mod deletion;
mod context;
mod components;
mod app;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = config::load_config().unwrap_or_else(|e| {
        web_sys::console::error_1(&format!("[CONFIG] {}", e).into());
        config::Config::default()
    });
    if let Err(e) = rolling_logger::init_logger("TemplateItems", config.log_level_filter(), config.log_capacity) {
        web_sys::console::error_1(&format!("[LOG] logger already set: {}", e).into());
    }

    mount_to_body(move || view! { <App config=config.clone() /> });
}

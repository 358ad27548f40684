// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod config;
mod ecg;
mod engine;
mod gui;
mod logging;
mod types;
use std::sync::Arc;
use anyhow::Context;
use eframe::egui;
use logging::{EventLog, LogSink};
// Panics anywhere (GUI thread or loader thread) end up in the log.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        log::error!(target: "ecg_plot", "panic: {info}");
    }));
}
// Entry point
fn main() -> anyhow::Result<()> {
    env_logger::init();
    install_panic_hook();
    let log: Arc<dyn EventLog> = Arc::new(LogSink::new("ecg_plot"));
    let config = config::AppConfig::discover().context("failed to load configuration")?;
    log.info(&format!(
        "grid: {} rows x {} ticks, {:?} surface",
        config.render.rows_per_screen, config.render.ticks_per_cell, config.render.surface
    ));
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([config.window.width, config.window.height])
        .with_drag_and_drop(true)
        .with_title("ECG Plot");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let app = gui::EcgPlotApp::new(config, Arc::clone(&log))?;
    eframe::run_native("ECG Plot", options, Box::new(move |_cc| Box::new(app)))
        .map_err(|err| anyhow::anyhow!("window system failed: {err}"))
}

//! Example: drive the engine through a scripted session and print transitions.
//!
//! Run with: cargo run -p uxmode-engine --example simulate

use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use uxmode_context::platform::{browser_tab, standalone_window, SnapshotSource};
use uxmode_context::EnvironmentSignals;
use uxmode_engine::{
    EngineDriver, HeadlessFullscreen, HostBindings, MemoryDocument, MemoryNavigator, ModeEngine,
    RuntimeConfig, SwitchOptions, TransitionDetail, UxSelection,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,uxmode=debug")),
        )
        .init();

    let config = RuntimeConfig::from_json_str(
        r#"{"debug": true, "routing": {"strategy": "query"}, "debounce_ms": 100}"#,
    )?;

    let source = Arc::new(SnapshotSource::new(EnvironmentSignals {
        display_mode: Some(browser_tab()),
        ..Default::default()
    }));
    let navigator = Arc::new(MemoryNavigator::at("https://shop.example/"));
    let host = HostBindings::headless()
        .with_source(source.clone())
        .with_document(Arc::new(MemoryDocument::with_containers(&["#web-ux", "#app-ux"])))
        .with_navigator(navigator.clone())
        .with_fullscreen(Arc::new(HeadlessFullscreen::rejecting()));

    let mut engine = ModeEngine::new(config, host)?;
    engine.subscribe(|detail: &TransitionDetail| {
        println!(
            "[{:>17}] context: {:10} | selection: {} | changed: {}",
            detail.cause, detail.context, detail.selection, detail.did_change
        );
        Ok(())
    });

    let (handle, task) = EngineDriver::spawn(engine);

    println!("-- installing the app");
    source.set_display_mode(standalone_window());
    handle.display_mode_changed()?;
    tokio::time::sleep(Duration::from_millis(250)).await;

    println!("-- entering OS fullscreen");
    source.set_fullscreen_element(true);
    handle.fullscreen_changed()?;

    println!("-- leaving fullscreen, back to a browser tab");
    source.set_fullscreen_element(false);
    handle.fullscreen_changed()?;
    source.set_display_mode(browser_tab());
    handle.display_mode_changed()?;
    tokio::time::sleep(Duration::from_millis(250)).await;

    println!("-- manual switch to the app UX");
    handle
        .switch_ux(UxSelection::App, SwitchOptions::default().navigating().with_fullscreen())
        .await?;

    handle.shutdown()?;
    let engine = task.await?;
    println!("final state: {:?}", engine.state());
    println!("navigations: {:?}", navigator.history());

    Ok(())
}

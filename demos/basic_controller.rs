//! # Example: basic_controller
//!
//! Drives one placement through the host call surface:
//! - `initController` / `setAdUnit` trigger a load through a closure-backed loader
//! - a second `setAdUnit` with the same unit replays the cached ad (no loader call)
//! - `reloadAd` with `forceRefresh` loads again; the loader fails every other call
//! - a view attached with options paints each delivery
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example basic_controller
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use admob_native::{
    AdContent, AdLoadError, AdRequest, AdUnitId, Config, LogWriter, LoaderFn, MethodCall,
    NativeAdOptions, Paint, Plugin, QueueTransport, Subscribe,
};
use serde_json::json;

struct ConsolePainter;

impl Paint for ConsolePainter {
    fn paint(&self, content: &AdContent, options: &NativeAdOptions) {
        println!(
            "[view] {:?} (headline {}pt, media {})",
            content.headline,
            options.headline.font_size,
            if options.show_media_content { "on" } else { "off" }
        );
    }

    fn hide(&self) {
        println!("[view] hidden");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let calls = Arc::new(AtomicU32::new(0));
    let loader = {
        let calls = Arc::clone(&calls);
        LoaderFn::arc("demo", move |unit: AdUnitId, req: AdRequest| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                if n % 2 == 0 {
                    return Err(AdLoadError::NoFill);
                }
                Ok(AdContent::new(format!("Ad #{n} for {unit}"))
                    .with_body(format!("keywords: {:?}", req.keywords))
                    .with_call_to_action("Install"))
            }
        })
    };

    let cfg = Config {
        load_timeout: Duration::from_secs(2),
        ..Config::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let (transport, mut host) = QueueTransport::new();
    let plugin = Plugin::builder(cfg).with_subscribers(subs).build(loader, transport);

    tokio::spawn(async move {
        while let Some(n) = host.recv().await {
            println!("[host] {} <- {}", n.channel, n.method);
        }
    });

    plugin
        .handle(MethodCall::new("initController", json!({ "controllerID": "home" })))
        .await?;
    plugin
        .attach_view("home", "banner", &json!({ "showMediaContent": false }), Arc::new(ConsolePainter))
        .await?;

    let set_unit = json!({ "controllerID": "home", "adUnitID": "ca-app-pub-3940256099942544/2247696110", "keywords": ["games"] });
    plugin.handle(MethodCall::new("setAdUnit", set_unit.clone())).await?;
    settle(&plugin).await;

    // Same unit again: served from cache.
    plugin.handle(MethodCall::new("setAdUnit", set_unit)).await?;

    // Forced reload: the loader reports no fill this time.
    plugin
        .handle(MethodCall::new("reloadAd", json!({ "controllerID": "home", "forceRefresh": true })))
        .await?;
    settle(&plugin).await;

    plugin
        .handle(MethodCall::new(
            "setOptions",
            json!({ "controllerID": "home", "viewID": "banner", "options": { "headlineTextStyle": { "fontSize": 22.0 } } }),
        ))
        .await?;

    if let Err(e) = plugin
        .handle(MethodCall::new("reloadAd", json!({ "controllerID": "missing" })))
        .await
    {
        println!("[demo] rejected: {e}");
    }

    println!("[demo] loader calls: {}", calls.load(Ordering::SeqCst));
    plugin.shutdown().await;
    Ok(())
}

async fn settle(plugin: &Plugin) {
    if let Some(home) = plugin.controller("home").await {
        let mut rx = home.watch_state();
        let _ = rx.wait_for(|s| !s.is_loading()).await;
    }
}

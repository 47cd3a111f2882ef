// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// qrwerk — desktop QR code generator with logo compositing
//
// Entry point. Initialises logging, backend services, app state, and launches
// the Dioxus UI.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use pages::generator::{Generator, publish};
use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("qrwerk starting");

    dioxus::launch(app);
}

/// Root component.
fn app() -> Element {
    // Load settings and build the generator session
    let svc = use_hook(|| match AppServices::init() {
        Ok(s) => {
            tracing::info!(path = %s.data_dir().display(), "backend services initialised");
            s
        }
        Err(e) => {
            tracing::error!(error = %e, "settings could not be loaded");
            AppServices::fallback(&e)
        }
    });

    // Provide services and state as context for all components
    use_context_provider(|| svc.clone());
    let state = use_context_provider(|| Signal::new(state::AppState::new(svc.config())));

    // Show the placeholder code straight away
    let svc_start = svc.clone();
    use_hook(move || {
        spawn(async move {
            let snapshot = svc_start.start().await;
            publish(state, &svc_start, snapshot);
        })
    });

    rsx! {
        div { class: "app-container",
            style: "min-height: 100vh; font-family: system-ui, -apple-system, sans-serif; background: #f5f5f7; padding: 24px; box-sizing: border-box;",
            Generator {}
        }
    }
}

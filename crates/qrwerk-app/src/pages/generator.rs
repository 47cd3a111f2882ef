// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generator page — content, logo, colour and resolution inputs, live
// preview, download menu and toasts.

use std::future::Future;
use std::time::Duration;

use dioxus::prelude::*;

use qrwerk_core::human_errors::NotificationLevel;
use qrwerk_core::types::{ExportFormat, ResolutionTier};
use qrwerk_render::SessionSnapshot;

use crate::services::app_services::AppServices;
use crate::state::AppState;

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(4);

/// Push a fresh snapshot and any queued notifications into the UI state,
/// scheduling each new toast for removal.
pub fn publish(mut state: Signal<AppState>, svc: &AppServices, snapshot: SessionSnapshot) {
    let ids = state.write().apply(snapshot, svc.drain_notifications());
    for id in ids {
        spawn(async move {
            tokio::time::sleep(TOAST_TTL).await;
            state.write().dismiss(id);
        });
    }
}

/// Spawn an operation that may run the pipeline. It counts as pending (the
/// Generate button shows progress) until its snapshot has been applied.
fn spawn_run<F, Fut>(mut state: Signal<AppState>, svc: AppServices, op: F)
where
    F: FnOnce(AppServices) -> Fut + 'static,
    Fut: Future<Output = SessionSnapshot> + 'static,
{
    state.write().begin_run();
    spawn(async move {
        let snapshot = op(svc.clone()).await;
        publish(state, &svc, snapshot);
        state.write().finish_run();
    });
}

#[component]
pub fn Generator() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let snapshot = state.read().session.clone();
    let resolution = snapshot
        .as_ref()
        .map(|s| s.input.resolution)
        .unwrap_or_default();
    let picker_hex = snapshot
        .as_ref()
        .map(|s| s.input.fill_color.to_hex())
        .unwrap_or_else(|| "#000000".into());
    let is_placeholder = snapshot
        .as_ref()
        .and_then(|s| s.artifact.as_ref())
        .is_some_and(|a| a.is_default_placeholder);

    let content = state.read().content.clone();
    let color_text = state.read().color_text.clone();
    let color_border = if state.read().color_valid { "#ccc" } else { "#ff3b30" };
    let logo_name = state.read().logo_name().map(str::to_string);
    let preview_url = state.read().preview_url.clone();
    let export_enabled = state.read().export_enabled();
    let generating = state.read().generating();
    let menu_open = state.read().download_menu_open;
    let raster_width = state.read().raster_width();

    rsx! {
        div { style: "max-width: 720px; margin: 0 auto; display: grid; grid-template-columns: 1fr 320px; gap: 24px;",

            // Form
            div {
                h1 { "QR Code Generator" }

                label { style: "display: block; font-weight: 600; margin-top: 16px;", "Content" }
                input {
                    r#type: "text",
                    style: "width: 100%; padding: 10px; border-radius: 8px; border: 1px solid #ccc; font-size: 16px; box-sizing: border-box;",
                    placeholder: "https://example.com or any text",
                    value: "{content}",
                    oninput: {
                        let svc = svc.clone();
                        move |evt: FormEvent| {
                            let text = evt.value();
                            state.write().content = text.clone();
                            let svc = svc.clone();
                            spawn(async move {
                                let snapshot = svc.set_content(text).await;
                                publish(state, &svc, snapshot);
                            });
                        }
                    },
                }

                label { style: "display: block; font-weight: 600; margin-top: 16px;", "Logo (SVG)" }
                div { style: "display: flex; gap: 8px; align-items: center;",
                    button {
                        style: "padding: 8px 12px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white; font-size: 14px;",
                        disabled: generating,
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                #[cfg(not(any(target_os = "ios", target_os = "android")))]
                                {
                                    if let Some(path) = rfd::FileDialog::new()
                                        .add_filter("SVG image", &["svg"])
                                        .pick_file()
                                    {
                                        tracing::info!(path = %path.display(), "logo picked");
                                        spawn_run(state, svc.clone(), move |svc| async move {
                                            svc.upload_logo_file(&path).await
                                        });
                                    }
                                }
                                #[cfg(any(target_os = "ios", target_os = "android"))]
                                {
                                    let _ = &svc;
                                    state.write().push_toast(
                                        qrwerk_core::human_errors::Notification::warning(
                                            "File picker not yet wired on mobile",
                                        ),
                                    );
                                }
                            }
                        },
                        "Upload logo"
                    }
                    if let Some(ref name) = logo_name {
                        span { style: "font-size: 14px; color: #333;", "{name}" }
                        button {
                            style: "padding: 4px 8px; border-radius: 6px; border: 1px solid #ccc; background: white; font-size: 12px;",
                            onclick: {
                                let svc = svc.clone();
                                move |_| {
                                    spawn_run(state, svc.clone(), |svc| async move { svc.remove_logo().await });
                                }
                            },
                            "Remove"
                        }
                    }
                }

                label { style: "display: block; font-weight: 600; margin-top: 16px;", "Fill colour" }
                div { style: "display: flex; gap: 8px; align-items: center;",
                    input {
                        r#type: "color",
                        value: "{picker_hex}",
                        oninput: {
                            let svc = svc.clone();
                            move |evt: FormEvent| {
                                let hex = evt.value();
                                state.write().color_text = hex.clone();
                                let svc = svc.clone();
                                spawn(async move {
                                    let (snapshot, accepted) = svc.set_fill_color(&hex).await;
                                    state.write().color_valid = accepted;
                                    publish(state, &svc, snapshot);
                                });
                            }
                        },
                    }
                    input {
                        r#type: "text",
                        style: "width: 120px; padding: 8px; border-radius: 8px; border: 1px solid {color_border}; font-family: monospace;",
                        value: "{color_text}",
                        oninput: {
                            let svc = svc.clone();
                            move |evt: FormEvent| {
                                let hex = evt.value();
                                state.write().color_text = hex.clone();
                                let svc = svc.clone();
                                spawn(async move {
                                    let (snapshot, accepted) = svc.set_fill_color(&hex).await;
                                    state.write().color_valid = accepted;
                                    publish(state, &svc, snapshot);
                                });
                            }
                        },
                    }
                }

                label { style: "display: block; font-weight: 600; margin-top: 16px;", "Resolution" }
                select {
                    style: "padding: 8px; border-radius: 8px; border: 1px solid #ccc; font-size: 14px;",
                    onchange: {
                        let svc = svc.clone();
                        move |evt: FormEvent| {
                            if let Some(tier) = ResolutionTier::from_keyword(&evt.value()) {
                                let svc = svc.clone();
                                spawn(async move {
                                    let snapshot = svc.set_resolution(tier).await;
                                    publish(state, &svc, snapshot);
                                });
                            }
                        }
                    },
                    for tier in ResolutionTier::ALL {
                        option {
                            value: "{tier.keyword()}",
                            selected: tier == resolution,
                            "{tier.label()}"
                        }
                    }
                }

                // Actions
                div { style: "display: flex; gap: 12px; margin-top: 24px;",
                    button {
                        style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px;",
                        disabled: generating,
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                spawn_run(state, svc.clone(), |svc| async move { svc.generate().await });
                            }
                        },
                        if generating { "Generating..." } else { "Generate" }
                    }

                    div { style: "position: relative;",
                        button {
                            style: "padding: 12px; border-radius: 8px; border: 1px solid #34c759; background: white; color: #34c759; font-size: 16px;",
                            disabled: !export_enabled,
                            onclick: move |_| {
                                let open = state.read().download_menu_open;
                                state.write().download_menu_open = !open;
                            },
                            "Download \u{25BE}"
                        }
                        if menu_open && export_enabled {
                            // Click-outside catcher
                            div {
                                style: "position: fixed; inset: 0; z-index: 10;",
                                onclick: move |_| state.write().download_menu_open = false,
                            }
                            div {
                                style: "position: absolute; right: 0; top: 100%; margin-top: 4px; z-index: 11; background: white; border: 1px solid #ddd; border-radius: 8px; box-shadow: 0 4px 12px rgba(0,0,0,0.1); display: flex; flex-direction: column; min-width: 120px;",
                                for format in ExportFormat::ALL {
                                    DownloadItem { format }
                                }
                            }
                        }
                    }
                }
            }

            // Preview
            div {
                div {
                    style: "width: 320px; height: 320px; background: white; border-radius: 12px; border: 1px solid #e0e0e0; display: flex; align-items: center; justify-content: center; overflow: hidden;",
                    if let Some(ref url) = preview_url {
                        img { src: "{url}", style: "width: 100%; height: 100%; object-fit: contain;", alt: "QR code preview" }
                    } else {
                        span { style: "color: #888;", "Preparing preview..." }
                    }
                }
                if let Some(width) = raster_width {
                    p { style: "color: #666; font-size: 13px; text-align: center; margin: 8px 0 0;",
                        "{width} \u{00D7} {width} px"
                    }
                }
                if is_placeholder {
                    p { style: "color: #888; font-size: 13px; text-align: center;",
                        "Example code. Enter content and press Generate."
                    }
                }
            }
        }

        Toasts {}
    }
}

/// One entry of the download menu. Opens a save dialog, then exports.
#[component]
fn DownloadItem(format: ExportFormat) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    rsx! {
        button {
            style: "padding: 10px 14px; border: none; background: white; text-align: left; font-size: 14px; cursor: pointer;",
            onclick: move |_| {
                state.write().download_menu_open = false;
                #[cfg(not(any(target_os = "ios", target_os = "android")))]
                {
                    let svc = svc.clone();
                    spawn(async move {
                        let file_name = svc.suggested_file_name(format).await;
                        let Some(handle) = rfd::AsyncFileDialog::new()
                            .set_file_name(file_name)
                            .add_filter(format.label(), &[format.extension()])
                            .save_file()
                            .await
                        else {
                            return;
                        };
                        let snapshot = svc.save_export(format, handle.path()).await;
                        publish(state, &svc, snapshot);
                    });
                }
            },
            "{format.label()}"
        }
    }
}

#[component]
fn Toasts() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = state.read().toasts.clone();

    rsx! {
        div { style: "position: fixed; bottom: 16px; right: 16px; display: flex; flex-direction: column; gap: 8px; z-index: 20;",
            for toast in toasts {
                div {
                    key: "{toast.id}",
                    style: "padding: 10px 14px; border-radius: 8px; color: white; font-size: 14px; background: {toast_color(toast.notification.level)}; box-shadow: 0 2px 8px rgba(0,0,0,0.15); cursor: pointer;",
                    onclick: move |_| state.write().dismiss(toast.id),
                    "{toast.notification.message}"
                }
            }
        }
    }
}

fn toast_color(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Success => "#34c759",
        NotificationLevel::Warning => "#ff9500",
        NotificationLevel::Error => "#ff3b30",
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the Dioxus UI to the qrwerk backend crates.
//
// The UI never touches the generator session directly; it calls these
// async methods and re-renders from the snapshot they return.

pub mod app_services;
pub mod data_dir;

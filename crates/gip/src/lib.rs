// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gip library
//!
//! This module exports the registry, collection, merge and rendering
//! layers behind the `gip` binary for use in integration tests and as a
//! library.

pub mod collect;
pub mod config;
pub mod handlers;
pub mod merge;
pub mod registry;
pub mod render;
pub mod view;

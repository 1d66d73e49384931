// Copyright 2026 CosmoDance Contributors
// SPDX-License-Identifier: Apache-2.0

//! CosmoDance runtime library — schedule & price acquisition engine.
//!
//! The core is a resilient fetch-parse-cache pipeline: a timed fetch with
//! browser-like headers, a cascade of three extraction strategies over the
//! uncontrolled source HTML, a TTL cache, a curated fallback, and a client
//! view filter. Around it sit the chat adapter and the REST surface.

pub mod acquisition;
pub mod branches;
pub mod cache;
pub mod chat;
pub mod cli;
pub mod client_view;
pub mod config;
pub mod engine;
pub mod extraction;
pub mod fallback;
pub mod knowledge;
pub mod rest;
pub mod snapshot;
pub mod stats;

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for Wayback tools (config, prefs).
//! Keeps CLI/runtime adapters thin and storage-agnostic.

pub mod config;
pub mod prefs;

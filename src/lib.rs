//! Weather widget - city weather lookup with saved favorites
//!
//! This library exposes the app's modules for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod favorites;
pub mod icons;
pub mod reducer;
pub mod state;
pub mod storage;

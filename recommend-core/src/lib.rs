//! Core library for the `recommend` client.
//!
//! This crate defines:
//! - Configuration handling
//! - The `/recommend` request and response models
//! - An HTTP client for the endpoint
//! - HTML rendering of recommendations
//! - A form controller that drives one request/response/render cycle per activation
//!
//! It is used by `recommend-cli`, but a view can be implemented for any front end.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod view;

pub use client::{HttpRecommendClient, RecommendClient, client_from_config};
pub use config::Config;
pub use controller::{FormController, Outcome};
pub use error::FormError;
pub use model::{FormInput, Recommendation, RecommendRequest, Variant};
pub use render::RenderOptions;
pub use view::{MemoryView, View};

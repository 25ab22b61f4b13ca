//! # todo-list-api
//!
//! A todo-list CRUD service with background bulk completion toggles and a
//! per-list WebSocket notification channel.
//!
//! ## Overview
//!
//! - **Domain**: todo lists, todos and the notification events pushed to
//!   subscribers.
//! - **Infrastructure**: the in-memory store, the per-list toggle lock
//!   registry, the subscriber registry with retrying broadcast, and
//!   environment configuration.
//! - **Application**: the toggle service, which locks a list, flips every
//!   todo's `completed` flag on a blocking worker and announces the outcome.
//! - **API**: axum routes for the REST surface and the WebSocket endpoint.
//!
//! ## Example
//!
//! ```rust,ignore
//! use todo_list_api::api::{AppState, create_router};
//! use todo_list_api::infrastructure::AppConfig;
//!
//! let state = AppState::in_memory(AppConfig::default(), tokio::runtime::Handle::current());
//! let router = create_router(state);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

//! Typed client for the Mustivibes REST backend.
//!
//! The backend is split across two services: the core API (admin auth,
//! users, payments, coins, moderation) and the social API (notifications,
//! dashboard, rooms, warning guidelines). [`BackendClient`] knows both base
//! URLs and exposes one method per endpoint the console uses.

pub mod bulk;
pub mod client;
pub mod envelope;
pub mod error;

mod admin;
mod coins;
mod moderation;
mod notifications;
mod payments;
mod rooms;
mod users;

pub use client::{BackendClient, BackendConfig};
pub use error::BackendError;
pub use notifications::NotificationFeed;
pub use rooms::NewRoom;

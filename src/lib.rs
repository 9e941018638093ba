//! # portfolio
//!
//! Client-side behavior for a static portfolio site: light/dark theme with a
//! durable user override, mobile sidebar, back-to-top button, skill meter
//! reveal, scroll-in animation plan, and the contact form.
//!
//! The behavior is plain Rust state driven by typed `PageEvent`s, so it runs
//! and tests without a browser. The `hydrate` feature binds it to the DOM;
//! the default `native` feature adds the HTTP form transport and the local
//! preview server.

pub mod animation;
pub mod config;
pub mod contact;
pub mod meter;
pub mod nav;
pub mod page;
pub mod scroll;
pub mod store;
pub mod theme;

#[cfg(feature = "native")]
pub mod server;

#[cfg(feature = "hydrate")]
pub mod web;

//! Domain services used by the page routes and the admin CLI.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the loader, mutation and secret logic against the
//! `FrameStore` seam, so route handlers stay focused on HTTP translation.

pub mod account;
pub mod mutation;
pub mod page;
pub mod secret;

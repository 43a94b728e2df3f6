//! Session state and the per-submission controller.

pub mod controller;
pub mod store;

pub use controller::SessionController;
pub use store::SessionStore;

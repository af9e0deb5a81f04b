//! Users, their activity logs, and the text reports rendered from them.

pub mod action;
pub mod user;

pub use action::*;
pub use user::*;

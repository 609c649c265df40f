//! Resource routers — one module per collection.
//!
//! Every handler follows the same contract: exactly one store call,
//! raw result (documents or acknowledgment) returned as JSON.

pub mod announcements;
pub mod apply;
pub mod blog;
pub mod courses;
pub mod events;
pub mod stats;
pub mod users;

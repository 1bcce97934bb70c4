//! # Route Modules
//!
//! One router per resource; [`crate::app`] merges them behind the auth
//! middleware.

pub mod accounts;
pub mod certificates;
pub mod events;
pub mod issuers;
pub mod registry;

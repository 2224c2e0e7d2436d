//! Login flavors served by this service and the collaborators plugged
//! into their pipelines.

pub mod hooks;
pub mod models;
pub mod pipelines;
pub mod strategies;

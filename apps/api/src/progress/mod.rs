// Learner progress: snapshots, derived figures, persistence and the HTTP surface.

pub mod calculator;
pub mod handlers;
pub mod repository;
pub mod service;
pub mod store;

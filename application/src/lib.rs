pub mod schedule;
pub mod service;
pub mod transfer;

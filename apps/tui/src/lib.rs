// Library side of the study radar: everything that does not touch the terminal
pub mod api;
pub mod cache;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod domain;
pub mod logging;
pub mod nav;
pub mod render;

pub use domain::{Module, Snapshot, Status, Subject};

pub mod app;
pub mod catalog;
pub mod controller;
pub mod ratings;
pub mod surface;
pub mod ui;

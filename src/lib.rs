pub mod calendar;
pub mod export;
pub mod file;
pub mod gui;
pub mod math;
pub mod model;
pub mod session;

pub mod app;
pub mod braille;
pub mod data;
pub mod geo;
pub mod hash;
pub mod map;
pub mod net;
pub mod physics;
pub mod sim;
pub mod ui;

pub mod display;
pub mod error;
pub mod keyboard;
pub mod processor;
pub mod ram;
pub mod rom;
pub mod sound;
pub mod timer;

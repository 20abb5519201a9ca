pub mod decoder;
pub mod progress;
pub mod widget;

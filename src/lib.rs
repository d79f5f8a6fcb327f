pub mod assets;
pub mod host;
pub mod math_utils;
pub mod physics;
pub mod timers;
pub mod utility;

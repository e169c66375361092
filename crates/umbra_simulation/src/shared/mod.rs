//! Shared domain - cross-cutting утилиты
//!
//! - timer: Countdown (явный таймер вместо suspended-корутин)
//! - geometry: closest point, yaw rotation с ограничением угловой скорости

pub mod geometry;
pub mod timer;

pub use geometry::*;
pub use timer::*;

//! Pitchside - football match simulation core
//!
//! A match is played out minute by minute on a 4x5 zone grid. One controller
//! task owns each match, advances it on a wall-clock timer and talks to the
//! outside world through a command queue and a notification queue.

pub mod app;
pub mod config;
pub mod game;
pub mod util;

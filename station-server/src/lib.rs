//! Nearest charging-station finder for a LINE bot.
//!
//! A webhook server that answers: "I just shared my location,
//! which battery-swap stations are closest?"

pub mod config;
pub mod domain;
pub mod gcp;
pub mod line;
pub mod proximity;
pub mod reply;
pub mod stations;
pub mod web;

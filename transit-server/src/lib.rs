//! Bus network query core.
//!
//! Answers rider questions over a static bus schedule and crowdsourced
//! reports: how do I get from one stop to another, what does it cost, how
//! crowded will my bus be, and is there traffic ahead of it.

pub mod board;
pub mod cache;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod crowd;
pub mod domain;
pub mod error;
pub mod fare;
pub mod geo;
pub mod logging;
pub mod planner;
pub mod schedule;
pub mod traffic;
pub mod web;

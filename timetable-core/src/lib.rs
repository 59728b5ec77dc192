//! Hand-authored transit timetables.
//!
//! Keeps recurring departure schedules for up to three lines per route
//! direction in a flat key-value store, and answers the questions a
//! timetable screen asks of them: what departs this hour, which hours
//! have service, which calendar applies today, and how long until the
//! next train.

pub mod calendar;
pub mod config;
pub mod countdown;
pub mod domain;
pub mod keys;
pub mod store;
pub mod timetable;
pub mod train_type;

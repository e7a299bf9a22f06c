//! Light-rail arrival board server.
//!
//! Resolves the station nearest to a user and turns the live arrival feed
//! into per-station boards split by running direction, coping with the
//! feed's habit of dropping direction tags.

pub mod board;
pub mod domain;
pub mod feed;
pub mod settings;
pub mod snapshots;
pub mod stations;
pub mod vehicles;
pub mod web;

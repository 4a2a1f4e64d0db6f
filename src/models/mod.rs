// src/models/mod.rs

pub mod game;
pub mod quiz;
pub mod user;

// src/services/mod.rs

pub mod game_service;
pub mod quiz_selector;

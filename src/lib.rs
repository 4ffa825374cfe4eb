pub mod assets;
pub mod config;
pub mod database;
pub mod errors;
pub mod image_store;
pub mod index;
pub mod models;
pub mod services;
pub mod web;

//! Goods domain - CRUD over the inventory table

pub mod models;

pub use models::{CreateGoods, Goods, UpdateGoods};

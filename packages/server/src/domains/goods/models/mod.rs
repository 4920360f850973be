pub mod goods;

pub use goods::{CreateGoods, Goods, UpdateGoods};

pub mod goods;
pub mod uploads;

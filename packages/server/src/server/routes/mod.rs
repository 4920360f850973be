// HTTP routes
pub mod goods;
pub mod health;
pub mod ping;
pub mod uploads;

pub use goods::*;
pub use health::*;
pub use ping::*;
pub use uploads::*;

pub mod acceptance;
pub mod server;

pub use crate::domain::ports::{ConfigProvider, LineRepository, StationRepository};
pub use crate::utils::error::Result;

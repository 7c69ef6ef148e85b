pub mod config;
pub mod error;
pub mod routes;
pub mod store;

pub use config::{Config, StoreTarget};
pub use error::ApiError;
pub use routes::{build_router, AppState};
pub use store::{MemoryTaskStore, RedisTaskStore, StoreError, TaskStore};

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod persistence;
pub mod query;
pub mod stats;
pub mod store;
pub mod task;
pub mod theme;
pub mod ui;
pub mod view;

pub use controller::Controller;
pub use error::{Error, Result, ValidationError};
pub use persistence::{FileStore, KeyValueStore, MemoryStore, Persistence};
pub use query::{Query, StatusFilter};
pub use stats::Stats;
pub use task::{Priority, Task, TaskDraft};
pub use theme::Theme;

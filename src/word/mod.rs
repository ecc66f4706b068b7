//! Words and word tasks
//!
//! - `task`: one fill-in-the-blank challenge
//! - `repository`: supplier of fresh words

pub mod repository;
pub mod task;

pub use repository::{DEFAULT_WORDS, InMemoryWordRepository, WordRepository};
pub use task::WordTask;

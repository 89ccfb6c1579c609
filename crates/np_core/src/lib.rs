pub mod error;
pub mod store;
pub mod types;

pub use error::Error;
pub use store::{ArticleFilter, ArticleStore};
pub use types::{Article, Category, Sentiment};

pub type Result<T> = std::result::Result<T, Error>;

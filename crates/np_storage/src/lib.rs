pub mod backends;

pub use backends::*;

pub mod prelude {
    pub use super::backends::*;
    pub use np_core::{Article, ArticleFilter, ArticleStore, Result};
}

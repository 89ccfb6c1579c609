pub mod classifier;
pub mod lexicon;
pub mod pass;

pub use classifier::{classify, polarity};
pub use pass::{classify_all, classify_store};

pub mod prelude {
    pub use super::classifier::classify;
    pub use super::pass::classify_all;
    pub use np_core::{Result, Sentiment};
}

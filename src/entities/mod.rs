pub mod article;
pub mod article_tag;
pub mod gallery;
pub mod tag;

pub mod article_model;
pub mod gallery_model;
pub mod tag_model;

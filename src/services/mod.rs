pub mod article_service;
pub mod gallery_service;
pub mod storage_service;
pub mod tag_service;

pub mod api;
pub mod config;
pub mod extractor;
pub mod media;
pub mod observability;
pub mod records;
pub mod storage;
pub mod supabase;

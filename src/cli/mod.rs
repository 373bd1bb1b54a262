pub mod chat;
pub mod doctor;
pub mod export;
pub mod save;
pub mod summary;

pub mod credentials;
pub mod export;
pub mod gradebook;
pub mod studentvue;

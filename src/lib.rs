pub mod business;
pub mod carousel;
pub mod config;
pub mod error;
pub mod events;
pub mod menu;
pub mod tasks {
    pub mod carousel;
    pub mod info;
}

pub use error::Error;

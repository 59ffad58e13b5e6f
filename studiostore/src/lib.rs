pub mod audit;
mod cache;
pub mod enforcement;
pub mod error;
pub mod platform;

pub use platform::{
    Builder,
    Platform,
};

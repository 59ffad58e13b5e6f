pub mod ac;
pub mod error;
pub mod normalize;
pub mod platform;
pub mod record;

pub(crate) mod chrono {
    #[cfg(not(test))]
    pub use ::chrono::Utc;
    #[cfg(test)]
    pub use test_studio::chrono::Utc;
}

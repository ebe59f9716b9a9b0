pub mod emptiness;
pub mod error;
pub mod geometry;
pub mod model;

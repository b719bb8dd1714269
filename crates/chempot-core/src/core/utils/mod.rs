pub mod combinations;
pub mod geometry;
pub mod linalg;

pub mod score;
pub mod transform;

pub mod coordinate;
pub mod matrix;

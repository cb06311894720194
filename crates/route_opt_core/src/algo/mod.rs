pub mod construction;
pub mod solver;
pub mod two_opt;

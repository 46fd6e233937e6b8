mod board;

pub use board::DouBoard;

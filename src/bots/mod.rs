pub mod random;

pub use random::RandomBot;

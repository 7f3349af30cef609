pub mod error;
pub mod scanner;
pub mod source;
pub mod stack;
pub mod token;

pub mod context;
pub mod interpreter;
pub mod ops;
pub mod value;

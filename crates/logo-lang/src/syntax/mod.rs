pub mod ast;
pub mod builder;
pub mod cst;
pub mod lexer;
pub mod parser;
pub mod token;

//! Calculator for the three-argument extended Goal function `G(a,b,c)`:
//! parsing, the ordering `<`, the cofinality `dom`, fundamental sequences
//! `A[B]` and printing.

pub mod evaluator;
pub mod parser;
pub mod prelude;
pub mod printer;
pub mod term;

pub use evaluator::{dom, fund, less_than, EvalError};
pub use parser::{parse_term, ParseError};
pub use printer::{abbreviate, term_to_string, Options};
pub use term::{Principal, Term};

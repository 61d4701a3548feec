//! # CineBrew
//!
//! A small teaching language with a cinema and coffee vocabulary,
//! compiled to label-addressed bytecode and run on a stack machine.
//!
//! ```text
//! POUR fact(5);
//! SCENE fact(n) {
//!     IF n < 2 { SHOT 1; }
//!     SHOT n * fact(n - 1);
//! }
//! ```
//!
//! The `lang` module turns source text into a checked syntax tree.
//! The `mach` module turns that tree into bytecode and runs it.
//!
//! ```
//! use cinebrew::mach::{Builtins, Runtime};
//!
//! let builtins = Builtins::new();
//! let bytecode = cinebrew::compile("TAKE x = 6;\nPOUR x * 7;", &builtins).unwrap();
//! let mut runtime = Runtime::new(builtins);
//! assert_eq!(runtime.run(&bytecode).unwrap(), "42\n");
//! ```

pub mod lang;
pub mod mach;

pub use mach::compile;

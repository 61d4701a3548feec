/*!
## Rust Machine Module

This Rust module is the code generator and stack virtual machine
for CineBrew.

*/

pub type Address = usize;

mod codegen;
mod compile;
mod config;
mod function;
mod link;
mod opcode;
mod runtime;
mod stack;
mod surface;
mod var;

pub use codegen::CodeGenerator;
pub use compile::compile;
pub use compile::Compiler;
pub use config::Config;
pub use function::Builtin;
pub use function::Builtins;
pub use function::Context;
pub use function::Native;
pub use link::Link;
pub use opcode::split;
pub use opcode::Opcode;
pub use opcode::Operand;
pub use runtime::Event;
pub use runtime::Frame;
pub use runtime::Runtime;
pub use stack::Stack;
pub use surface::Headless;
pub use surface::Surface;
pub use var::Var;

use super::{Address, Builtins, Config, Link, Opcode, Operand, Stack, Var};
use crate::error;
use crate::lang::Error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// One active invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub return_address: Address,
    pub base: usize,
    pub argc: usize,
}

/// ## Events
///
/// What `execute` hands back to the host after each slice. Output is
/// always delivered before the error that followed it, and the error
/// before `Stopped`.

#[derive(Debug, PartialEq)]
pub enum Event {
    Print(String),
    Running,
    Stopped,
    Error(Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Stopped,
    Running,
}

/// ## Stack machine
///
/// Load a bytecode listing, then call `execute` until it reports
/// `Stopped`. Fatal conditions are stack underflow and call stack
/// overflow; everything else is logged and defaulted so the program keeps
/// going. The operand stack is unbounded.

pub struct Runtime {
    config: Config,
    builtins: Builtins,
    ops: Vec<Opcode>,
    link: Link,
    stack: Stack<i64>,
    frames: Stack<Frame>,
    vars: Var,
    pc: Address,
    state: State,
    output: String,
    fault: Option<Error>,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(Builtins::default())
    }
}

impl Runtime {
    pub fn new(builtins: Builtins) -> Runtime {
        Runtime::with_config(builtins, Config::default())
    }

    pub fn with_config(builtins: Builtins, config: Config) -> Runtime {
        // PRINT leaves its value behind, so the operand stack only grows.
        let stack = Stack::new("OPERAND STACK OVERFLOW").with_limit(usize::MAX);
        let frames = Stack::new("CALL STACK OVERFLOW").with_limit(config.stack_limit);
        Runtime {
            config,
            builtins,
            ops: vec![],
            link: Link::new(),
            stack,
            frames,
            vars: Var::new(),
            pc: 0,
            state: State::Stopped,
            output: String::new(),
            fault: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    /// Decode a listing and get ready to run it from the top.
    pub fn load<S: AsRef<str>>(&mut self, program: &[S]) {
        self.ops = program.iter().map(|s| Opcode::parse(s.as_ref())).collect();
        tracing::debug!(instructions = self.ops.len(), "program loaded");
        self.preprocess();
        self.reset();
        self.state = State::Running;
    }

    /// Rebuild the label table. Returns the number of jumps with no target.
    pub fn preprocess(&mut self) -> usize {
        let unresolved = self.link.preprocess(&self.ops);
        tracing::debug!(labels = self.link.len(), "labels resolved");
        unresolved.len()
    }

    pub fn labels(&self) -> &Link {
        &self.link
    }

    pub fn reset(&mut self) {
        self.stack.clear();
        self.frames.clear();
        self.vars.clear();
        self.pc = 0;
        self.output.clear();
        self.fault = None;
        self.state = State::Stopped;
    }

    /// Preprocess, reset and run to completion. Output printed before a
    /// fatal error is lost; use `execute` when it matters.
    pub fn run<S: AsRef<str>>(&mut self, program: &[S]) -> Result<String> {
        self.load(program);
        let cycles = self.config.cycles.max(1);
        let mut s = String::new();
        loop {
            match self.execute(cycles) {
                Event::Print(text) => s.push_str(&text),
                Event::Running => {}
                Event::Stopped => return Ok(s),
                Event::Error(error) => return Err(error),
            }
        }
    }

    pub fn interrupt(&mut self) {
        if self.state == State::Running {
            self.fault = Some(error!(Interrupted, @self.pc));
            self.state = State::Stopped;
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn execute(&mut self, cycles: usize) -> Event {
        if let Some(event) = self.pending_event() {
            return event;
        }
        if self.state == State::Stopped {
            return Event::Stopped;
        }
        for _ in 0..cycles {
            match self.step() {
                Ok(true) => {}
                Ok(false) => {
                    self.state = State::Stopped;
                    break;
                }
                Err(error) => {
                    self.fault = Some(error);
                    self.state = State::Stopped;
                    break;
                }
            }
        }
        match self.pending_event() {
            Some(event) => event,
            None if self.state == State::Stopped => Event::Stopped,
            None => Event::Running,
        }
    }

    fn pending_event(&mut self) -> Option<Event> {
        if !self.output.is_empty() {
            return Some(Event::Print(std::mem::take(&mut self.output)));
        }
        self.fault.take().map(Event::Error)
    }

    /// Run one function to its `RET` from the current machine state, then
    /// put the program counter and stack depth back. `Ok(false)` when no
    /// such label exists.
    pub fn call_function(&mut self, name: &str) -> Result<bool> {
        let target = match self.link.get(name) {
            Some(target) => target,
            None => return Ok(false),
        };
        let saved_pc = self.pc;
        let saved_depth = self.stack.len();
        let caller_frames = self.frames.len();
        self.frames.push(Frame {
            return_address: self.ops.len(),
            base: saved_depth,
            argc: 0,
        })?;
        self.pc = target;
        let mut steps = 0;
        let mut result = Ok(true);
        while self.frames.len() > caller_frames {
            if steps >= self.config.call_limit {
                tracing::warn!(function = name, limit = steps, "instruction limit reached");
                break;
            }
            match self.step() {
                Ok(true) => steps += 1,
                Ok(false) => break,
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
        self.frames.truncate(caller_frames);
        self.pc = saved_pc;
        self.stack.truncate(saved_depth);
        result
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn variable(&self, name: &str) -> Option<i64> {
        self.vars.fetch(name)
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn stack_top(&self) -> Option<i64> {
        self.stack.last().copied()
    }

    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    fn step(&mut self) -> Result<bool> {
        let addr = self.pc;
        let op = match self.ops.get(addr) {
            Some(op) => op.clone(),
            None => return Ok(false),
        };
        self.pc += 1;
        self.dispatch(op, addr).map_err(|e| e.in_address(addr))
    }

    fn dispatch(&mut self, op: Opcode, addr: Address) -> Result<bool> {
        use Opcode::*;
        match op {
            Label(_) | Empty => {}
            Push(Operand::Integer(n)) => self.stack.push(n)?,
            Push(Operand::Text(text)) => self.push_text(text, addr)?,
            Pop => {
                self.stack.pop()?;
            }
            Store(name) => {
                let value = self.stack.pop()?;
                self.vars.store(&name, value);
            }
            Load(name) => {
                let value = match self.vars.fetch(&name) {
                    Some(value) => value,
                    None => {
                        tracing::warn!(address = addr, variable = %name, "variable not found, using 0");
                        0
                    }
                };
                self.stack.push(value)?;
            }
            Add => self.binary(|a, b| a.wrapping_add(b))?,
            Sub => self.binary(|a, b| a.wrapping_sub(b))?,
            Mul => self.binary(|a, b| a.wrapping_mul(b))?,
            Div => {
                let (a, b) = self.stack.pop_2()?;
                if b == 0 {
                    tracing::error!(address = addr, "division by zero");
                    self.stack.push(0)?;
                } else {
                    self.stack.push(a.wrapping_div(b))?;
                }
            }
            Eq => self.binary(|a, b| (a == b) as i64)?,
            Gt => self.binary(|a, b| (a > b) as i64)?,
            Lt => self.binary(|a, b| (a < b) as i64)?,
            Ne => self.binary(|a, b| (a != b) as i64)?,
            Jmp(label) => self.jump(&label, addr),
            Jz(label) => {
                if self.stack.pop()? == 0 {
                    self.jump(&label, addr);
                }
            }
            Jnz(label) => {
                if self.stack.pop()? != 0 {
                    self.jump(&label, addr);
                }
            }
            Call(name, argc) => self.call(name, argc, addr)?,
            LoadArg(n) => {
                let value = self.argument(n, addr);
                self.stack.push(value)?;
            }
            Ret => {
                if self.frames.is_empty() {
                    return Ok(false);
                }
                let value = if self.stack.is_empty() {
                    0
                } else {
                    self.stack.pop()?
                };
                let frame = self.frames.pop()?;
                self.stack.truncate(frame.base);
                self.stack.push(value)?;
                self.pc = frame.return_address;
            }
            Print => match self.stack.last() {
                Some(value) => self.output.push_str(&format!("{}\n", value)),
                None => self.output.push_str("[EMPTY_STACK]\n"),
            },
            Unknown(s) => {
                tracing::warn!(address = addr, opcode = %s, "unknown instruction");
            }
            Invalid(s, reason) => {
                tracing::warn!(address = addr, opcode = %s, reason, "malformed instruction");
            }
        }
        Ok(true)
    }

    fn binary(&mut self, f: fn(i64, i64) -> i64) -> Result<()> {
        let (a, b) = self.stack.pop_2()?;
        self.stack.push(f(a, b))
    }

    fn jump(&mut self, label: &str, addr: Address) {
        match self.link.get(label) {
            Some(target) => self.pc = target,
            None => tracing::warn!(address = addr, label, "label not found"),
        }
    }

    fn push_text(&mut self, text: Rc<str>, addr: Address) -> Result<()> {
        let print_at = self
            .ops
            .iter()
            .enumerate()
            .skip(self.pc)
            .find(|(_, op)| !op.is_label())
            .and_then(|(idx, op)| match op {
                Opcode::Print => Some(idx),
                _ => None,
            });
        match print_at {
            Some(idx) => {
                self.output.push_str(&text);
                self.output.push('\n');
                self.pc = idx + 1;
                Ok(())
            }
            None => {
                tracing::warn!(address = addr, text = %text, "push of non-integer, using 0");
                self.stack.push(0)
            }
        }
    }

    fn call(&mut self, name: Rc<str>, argc: usize, addr: Address) -> Result<()> {
        if self.builtins.is_builtin(&name) {
            let args = self.stack.pop_n(argc)?;
            let result = self
                .builtins
                .call(&name, &args, &mut self.output)
                .unwrap_or(0);
            return self.stack.push(result);
        }
        if argc > self.stack.len() {
            return Err(error!(StackUnderflow; "NOT ENOUGH ARGUMENTS FOR CALL"));
        }
        match self.link.get(&name) {
            Some(target) => {
                self.frames.push(Frame {
                    return_address: self.pc,
                    base: self.stack.len() - argc,
                    argc,
                })?;
                self.pc = target;
                Ok(())
            }
            None => {
                tracing::warn!(address = addr, function = %name, "call to undefined label, using 0");
                self.stack.pop_n(argc)?;
                self.stack.push(0)
            }
        }
    }

    fn argument(&self, n: usize, addr: Address) -> i64 {
        let frame = match self.frames.last() {
            Some(frame) => frame,
            None => {
                tracing::warn!(address = addr, "LOADARG outside function, using 0");
                return 0;
            }
        };
        if n >= frame.argc {
            tracing::warn!(address = addr, index = n, "invalid argument index, using 0");
            return 0;
        }
        match self.stack.get(frame.base + n) {
            Some(value) => *value,
            None => {
                tracing::warn!(address = addr, index = n, "argument out of bounds, using 0");
                0
            }
        }
    }
}

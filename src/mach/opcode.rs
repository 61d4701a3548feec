use std::rc::Rc;

/// ## Virtual machine instruction set
///
/// One bytecode line decodes to one `Opcode`. The machine has no
/// registers; every operation works on the operand stack.
///
/// For example: `TAKE r = 10 + a * 2;` compiles to
/// `[PUSH 10, LOAD a, PUSH 2, MUL, ADD, STORE r]`
///
/// Decoding never fails. Lines the machine does not understand become
/// `Unknown` or `Invalid` and are skipped with a warning at run time.

#[derive(Clone, PartialEq)]
pub enum Opcode {
    /// Jump target marker. Executes as a no-op.
    Label(Rc<str>),
    /// Blank line.
    Empty,

    // *** Stack manipulation
    /// Push an operand. Text operands are only meaningful when the next
    /// non-label instruction is `PRINT`.
    Push(Operand),
    /// Discard top of stack.
    Pop,
    /// Pop into named variable.
    Store(Rc<str>),
    /// Push named variable, 0 when undefined.
    Load(Rc<str>),

    // *** Expression operations
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Gt,
    Lt,
    Ne,

    // *** Branch control
    Jmp(Rc<str>),
    /// Pop and branch if zero.
    Jz(Rc<str>),
    /// Pop and branch if not zero.
    Jnz(Rc<str>),
    /// Built-in dispatch or frame push with the given argument count.
    Call(Rc<str>, usize),
    /// Push the n-th argument of the innermost frame.
    LoadArg(usize),
    Ret,

    // *** Statements
    /// Write top of stack without popping.
    Print,

    Unknown(Rc<str>),
    Invalid(Rc<str>, &'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i64),
    Text(Rc<str>),
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Operand::Integer(n) => write!(f, "{}", n),
            Operand::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Whitespace separated words. A double quote toggles quoting and stays
/// in the word, so `PUSH "a b"` yields `["PUSH", "\"a b\""]`.
pub fn split(line: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = vec![];
    let mut start: Option<usize> = None;
    let mut in_quote = false;
    for (idx, ch) in line.char_indices() {
        if ch == '"' {
            in_quote = !in_quote;
        } else if ch.is_whitespace() && !in_quote {
            if let Some(s) = start.take() {
                parts.push(&line[s..idx]);
            }
            continue;
        }
        if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        parts.push(&line[s..]);
    }
    parts
}

fn text_operand(line: &str) -> Rc<str> {
    let rest = match line.find(char::is_whitespace) {
        Some(idx) => line[idx..].trim(),
        None => "",
    };
    let stripped = if rest.len() >= 2 && rest.starts_with('"') && rest.ends_with('"') {
        &rest[1..rest.len() - 1]
    } else {
        rest
    };
    stripped.into()
}

impl Opcode {
    pub fn parse(line: &str) -> Opcode {
        use Opcode::*;
        let line = line.trim();
        if line.is_empty() {
            return Empty;
        }
        if let Some(name) = line.strip_suffix(':') {
            return Label(name.into());
        }
        let parts = split(line);
        let opcode = match parts.first() {
            Some(opcode) => *opcode,
            None => return Empty,
        };
        let operand = parts.get(1).copied();
        let name = |reason: &'static str| match operand {
            Some(s) => Ok(Rc::<str>::from(s)),
            None => Err(Invalid(opcode.into(), reason)),
        };
        let decoded = match opcode {
            "PUSH" => match operand {
                None => Err(Invalid(opcode.into(), "PUSH requires a value")),
                Some(s) => match s.parse::<i64>() {
                    Ok(n) => Ok(Push(Operand::Integer(n))),
                    Err(_) => Ok(Push(Operand::Text(text_operand(line)))),
                },
            },
            "POP" => Ok(Pop),
            "ADD" => Ok(Add),
            "SUB" => Ok(Sub),
            "MUL" => Ok(Mul),
            "DIV" => Ok(Div),
            "EQ" => Ok(Eq),
            "GT" => Ok(Gt),
            "LT" => Ok(Lt),
            "NE" => Ok(Ne),
            "STORE" => name("STORE requires variable name").map(Store),
            "LOAD" => name("LOAD requires variable name").map(Load),
            "JMP" => name("JMP requires label name").map(Jmp),
            "JZ" => name("JZ requires label name").map(Jz),
            "JNZ" => name("JNZ requires label name").map(Jnz),
            "CALL" => match name("CALL requires label name") {
                Err(e) => Err(e),
                Ok(label) => match parts.get(2).map(|s| s.parse::<usize>()) {
                    None => Ok(Call(label, 0)),
                    Some(Ok(argc)) => Ok(Call(label, argc)),
                    Some(Err(_)) => Err(Invalid(opcode.into(), "CALL argument count is not a number")),
                },
            },
            "LOADARG" => match operand.map(|s| s.parse::<usize>()) {
                None => Err(Invalid(opcode.into(), "LOADARG requires argument index")),
                Some(Ok(n)) => Ok(LoadArg(n)),
                Some(Err(_)) => Err(Invalid(opcode.into(), "LOADARG index is not a number")),
            },
            "RET" => Ok(Ret),
            "PRINT" => Ok(Print),
            _ => Ok(Unknown(opcode.into())),
        };
        match decoded {
            Ok(op) | Err(op) => op,
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Opcode::Label(_))
    }

    /// Label named by a jump, if any.
    pub fn jump_target(&self) -> Option<&Rc<str>> {
        match self {
            Opcode::Jmp(s) | Opcode::Jz(s) | Opcode::Jnz(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string())
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        match self {
            Label(s) => write!(f, "{}:", s),
            Empty => Ok(()),

            Push(v) => write!(f, "PUSH {}", v),
            Pop => write!(f, "POP"),
            Store(s) => write!(f, "STORE {}", s),
            Load(s) => write!(f, "LOAD {}", s),

            Add => write!(f, "ADD"),
            Sub => write!(f, "SUB"),
            Mul => write!(f, "MUL"),
            Div => write!(f, "DIV"),
            Eq => write!(f, "EQ"),
            Gt => write!(f, "GT"),
            Lt => write!(f, "LT"),
            Ne => write!(f, "NE"),

            Jmp(s) => write!(f, "JMP {}", s),
            Jz(s) => write!(f, "JZ {}", s),
            Jnz(s) => write!(f, "JNZ {}", s),
            Call(s, argc) => write!(f, "CALL {} {}", s, argc),
            LoadArg(n) => write!(f, "LOADARG {}", n),
            Ret => write!(f, "RET"),

            Print => write!(f, "PRINT"),

            Unknown(s) => write!(f, "{}", s),
            Invalid(s, reason) => write!(f, "{} ({})", s, reason),
        }
    }
}

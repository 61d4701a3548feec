use super::LineNumber;

#[derive(Debug, PartialEq, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Program {
        Program { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Declaration(LineNumber, String, Expr),
    Assignment(LineNumber, String, Expr),
    Expression(LineNumber, Expr),
    Print(LineNumber, Expr),
    If(LineNumber, Expr, Vec<Stmt>, Option<Vec<Stmt>>),
    Loop(LineNumber, Expr, Vec<Stmt>),
    Break(LineNumber),
    Continue(LineNumber),
    Return(LineNumber, Option<Expr>),
    Block(LineNumber, Vec<Stmt>),
    Function(LineNumber, String, Vec<String>, Vec<Stmt>),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Literal(LineNumber, Literal),
    Variable(LineNumber, String),
    Binary(LineNumber, BinaryOp, Box<Expr>, Box<Expr>),
    Unary(LineNumber, UnaryOp, Box<Expr>),
    Call(LineNumber, String, Vec<Expr>),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Integer(i64),
    Bool(bool),
    Str(String),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

/// `Not` has no surface syntax; it exists for trees built by hand.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl Stmt {
    pub fn line(&self) -> LineNumber {
        use Stmt::*;
        match self {
            Declaration(line, ..)
            | Assignment(line, ..)
            | Expression(line, _)
            | Print(line, _)
            | If(line, ..)
            | Loop(line, ..)
            | Break(line)
            | Continue(line)
            | Return(line, _)
            | Block(line, _)
            | Function(line, ..) => *line,
        }
    }
}

impl Expr {
    pub fn line(&self) -> LineNumber {
        use Expr::*;
        match self {
            Literal(line, _)
            | Variable(line, _)
            | Binary(line, ..)
            | Unary(line, ..)
            | Call(line, ..) => *line,
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use BinaryOp::*;
        let s = match self {
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Equal => "==",
            NotEqual => "!=",
            Greater => ">",
            GreaterEqual => ">=",
            Less => "<",
            LessEqual => "<=",
        };
        write!(f, "{}", s)
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            UnaryOp::Negate => write!(f, "-"),
            UnaryOp::Not => write!(f, "not"),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Expr::*;
        match self {
            Literal(_, lit) => write!(f, "{}", lit),
            Variable(_, name) => write!(f, "{}", name),
            Binary(_, op, lhs, rhs) => write!(f, "({} {} {})", op, lhs, rhs),
            Unary(_, op, expr) => write!(f, "({} {})", op, expr),
            Call(_, name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_block(f: &mut std::fmt::Formatter, stmts: &[Stmt], depth: usize) -> std::fmt::Result {
    for stmt in stmts {
        write_stmt(f, stmt, depth)?;
    }
    Ok(())
}

fn write_stmt(f: &mut std::fmt::Formatter, stmt: &Stmt, depth: usize) -> std::fmt::Result {
    use Stmt::*;
    let pad = "  ".repeat(depth);
    match stmt {
        Declaration(_, name, expr) => writeln!(f, "{}TAKE {} = {}", pad, name, expr),
        Assignment(_, name, expr) => writeln!(f, "{}{} = {}", pad, name, expr),
        Expression(_, expr) => writeln!(f, "{}{}", pad, expr),
        Print(_, expr) => writeln!(f, "{}POUR {}", pad, expr),
        If(_, cond, then_branch, else_branch) => {
            writeln!(f, "{}IF {}", pad, cond)?;
            write_block(f, then_branch, depth + 1)?;
            if let Some(else_branch) = else_branch {
                writeln!(f, "{}ELSE", pad)?;
                write_block(f, else_branch, depth + 1)?;
            }
            Ok(())
        }
        Loop(_, cond, body) => {
            writeln!(f, "{}LOOP {}", pad, cond)?;
            write_block(f, body, depth + 1)
        }
        Break(_) => writeln!(f, "{}BREAK", pad),
        Continue(_) => writeln!(f, "{}CONTINUE", pad),
        Return(_, Some(expr)) => writeln!(f, "{}SHOT {}", pad, expr),
        Return(_, None) => writeln!(f, "{}SHOT", pad),
        Block(_, stmts) => {
            writeln!(f, "{}BLOCK", pad)?;
            write_block(f, stmts, depth + 1)
        }
        Function(_, name, params, body) => {
            writeln!(f, "{}SCENE {}({})", pad, name, params.join(", "))?;
            write_block(f, body, depth + 1)
        }
    }
}

impl std::fmt::Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write_stmt(f, self, 0)
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write_block(f, &self.statements, 0)
    }
}

use super::{Opcode, Operand};
use crate::lang::ast::*;
use std::collections::HashMap;
use std::rc::Rc;

/// ## Tree to bytecode
///
/// Single pass, no optimization. Every expression leaves exactly one
/// value on the stack. Labels are `prefix_N` with one counter per prefix,
/// numbered in tree-walk order.

#[derive(Debug, Default)]
pub struct CodeGenerator {
    ops: Vec<Opcode>,
    counters: HashMap<&'static str, usize>,
    params: Vec<String>,
}

impl CodeGenerator {
    pub fn new() -> CodeGenerator {
        CodeGenerator::default()
    }

    pub fn generate(&mut self, program: &Program) -> Vec<String> {
        self.ops.clear();
        self.counters.clear();
        self.params.clear();
        self.block(&program.statements);
        self.emit(Opcode::Label("HALT".into()));
        self.ops.iter().map(|op| op.to_string()).collect()
    }

    fn emit(&mut self, op: Opcode) {
        self.ops.push(op);
    }

    fn new_label(&mut self, prefix: &'static str) -> Rc<str> {
        let counter = self.counters.entry(prefix).or_insert(0);
        let label = format!("{}_{}", prefix, counter);
        *counter += 1;
        label.into()
    }

    fn block(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.statement(stmt);
        }
    }

    fn statement(&mut self, stmt: &Stmt) {
        use Stmt::*;
        match stmt {
            Declaration(_, name, expr) | Assignment(_, name, expr) => {
                self.expression(expr);
                self.emit(Opcode::Store(name.as_str().into()));
            }
            Expression(_, expr) => {
                self.expression(expr);
                self.emit(Opcode::Pop);
            }
            Print(_, expr) => {
                self.expression(expr);
                self.emit(Opcode::Print);
            }
            If(_, cond, then_branch, else_branch) => {
                self.expression(cond);
                let else_label = self.new_label("else");
                let end_label = self.new_label("end_if");
                self.emit(Opcode::Jz(else_label.clone()));
                self.block(then_branch);
                self.emit(Opcode::Jmp(end_label.clone()));
                self.emit(Opcode::Label(else_label));
                if let Some(else_branch) = else_branch {
                    self.block(else_branch);
                }
                self.emit(Opcode::Label(end_label));
            }
            Loop(_, cond, body) => {
                let loop_label = self.new_label("loop");
                let end_label = self.new_label("end_loop");
                self.emit(Opcode::Label(loop_label.clone()));
                self.expression(cond);
                self.emit(Opcode::Jz(end_label.clone()));
                self.block(body);
                self.emit(Opcode::Jmp(loop_label));
                self.emit(Opcode::Label(end_label));
            }
            // These never address the enclosing loop. The fresh label has
            // no marker, so the machine logs the jump and falls through.
            Break(_) => {
                let end_label = self.new_label("end_loop");
                self.emit(Opcode::Jmp(end_label));
            }
            Continue(_) => {
                let loop_label = self.new_label("loop");
                self.emit(Opcode::Jmp(loop_label));
            }
            Return(_, value) => {
                match value {
                    Some(expr) => self.expression(expr),
                    None => self.emit(Opcode::Push(Operand::Integer(0))),
                }
                self.emit(Opcode::Ret);
            }
            Block(_, stmts) => self.block(stmts),
            // No jump around the body. Straight-line code that reaches a
            // SCENE runs it and stops at the frameless RET.
            Function(_, name, params, body) => {
                self.emit(Opcode::Label(name.as_str().into()));
                let outer = std::mem::replace(&mut self.params, params.clone());
                self.block(body);
                self.params = outer;
                self.emit(Opcode::Push(Operand::Integer(0)));
                self.emit(Opcode::Ret);
            }
        }
    }

    fn expression(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_, lit) => {
                let operand = match lit {
                    Literal::Integer(n) => Operand::Integer(*n),
                    Literal::Bool(b) => Operand::Integer(*b as i64),
                    Literal::Str(s) => Operand::Text(s.as_str().into()),
                };
                self.emit(Opcode::Push(operand));
            }
            Expr::Variable(_, name) => match self.params.iter().position(|p| p == name) {
                Some(idx) => self.emit(Opcode::LoadArg(idx)),
                None => self.emit(Opcode::Load(name.as_str().into())),
            },
            Expr::Binary(_, op, lhs, rhs) => self.binary(*op, lhs, rhs),
            Expr::Unary(_, op, operand) => {
                let k = match op {
                    UnaryOp::Negate => 0,
                    UnaryOp::Not => 1,
                };
                self.emit(Opcode::Push(Operand::Integer(k)));
                self.expression(operand);
                self.emit(Opcode::Sub);
            }
            Expr::Call(_, name, args) => {
                for arg in args {
                    self.expression(arg);
                }
                self.emit(Opcode::Call(name.as_str().into(), args.len()));
            }
        }
    }

    fn binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) {
        use BinaryOp::*;
        let (primitive, complement) = match op {
            Add => (Opcode::Add, false),
            Subtract => (Opcode::Sub, false),
            Multiply => (Opcode::Mul, false),
            Divide => (Opcode::Div, false),
            Equal => (Opcode::Eq, false),
            Greater => (Opcode::Gt, false),
            Less => (Opcode::Lt, false),
            NotEqual => (Opcode::Eq, true),
            GreaterEqual => (Opcode::Lt, true),
            LessEqual => (Opcode::Gt, true),
        };
        // 1 - primitive
        if complement {
            self.emit(Opcode::Push(Operand::Integer(1)));
        }
        self.expression(lhs);
        self.expression(rhs);
        self.emit(primitive);
        if complement {
            self.emit(Opcode::Sub);
        }
    }
}

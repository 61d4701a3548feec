use super::{ast::*, Error, LineNumber};
use crate::mach::Builtins;
use std::collections::HashMap;

pub fn analyze(program: &Program, builtins: &Builtins) -> Result<(), Vec<Error>> {
    let mut analyzer = Analyzer::new(builtins);
    analyzer.analyze(program);
    if analyzer.had_error() {
        Err(analyzer.errors().to_vec())
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SymbolKind::Variable => write!(f, "variable"),
            SymbolKind::Function => write!(f, "function"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub line: LineNumber,
    pub params: usize,
}

/// ## Name and arity checks
///
/// One flat table for the whole program. Top level functions are declared
/// before anything else is walked so calls may precede definitions.
/// Every problem found is recorded and the walk keeps going.

pub struct Analyzer<'a> {
    builtins: &'a Builtins,
    symbols: HashMap<String, Symbol>,
    params: Vec<String>,
    depth: usize,
    errors: Vec<Error>,
}

impl<'a> Analyzer<'a> {
    pub fn new(builtins: &'a Builtins) -> Analyzer<'a> {
        Analyzer {
            builtins,
            symbols: HashMap::new(),
            params: vec![],
            depth: 0,
            errors: vec![],
        }
    }

    pub fn analyze(&mut self, program: &Program) {
        self.symbols.clear();
        self.params.clear();
        self.depth = 0;
        self.errors.clear();
        for stmt in &program.statements {
            if let Stmt::Function(line, name, params, _) = stmt {
                self.declare(*line, name, SymbolKind::Function, params.len());
            }
        }
        for stmt in &program.statements {
            self.statement(stmt);
        }
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    fn declare(&mut self, line: LineNumber, name: &str, kind: SymbolKind, params: usize) {
        if let Some(existing) = self.symbols.get(name) {
            let message = format!(
                "Redeclaration of '{}' (first declared at line {})",
                name, existing.line
            );
            self.errors.push(error!(Redeclaration, line; message));
            return;
        }
        let symbol = Symbol { kind, line, params };
        self.symbols.insert(name.to_string(), symbol);
    }

    fn resolve(&mut self, line: LineNumber, name: &str, expected: SymbolKind) -> Option<Symbol> {
        let error = match self.symbols.get(name) {
            Some(symbol) if symbol.kind == expected => return Some(symbol.clone()),
            Some(symbol) => {
                let message = format!("'{}' is a {}, not a {}", name, symbol.kind, expected);
                match expected {
                    SymbolKind::Variable => error!(NotAVariable, line; message),
                    SymbolKind::Function => error!(NotAFunction, line; message),
                }
            }
            None => {
                let message = format!("Undefined {}: '{}'", expected, name);
                match expected {
                    SymbolKind::Variable => error!(UndefinedVariable, line; message),
                    SymbolKind::Function => error!(UndefinedFunction, line; message),
                }
            }
        };
        self.errors.push(error);
        None
    }

    fn is_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p == name)
    }

    fn block(&mut self, stmts: &[Stmt]) {
        self.depth += 1;
        for stmt in stmts {
            self.statement(stmt);
        }
        self.depth -= 1;
    }

    fn statement(&mut self, stmt: &Stmt) {
        use Stmt::*;
        match stmt {
            Declaration(line, name, init) => {
                self.expression(init);
                self.declare(*line, name, SymbolKind::Variable, 0);
            }
            Assignment(line, name, value) => {
                if self.is_param(name) {
                    let message = format!("Cannot assign to parameter '{}'", name);
                    self.errors.push(error!(ReadOnlyParameter, *line; message));
                } else {
                    self.resolve(*line, name, SymbolKind::Variable);
                }
                self.expression(value);
            }
            Expression(_, expr) | Print(_, expr) => self.expression(expr),
            If(_, cond, then_branch, else_branch) => {
                self.expression(cond);
                self.block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.block(else_branch);
                }
            }
            Loop(_, cond, body) => {
                self.expression(cond);
                self.block(body);
            }
            Break(_) | Continue(_) => {}
            Return(_, value) => {
                if let Some(value) = value {
                    self.expression(value);
                }
            }
            Block(_, stmts) => self.block(stmts),
            Function(line, name, params, body) => {
                if self.depth > 0 {
                    self.declare(*line, name, SymbolKind::Function, params.len());
                }
                let outer = std::mem::replace(&mut self.params, params.clone());
                self.block(body);
                self.params = outer;
            }
        }
    }

    fn expression(&mut self, expr: &Expr) {
        use Expr::*;
        match expr {
            Literal(..) => {}
            Variable(line, name) => {
                if !self.is_param(name) {
                    self.resolve(*line, name, SymbolKind::Variable);
                }
            }
            Binary(_, _, lhs, rhs) => {
                self.expression(lhs);
                self.expression(rhs);
            }
            Unary(_, _, operand) => self.expression(operand),
            Call(line, name, args) => {
                self.call(*line, name, args.len());
                for arg in args {
                    self.expression(arg);
                }
            }
        }
    }

    fn call(&mut self, line: LineNumber, name: &str, argc: usize) {
        if let Some(arity) = self.builtins.arity(name) {
            if arity != argc {
                let message = format!(
                    "Built-in function '{}' expects {} argument(s), but got {}",
                    name, arity, argc
                );
                self.errors.push(error!(WrongArgumentCount, line; message));
            }
            return;
        }
        if let Some(symbol) = self.resolve(line, name, SymbolKind::Function) {
            if symbol.params != argc {
                let message = format!(
                    "Function '{}' expects {} argument(s), but got {}",
                    name, symbol.params, argc
                );
                self.errors.push(error!(WrongArgumentCount, line; message));
            }
        }
    }
}

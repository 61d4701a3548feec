use super::{Builtins, CodeGenerator};
use crate::lang::{Analyzer, Error, Keywords, Lexer, Parser};

/// Compile source text to a bytecode listing with the default keywords.
pub fn compile(source: &str, builtins: &Builtins) -> Result<Vec<String>, Vec<Error>> {
    let keywords = Keywords::new();
    Compiler::new(&keywords, builtins).compile(source)
}

/// ## Compiler pipeline
///
/// Lexer, parser, analyzer, code generator. Each stage's error flag is
/// checked before the next stage runs. Lexical and syntax errors come back
/// alone; semantic errors come back all together.

pub struct Compiler<'a> {
    keywords: &'a Keywords,
    builtins: &'a Builtins,
}

impl<'a> Compiler<'a> {
    pub fn new(keywords: &'a Keywords, builtins: &'a Builtins) -> Compiler<'a> {
        Compiler { keywords, builtins }
    }

    pub fn compile(&self, source: &str) -> Result<Vec<String>, Vec<Error>> {
        let mut lexer = Lexer::new(source, self.keywords);
        let tokens = lexer.tokenize();
        if let Some(error) = lexer.error() {
            return Err(vec![error.clone()]);
        }
        tracing::debug!(tokens = tokens.len(), "lexing complete");

        let mut parser = Parser::new(&tokens);
        let program = parser.parse();
        if let Some(error) = parser.error() {
            return Err(vec![error.clone()]);
        }
        tracing::debug!(statements = program.len(), "parsing complete");

        let mut analyzer = Analyzer::new(self.builtins);
        analyzer.analyze(&program);
        if analyzer.had_error() {
            return Err(analyzer.errors().to_vec());
        }
        tracing::debug!("semantic analysis complete");

        let bytecode = CodeGenerator::new().generate(&program);
        tracing::debug!(instructions = bytecode.len(), "code generation complete");
        Ok(bytecode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_at_first_failing_stage() {
        let builtins = Builtins::new();
        let errors = compile("TAKE x = 1;\nPOUR y;\nPOUR x", &builtins).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].stage(), crate::lang::Stage::Parser);
        let errors = compile("POUR y;\nPOUR z;", &builtins).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}

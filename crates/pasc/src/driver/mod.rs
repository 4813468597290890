//! Check pipeline orchestrating the front-end phases

use crate::common::{CompileError, CompileResult, DiagnosticReporter};
use crate::frontend::ast::Program;
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::frontend::sema::{AnalyzerConfig, SemanticAnalyzer};

/// Configuration options for a check run
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub trace_scopes: bool,
    pub verbose: bool,
}

/// Run the full front-end over one source file
///
/// Phases: lex -> parse -> analyze. The first error is rendered through
/// the reporter and returned; on success the checked tree is handed back
/// to the caller.
pub fn check_source(
    source: &str,
    config: &CheckConfig,
    reporter: &DiagnosticReporter,
    file_id: usize,
) -> CompileResult<Program> {
    // Phase 1: Lexing (optional token dump; parsing lexes on demand)
    if config.dump_tokens {
        let lexer = Lexer::new(source);
        match lexer.tokenize_all() {
            Ok(tokens) => {
                eprintln!("=== Tokens ===");
                for token in &tokens {
                    eprintln!("{:?} @ {}", token.kind, token.span);
                }
                eprintln!("=== End Tokens ===\n");
            }
            Err(e) => {
                reporter.report_error(file_id, &e);
                return Err(e);
            }
        }
    }

    // Phase 2: Parsing
    if config.verbose {
        eprintln!("Parsing...");
    }
    let program = match Parser::new(source).and_then(|mut parser| parser.parse()) {
        Ok(program) => program,
        Err(e) => {
            reporter.report_error(file_id, &e);
            return Err(e);
        }
    };

    if config.dump_ast {
        eprintln!("=== AST ===");
        eprintln!("{program:#?}");
        eprintln!("=== End AST ===\n");
    }

    // Phase 3: Semantic analysis
    if config.verbose {
        eprintln!("Analyzing...");
    }
    let mut analyzer = SemanticAnalyzer::new(AnalyzerConfig {
        trace_scopes: config.trace_scopes,
    });
    if let Err(e) = analyzer.analyze(&program) {
        let e = CompileError::from(e);
        reporter.report_error(file_id, &e);
        return Err(e);
    }

    Ok(program)
}

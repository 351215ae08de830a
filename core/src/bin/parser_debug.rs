use bumpalo::Bump;
use dataeval_core::{evaluator, parser};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(source) = env::args().nth(1) else {
        eprintln!("usage: parser_debug <expression>");
        return ExitCode::FAILURE;
    };
    let arena = Bump::new();

    let ast = match parser::parse(&arena, &source) {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("Parse Error:\n{}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("Parsed AST:\n{:#?}", ast.expr);

    match evaluator::convert(ast) {
        Ok(value) => println!("Value:\n{}", value),
        Err(e) => eprintln!("Conversion Error:\n{}", e),
    }
    ExitCode::SUCCESS
}

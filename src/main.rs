use std::{
    collections::VecDeque,
    error::Error,
    fs,
    io::{self, Read, Write},
};

use clap::{App, Arg, ArgMatches};
use minilang::error::MiniLangError;
use minilang::frontend::{ast::ParseTreeNode, lexer::Lexer, parser::Parser, token::Token};

fn main() {
    let matches = App::new("minilang")
        .version("0.1.0")
        .about("A lexer and recursive descent parser for the MiniLang toy language.")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .short('f')
                .long("file")
                .about("Path to a MiniLang source file to analyze instead of starting the prompt.")
                .takes_value(true),
        )
        .get_matches();

    match matches.value_of("file") {
        Some(_) => Runner::run_with_mode(RunMode::File, &matches)
            .unwrap_or_else(|err| eprintln!("{}: {}", err, matches.value_of("file").unwrap())),
        None => Runner::run_with_mode(RunMode::Prompt, &matches)
            .unwrap_or_else(|err| eprintln!("{}", err)),
    };
}

/// Indicate whether the front end shall be run in REPL/prompt mode or over
/// the contents of a source file.
enum RunMode {
    Prompt,
    File,
}

/// Simple struct responsible for coordinating the execution of either the
/// prompt loop or a single file analysis.
struct Runner<'a> {
    mode: RunMode,
    args: &'a ArgMatches,
}

impl<'a> Runner<'a> {
    pub fn run_with_mode(mode: RunMode, args: &'a ArgMatches) -> Result<(), Box<dyn Error>> {
        let runner = Self { mode, args };
        match runner.mode {
            RunMode::File => {
                let src = runner.load_source_file()?;
                runner.run(src.trim_end());
            }
            RunMode::Prompt => runner.run_prompt()?,
        }
        Ok(())
    }

    /// Helper function for getting the content of a file.
    fn load_source_file(&self) -> Result<String, io::Error> {
        let path = self.args.value_of("file").unwrap();
        let mut file = fs::File::open(path)?;
        let mut src = String::new();
        file.read_to_string(&mut src)?;
        Ok(src)
    }

    /// Starts a REPL like prompt used for entering single lines of MiniLang.
    /// The sentinel `exit` (case-insensitive) or ctrl+d ends the loop.
    fn run_prompt(&self) -> Result<(), io::Error> {
        show_welcome();
        let mut input = String::new();
        loop {
            print!("\u{1b}[32m> \u{1b}[0m");
            io::stdout().flush()?;
            let num_bytes = io::stdin().read_line(&mut input)?;
            if num_bytes == 0 {
                // Terminate line
                println!();
                break;
            }
            let line = input.trim();
            if line.eq_ignore_ascii_case("exit") {
                break;
            }
            if !line.is_empty() {
                self.run(line);
            }
            input.clear();
        }
        println!("\u{1b}[36m\nThank you for using the MiniLang front end!\u{1b}[0m");
        Ok(())
    }

    /// Analyzes one piece of MiniLang source: tokenize, print the token
    /// table, parse, print the tree. The first error aborts the pass and is
    /// shown to the user; the caller decides whether to keep going.
    fn run(&self, src: &str) {
        show_analyzing(src);

        let mut lexer = Lexer::new(src);
        let tokens = match lexer.tokenize() {
            Ok(tokens) => tokens,
            Err(e) => {
                show_error(&e);
                return;
            }
        };
        show_tokens(&tokens);

        let mut parser = Parser::new(tokens);
        match parser.parse() {
            Ok(parse_tree) => show_parse_tree(&parse_tree),
            Err(e) => show_error(&e),
        }
    }
}

//-----------
// CONSOLE UI
//-----------

fn show_welcome() {
    let header = [
        "╔═══════════════════════════════════════════╗",
        "║     MiniLang - Lexical and Syntax         ║",
        "║              Analysis                     ║",
        "╚═══════════════════════════════════════════╝",
    ];
    for line in header.iter() {
        println!("\u{1b}[36m{}\u{1b}[0m", line);
    }

    let features = [
        "┌──────────────── Supported Features ────────────────┐",
        "│                                                    │",
        "│  • Variable declarations (int, float, double,      │",
        "│    string) with assignment type checking           │",
        "│  • Arithmetic operations (+, -, *, /)              │",
        "│  • Comparisons (==, !=, <, >, <=, >=)              │",
        "│  • If-else statements                              │",
        "│  • Parentheses for expression grouping             │",
        "│                                                    │",
        "└────────────────────────────────────────────────────┘",
    ];
    println!();
    for line in features.iter() {
        println!("\u{1b}[33m{}\u{1b}[0m", line);
    }

    println!("\nEnter your program (type 'exit' to quit):");
    println!("───────────────────");
}

fn show_analyzing(input: &str) {
    println!("\u{1b}[36m\nAnalyzing: {}\u{1b}[0m", input);
    println!("\u{1b}[36m{}\u{1b}[0m", "-".repeat(input.chars().count() + 11));
}

fn show_tokens(tokens: &VecDeque<Token>) {
    println!("\u{1b}[36m\nTokens:\u{1b}[0m");
    for token in tokens {
        println!("  \u{1b}[36m{:<15}\u{1b}[0m | {}", token.kind, token.value);
    }
}

fn show_parse_tree(parse_tree: &ParseTreeNode) {
    println!("\u{1b}[33m\nParse Tree:\u{1b}[0m");
    print!("\u{1b}[33m{}\u{1b}[0m", parse_tree);
    println!("\n───────────────────");
}

fn show_error(err: &MiniLangError) {
    eprintln!("\u{1b}[31m\nError: {}\u{1b}[0m", err);
}

//! The Rill front-end driver.
//!
//! `rillc <source_file> <output_file>` starts an interactive menu:
//!
//! - `0` - exit
//! - `1` - print the source with comments stripped
//! - `2` - print the token stream
//! - `3` - parse and write the parse-tree listing to `<output_file>`
//! - `4` - parse and report elapsed wall-clock time
//!
//! The grammar, FIRST/FOLLOW sets, parse table, and keyword table are all
//! built once at startup and shared by every menu action.

use std::fs::{self, File};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;

use rill_common::diag::Diagnostics;
use rill_common::trie::KeywordTable;
use rill_lexer::{strip_comments, Scanner};
use rill_parser::{
    parse_source, write_parse_tree, FirstFollow, Grammar, ParseOutcome, ParseTable,
};

#[derive(Parser)]
#[command(name = "rillc", version, about = "Front end for the Rill language")]
struct Cli {
    /// Rill source file to analyse
    source: PathBuf,

    /// Output file for the parse-tree listing
    output: PathBuf,
}

const MENU: &str = "\nWhat would you like to do?\n\
  0) Exit\n\
  1) Remove Comments (print cleaned source)\n\
  2) Print Token Stream\n\
  3) Parse Source Code and Print Parse Tree\n\
  4) Parse Source Code and Report Time Taken\n\
==> ";

/// Immutable parsing infrastructure shared across menu actions.
struct Frontend {
    grammar: Grammar,
    table: ParseTable,
    keywords: KeywordTable,
}

fn main() {
    let cli = Cli::parse();

    let grammar = Grammar::language();
    let ff = FirstFollow::compute(&grammar);
    let table = ParseTable::build(&ff);
    let frontend = Frontend {
        grammar,
        table,
        keywords: KeywordTable::new(),
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{MENU}");
        let _ = io::stdout().flush();
        let Some(Ok(line)) = lines.next() else {
            break;
        };

        let result = match line.trim().parse::<u32>() {
            Ok(0) => return,
            Ok(1) => remove_comments(&cli.source),
            Ok(2) => print_token_stream(&cli.source, &frontend),
            Ok(3) => parse_and_print_tree(&cli.source, &cli.output, &frontend),
            Ok(4) => parse_and_report_time(&cli.source, &frontend),
            _ => {
                println!("Invalid choice. Please enter 0-4.");
                Ok(())
            }
        };
        if let Err(e) = result {
            eprintln!("error: {e}");
        }
    }
}

/// Menu option 1: print the cleaned source, comments replaced by blank
/// lines so the line count is preserved.
fn remove_comments(source: &Path) -> io::Result<()> {
    let text = fs::read_to_string(source)?;
    println!("---- Cleaned Source (no comments) ----");
    print!("{}", strip_comments(&text));
    println!();
    println!("--------------------------------------");
    Ok(())
}

/// Menu option 2: print every token, comments included, interleaving
/// lexical error reports where they occur.
fn print_token_stream(source: &Path, frontend: &Frontend) -> io::Result<()> {
    let file = File::open(source)?;
    let mut scanner = Scanner::new(file, &frontend.keywords)?;
    let mut diags = Diagnostics::new();

    println!("---- Token Stream ----");
    loop {
        let tok = scanner.next_lexeme(&mut diags)?;
        for diag in diags.drain() {
            println!("{diag}");
        }
        let Some(tok) = tok else { break };
        println!(
            "Line no. {}  Lexeme {:<20}  Token {}",
            tok.line,
            tok.lexeme,
            tok.kind.name()
        );
    }
    println!("----------------------");
    Ok(())
}

/// Run one parse over the source file.
fn parse(source: &Path, frontend: &Frontend) -> io::Result<ParseOutcome> {
    let file = File::open(source)?;
    parse_source(file, &frontend.grammar, &frontend.table, &frontend.keywords)
}

/// Print the recorded diagnostics in source order, then the verdict line.
fn report(outcome: &ParseOutcome) {
    for diag in outcome.diagnostics.iter() {
        println!("{diag}");
    }
    if outcome.success {
        println!("COMPILATION SUCCESS!");
    } else {
        println!("COMPILATION FAILED");
    }
}

/// Menu option 3: parse and write the parse-tree listing.
fn parse_and_print_tree(source: &Path, output: &Path, frontend: &Frontend) -> io::Result<()> {
    println!("Parsing...");
    let outcome = parse(source, frontend)?;
    report(&outcome);

    let mut out = BufWriter::new(File::create(output)?);
    write_parse_tree(&outcome.tree, &mut out)?;
    out.flush()?;
    println!("Parse tree written to: {}", output.display());
    Ok(())
}

/// Menu option 4: parse and report elapsed wall-clock time. The parse
/// result itself is not printed in this mode.
fn parse_and_report_time(source: &Path, frontend: &Frontend) -> io::Result<()> {
    println!("Parsing...");
    let started = Instant::now();
    let _outcome = parse(source, frontend)?;
    let elapsed = started.elapsed();

    println!("Parsing complete.");
    println!("Time (sec)  : {:.6}", elapsed.as_secs_f64());
    Ok(())
}

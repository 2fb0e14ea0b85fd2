use clap::{App, Arg};
use std::fmt::Write as _;
use std::process::exit;
use std::{fs, io};

use common::TokenKind;
use lex_core::{build_dfa, Lexer, RuleSet};

// tokenize the source with a dfa generated from the rule file; one token per
// line into the conventional token file, a lexical error stops everything
fn main() -> io::Result<()> {
  let m = App::new("scanner")
    .about("Generate a scanner from a lexical rule file and tokenize a source file")
    .arg(Arg::with_name("source").required(true))
    .arg(Arg::with_name("rules").required(true))
    .arg(Arg::with_name("output").long("output").short("o").takes_value(true).value_name("path")
      .help("Token file to write (default tokens.txt)"))
    .arg(Arg::with_name("verbose").long("verbose").help("Print dfa statistics to stderr"))
    .get_matches();

  let source = fs::read(m.value_of("source").unwrap())?;
  let rules_text = fs::read_to_string(m.value_of("rules").unwrap())?;
  let rules = RuleSet::parse(&rules_text).unwrap_or_else(|e| {
    eprintln!("scanner: {}", e);
    exit(1);
  });

  let dfa = build_dfa(&rules);
  if m.is_present("verbose") {
    eprintln!("scanner: minimized dfa has {} states", dfa.states.len());
  }

  let mut lexer = Lexer::new(&source, &dfa);
  let mut out = String::new();
  loop {
    let tok = lexer.next_token();
    if tok.kind == TokenKind::Error {
      eprintln!("scanner: illegal character `{}` at line {}, column {}", tok.lexeme, tok.line, tok.col);
      exit(1);
    }
    let _ = writeln!(out, "{}", tok);
    if tok.kind == TokenKind::EndFile {
      break;
    }
  }
  fs::write(m.value_of("output").unwrap_or("tokens.txt"), out)
}

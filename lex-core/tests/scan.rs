use common::TokenKind;
use lex_core::{build_dfa, Lexer, RuleSet};

const RULES: &str = include_str!("../../demos/minic.lex");
const SOURCE: &str = include_str!("../../demos/sum.mc");

fn scan(src: &str) -> Vec<common::Token> {
  let rules = RuleSet::parse(RULES).unwrap();
  let dfa = build_dfa(&rules);
  let mut lexer = Lexer::new(src.as_bytes(), &dfa);
  let mut out = Vec::new();
  loop {
    let tok = lexer.next_token();
    let end = tok.kind == TokenKind::EndFile;
    out.push(tok);
    if end { break; }
  }
  out
}

#[test]
fn full_rule_set_scans_the_demo_program() {
  let toks = scan(SOURCE);
  // no lexical errors anywhere in the demo
  assert!(toks.iter().all(|t| t.kind != TokenKind::Error));
  assert_eq!(toks.last().unwrap().kind, TokenKind::EndFile);
  // keywords lex as keywords, not identifiers
  assert!(toks.iter().any(|t| t.kind == TokenKind::While && t.lexeme == "while"));
  assert!(toks.iter().any(|t| t.kind == TokenKind::Read));
  // `limit` starts with the spelling of no keyword but must still be one ID token
  assert!(toks.iter().any(|t| t.kind == TokenKind::Id && t.lexeme == "limit"));
}

#[test]
fn adjacent_tokens_split_without_spaces() {
  let toks = scan("int x=1;\nif(x>=10){x=x-1;}");
  let kinds = toks.iter().map(|t| t.kind).collect::<Vec<_>>();
  use TokenKind::*;
  assert_eq!(kinds, vec![
    Int, Id, Assign, Num, Semi,
    If, LParen, Id, Gte, Num, RParen, LBrace, Id, Assign, Id, Minus, Num, Semi, RBrace,
    EndFile,
  ]);
  // second line positions
  let if_tok = toks.iter().find(|t| t.kind == If).unwrap();
  assert_eq!((if_tok.line, if_tok.col), (2, 1));
}

#[test]
fn token_file_lines_round_trip_format() {
  let toks = scan("int x;\n");
  let lines = toks.iter().map(|t| t.to_string()).collect::<Vec<_>>();
  assert_eq!(lines[0], "INT : int (1,1)");
  assert_eq!(lines[1], "ID : x (1,5)");
  assert_eq!(lines[2], "SEMI : ; (1,6)");
  assert_eq!(lines[3], "ENDFILE (2,1)");
}

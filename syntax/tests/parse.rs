use common::{Token, TokenKind};
use slr_core::{conflict, lr0, table::mk_table, FirstFollow, Grammar, RawGrammar, Table};
use syntax::quad::{QuadOp, Rel};
use syntax::{Driver, ParseResult, SynError};

const MINIC: &str = include_str!("../../demos/minic.grammar");

fn minic() -> (Grammar, Table, usize) {
  let g = RawGrammar::parse(MINIC).extend().unwrap();
  let ff = FirstFollow::new(&g);
  let fsm = lr0::work(&g);
  let mut table = mk_table(&fsm, &g, &ff);
  let conflicts = conflict::solve(&mut table, &g);
  (g, table, conflicts.len())
}

// whitespace-separated test inputs, classified the way the scanner would
fn toks(src: &str) -> Vec<Token> {
  use TokenKind::*;
  src.split_whitespace().enumerate().map(|(i, w)| {
    let kind = match w {
      "int" => Int, "void" => Void, "if" => If, "else" => Else, "while" => While,
      "return" => Return, "read" => Read, "write" => Write,
      "=" => Assign, "+" => Plus, "-" => Minus, "*" => Mult, "/" => Div,
      "<" => Lt, ">" => Gt, "<=" => Lte, ">=" => Gte, "==" => Eq, "!=" => Neq,
      "(" => LParen, ")" => RParen, "{" => LBrace, "}" => RBrace, ";" => Semi, "," => Comma,
      _ if w.bytes().all(|b| b.is_ascii_digit()) => Num,
      _ => Id,
    };
    Token::new(kind, w, 1, i as u32 + 1)
  }).collect()
}

fn parse(src: &str) -> Result<ParseResult, SynError> {
  let (g, table, _) = minic();
  Driver::new(&g, &table).parse(&toks(src))
}

fn quad_lines(r: &ParseResult) -> Vec<String> {
  r.quads.to_string().lines().map(str::to_owned).collect()
}

#[test]
fn minic_grammar_has_only_the_dangling_else_conflict() {
  let (g, _, conflicts) = minic();
  assert_eq!(conflicts, 1);
  assert_eq!(g.name, "MiniC");
}

#[test]
fn simple_expression_ir() {
  let r = parse("int main ( ) { int x ; x = 1 + 2 * 3 ; }").unwrap();
  let lines = quad_lines(&r);
  assert_eq!(lines[0], "0: (*, 2, 3, t1)");
  assert_eq!(lines[1], "1: (+, 1, t1, t2)");
  assert!(lines[2].starts_with("2: (=, t2, _, x@"), "got {}", lines[2]);
  assert_eq!(lines.len(), 3);
}

#[test]
fn if_without_else() {
  let r = parse("int main ( ) { int a ; int b ; int x ; if ( a < b ) x = 1 ; }").unwrap();
  let q = r.quads.quads();
  assert_eq!(q.len(), 3);
  assert_eq!(q[0].op, QuadOp::If(Rel::Lt));
  assert_eq!(q[0].target, 2);
  assert_eq!(q[1].op, QuadOp::Goto);
  assert_eq!(q[1].target, 3);
  assert_eq!(q[2].op, QuadOp::Assign);
  assert_eq!(q[2].a1, "1");
}

#[test]
fn if_with_else() {
  let r = parse("int main ( ) { int x ; if ( x == 0 ) x = 1 ; else x = 2 ; }").unwrap();
  let q = r.quads.quads();
  assert_eq!(q.len(), 5);
  assert_eq!(q[0].op, QuadOp::If(Rel::Eq));
  // true branch starts right after the two condition quads
  assert_eq!(q[0].target, 2);
  // false jump lands on the else branch, behind the end jump of the then branch
  assert_eq!(q[1].target, 4);
  // the then branch ends by jumping past the else branch
  assert_eq!(q[3].op, QuadOp::Goto);
  assert_eq!(q[3].target, 5);
  assert_eq!(q[4].a1, "2");
}

#[test]
fn while_loop() {
  let r = parse("int main ( ) { int i ; int n ; while ( i < n ) i = i + 1 ; }").unwrap();
  let q = r.quads.quads();
  assert_eq!(q.len(), 5);
  // condition first, body next, then the back edge
  assert_eq!(q[0].op, QuadOp::If(Rel::Lt));
  assert_eq!(q[0].target, 2);
  assert_eq!(q[4].op, QuadOp::Goto);
  assert_eq!(q[4].target, 0);
  // the false exit lands immediately after the back edge
  assert_eq!(q[1].target, 5);
}

#[test]
fn nested_if_binds_else_to_nearest() {
  let r = parse("int main ( ) { int a ; int x ; if ( a < 1 ) if ( a < 2 ) x = 1 ; else x = 2 ; }").unwrap();
  let q = r.quads.quads();
  // outer cond (0,1), inner cond (2,3), then (4), end jump (5), else (6)
  assert_eq!(q.len(), 7);
  // inner else: false jump of the inner condition targets the else branch
  assert_eq!(q[3].target, 6);
  // outer false jump exits the whole statement
  assert_eq!(q[1].target, 7);
}

#[test]
fn read_write_statements() {
  let r = parse("int main ( ) { int x ; read x ; write x + 1 ; }").unwrap();
  let lines = quad_lines(&r);
  assert!(lines[0].starts_with("0: (read, _, _, x@"));
  assert!(lines[1].contains("(+, x@"));
  assert!(lines[2].starts_with("2: (write, t1, _, _)"));
}

#[test]
fn returns_and_functions() {
  let r = parse("int inc ( int a ) { return a + 1 ; } void main ( ) { return ; }").unwrap();
  let q = r.quads.quads();
  assert_eq!(q[0].op, QuadOp::Add);
  assert_eq!(q[1].op, QuadOp::Retv);
  assert_eq!(q[1].a1, "t1");
  assert_eq!(q[2].op, QuadOp::Ret);
  // both functions landed in the archive with their parameter lists
  let funcs = r.symtab.archive().iter().filter(|(_, e)| e.kind == syntax::SymKind::Func).count();
  assert_eq!(funcs, 2);
}

#[test]
fn global_initializer() {
  let r = parse("int g = 4 ; void main ( ) { g = g + 1 ; }").unwrap();
  let lines = quad_lines(&r);
  assert!(lines[0].starts_with("0: (=, 4, _, g@1#"));
  assert!(lines[1].contains("(+, g@1#"));
}

#[test]
fn shadowing_targets_the_inner_variable() {
  let r = parse("int main ( ) { int x ; { int x ; x = 1 ; } x = 2 ; }").unwrap();
  let q = r.quads.quads();
  assert_eq!(q.len(), 2);
  assert_ne!(q[0].res, q[1].res);
  assert!(q[0].res.starts_with("x@3#"));
  assert!(q[1].res.starts_with("x@2#"));
}

#[test]
fn syntactic_failure_names_state_and_terminal() {
  let err = parse("int main ( ) { int ; }").unwrap_err();
  match err {
    SynError::NoAction { term, .. } => assert_eq!(term, ";"),
    e => panic!("expected NoAction, got {:?}", e),
  }
}

#[test]
fn semantic_failures() {
  assert!(matches!(
    parse("int main ( ) { x = 1 ; }").unwrap_err(),
    SynError::UndefinedVariable { .. }
  ));
  assert!(matches!(
    parse("int main ( ) { int x ; int x ; }").unwrap_err(),
    SynError::Redefinition { .. }
  ));
  assert!(matches!(
    parse("int main ( ) { void x ; }").unwrap_err(),
    SynError::VoidVariable { .. }
  ));
  assert!(matches!(
    parse("void main ( ) { return 1 ; }").unwrap_err(),
    SynError::ReturnTypeMismatch { .. }
  ));
  assert!(matches!(
    parse("int main ( ) { return ; }").unwrap_err(),
    SynError::ReturnTypeMismatch { .. }
  ));
  assert!(matches!(
    parse("void f ( ) { } void main ( ) { write f ; }").unwrap_err(),
    SynError::FunctionAsValue { .. }
  ));
  assert!(matches!(
    parse("int f ( int a , int a ) { return a ; }").unwrap_err(),
    SynError::DuplicateParameter { .. }
  ));
  assert!(matches!(
    parse("int f ( void a ) { return 0 ; }").unwrap_err(),
    SynError::VoidParameter { .. }
  ));
  // a function may not be redefined at the global scope either
  assert!(matches!(
    parse("void f ( ) { } int f ( ) { return 0 ; }").unwrap_err(),
    SynError::Redefinition { .. }
  ));
}

#[test]
fn lexical_error_token_is_fatal() {
  let (g, table, _) = minic();
  let tokens = vec![Token::new(TokenKind::Error, "@", 1, 1)];
  assert!(matches!(
    Driver::new(&g, &table).parse(&tokens).unwrap_err(),
    SynError::LexicalError { .. }
  ));
}

const PROGRAM: &str = "\
int limit = 100 ; \
void main ( ) { \
  int i ; int sum ; \
  i = 0 ; sum = 0 ; \
  read i ; \
  while ( i > 0 ) { \
    sum = sum + i * i ; \
    i = i - 1 ; \
  } \
  if ( sum >= limit ) { write sum ; } else { write limit - sum ; } \
  return ; \
}";

#[test]
fn parses_from_token_file_text() {
  // the same path the parser process takes: scanner output text -> tokens
  let text = "\
INT : int (1,1)
ID : main (1,5)
LPAREN : ( (1,9)
RPAREN : ) (1,10)
LBRACE : { (1,12)
INT : int (2,3)
ID : x (2,7)
SEMI : ; (2,8)
ID : x (3,3)
ASSIGN : = (3,5)
NUM : 7 (3,7)
SEMI : ; (3,8)
RBRACE : } (4,1)
ENDFILE (4,2)
";
  let (g, table, _) = minic();
  let tokens = syntax::token_file::load_tokens(text);
  let r = Driver::new(&g, &table).parse(&tokens).unwrap();
  let lines = quad_lines(&r);
  assert_eq!(lines.len(), 1);
  assert!(lines[0].starts_with("0: (=, 7, _, x@"));
}

#[test]
fn token_without_grammar_terminal_is_rejected() {
  // a grammar with no `read` terminal cannot accept a READ token
  let text = "START_SYMBOL S\nS -> id ;\n";
  let g = RawGrammar::parse(text).extend().unwrap();
  let ff = FirstFollow::new(&g);
  let fsm = lr0::work(&g);
  let mut table = mk_table(&fsm, &g, &ff);
  let _ = conflict::solve(&mut table, &g);
  let tokens = vec![Token::new(TokenKind::Read, "read", 1, 1)];
  assert!(matches!(
    Driver::new(&g, &table).parse(&tokens).unwrap_err(),
    SynError::UnknownTerminal { .. }
  ));
}

#[test]
fn no_dangling_jumps_after_success() {
  let r = parse(PROGRAM).unwrap();
  let len = r.quads.len() as i32;
  for q in r.quads.quads() {
    if q.op.is_jump() {
      assert!(q.target >= 0 && q.target <= len, "unresolved jump {:?}", q);
    }
  }
}

#[test]
fn scope_stack_balanced_after_success() {
  let r = parse(PROGRAM).unwrap();
  assert_eq!(r.symtab.depth(), 1);
}

#[test]
fn ir_names_unique_across_program() {
  let r = parse(PROGRAM).unwrap();
  let mut names = r.symtab.archive().iter().map(|(_, e)| e.ir_name.clone()).collect::<Vec<_>>();
  let total = names.len();
  names.sort();
  names.dedup();
  assert_eq!(names.len(), total);
  // locals from popped scopes are still in the archive
  assert!(total >= 4);
}

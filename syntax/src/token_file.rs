use common::{Token, TokenKind};

// grammar-terminal name used for ACTION lookup; `None` only for ENDFILE and
// ERROR, which the driver handles before the lookup
pub fn term_name(kind: TokenKind) -> Option<&'static str> {
  use TokenKind::*;
  Some(match kind {
    Id => "id",
    Num => "num",
    Int => "int", Void => "void", If => "if", Else => "else",
    While => "while", Return => "return", Read => "read", Write => "write",
    Assign => "=", Plus => "+", Minus => "-", Mult => "*", Div => "/",
    Gt => ">", Lt => "<", Gte => ">=", Lte => "<=", Eq => "==", Neq => "!=",
    LParen => "(", RParen => ")", LBrace => "{", RBrace => "}",
    Semi => ";", Comma => ",",
    EndFile | Error => return None,
  })
}

// `(line,column)` as written by the scanner
fn parse_pos(field: &str) -> Option<(u32, u32)> {
  let inner = field.strip_prefix('(')?.strip_suffix(')')?;
  let mut it = inner.splitn(2, ',');
  let line = it.next()?.trim().parse().ok()?;
  let col = it.next()?.trim().parse().ok()?;
  Some((line, col))
}

// reload the scanner's output: one token per line, `KIND : lexeme (l,c)`;
// ENDFILE lines are skipped, unreadable lines are reported and skipped
pub fn load_tokens(text: &str) -> Vec<Token> {
  let mut tokens = Vec::new();
  for line in text.lines() {
    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    let mut fields = line.split_whitespace();
    let kind = match fields.next().and_then(TokenKind::from_name) {
      Some(k) => k,
      None => {
        eprintln!("token file: unreadable line skipped: {}", line);
        continue;
      }
    };
    if kind == TokenKind::EndFile {
      continue;
    }
    let (lexeme, pos) = match (fields.next(), fields.next(), fields.next()) {
      (Some(":"), Some(lexeme), Some(pos)) => (lexeme, pos),
      _ => {
        eprintln!("token file: unreadable line skipped: {}", line);
        continue;
      }
    };
    let (line_no, col) = parse_pos(pos).unwrap_or((0, 0));
    tokens.push(Token::new(kind, lexeme, line_no, col));
  }
  tokens
}

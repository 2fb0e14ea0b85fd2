use common::{Token, TokenKind};
use crate::dfa::Dfa;

// drives the generated dfa over raw bytes, longest match wins
pub struct Lexer<'a> {
  src: &'a [u8],
  dfa: &'a Dfa,
  pos: usize,
  line: u32,
  col: u32,
}

fn is_whitespace(b: u8) -> bool {
  b == b' ' || b == b'\t' || b == b'\r' || b == b'\n'
}

impl<'a> Lexer<'a> {
  pub fn new(src: &'a [u8], dfa: &'a Dfa) -> Lexer<'a> {
    Lexer { src, dfa, pos: 0, line: 1, col: 1 }
  }

  // eat one byte, maintaining line/column
  fn advance(&mut self) {
    if self.src[self.pos] == b'\n' {
      self.line += 1;
      self.col = 1;
    } else {
      self.col += 1;
    }
    self.pos += 1;
  }

  fn skip_whitespace(&mut self) {
    while self.pos < self.src.len() && is_whitespace(self.src[self.pos]) {
      self.advance();
    }
  }

  pub fn next_token(&mut self) -> Token {
    self.skip_whitespace();
    if self.pos >= self.src.len() {
      return Token::new(TokenKind::EndFile, "", self.line, self.col);
    }
    let (start, line, col) = (self.pos, self.line, self.col);

    // probe the dfa ahead of `pos`, remembering the most recent accept
    let mut state = 0u32;
    let mut last_accept: Option<(usize, TokenKind)> = None;
    let mut i = self.pos;
    while i < self.src.len() {
      match self.dfa.states[state as usize].trans.get(&self.src[i]) {
        Some(&next) => {
          state = next;
          i += 1;
          if let Some(kind) = self.dfa.states[state as usize].accept {
            last_accept = Some((i, kind));
          }
        }
        None => break,
      }
    }

    if let Some((end, kind)) = last_accept {
      // commit byte by byte so line/column stay correct
      while self.pos < end {
        self.advance();
      }
      let lexeme = String::from_utf8_lossy(&self.src[start..end]).into_owned();
      return Token::new(kind, lexeme, line, col);
    }

    // nothing ever accepted: consume exactly one byte to guarantee progress
    let bad = self.src[self.pos];
    self.advance();
    Token::new(TokenKind::Error, String::from_utf8_lossy(&[bad]).into_owned(), line, col)
  }
}

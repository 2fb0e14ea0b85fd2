use std::fmt;

pub type Result<T> = std::result::Result<T, SynError>;

// everything that stops a parse; there is no recovery, the first one wins
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SynError {
  LexicalError { lexeme: String, line: u32, col: u32 },
  UnknownTerminal { name: String },
  NoAction { state: u32, term: String, line: u32, col: u32 },
  NoGoto { state: u32, nt: String },
  UndefinedVariable { name: String, line: u32, col: u32 },
  Redefinition { name: String, line: u32, col: u32 },
  FunctionAsValue { name: String, line: u32, col: u32 },
  TypeMismatch { context: &'static str, line: u32, col: u32 },
  VoidVariable { name: String, line: u32, col: u32 },
  VoidParameter { name: String },
  DuplicateParameter { name: String },
  ReturnOutsideFunction { line: u32, col: u32 },
  ReturnTypeMismatch { line: u32, col: u32 },
  UnbalancedElseJumps,
}

impl fmt::Display for SynError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::LexicalError { lexeme, line, col } => {
        write!(f, "lexical error: illegal character `{}` at ({},{})", lexeme, line, col)
      }
      Self::UnknownTerminal { name } => {
        write!(f, "token kind `{}` has no grammar terminal", name)
      }
      Self::NoAction { state, term, line, col } => {
        write!(f, "syntax error: no action in state {} on `{}` at ({},{})", state, term, line, col)
      }
      Self::NoGoto { state, nt } => {
        write!(f, "syntax error: no goto in state {} on {}", state, nt)
      }
      Self::UndefinedVariable { name, line, col } => {
        write!(f, "undefined identifier `{}` at ({},{})", name, line, col)
      }
      Self::Redefinition { name, line, col } => {
        write!(f, "`{}` redefined in the current scope at ({},{})", name, line, col)
      }
      Self::FunctionAsValue { name, line, col } => {
        write!(f, "function `{}` used as a variable at ({},{})", name, line, col)
      }
      Self::TypeMismatch { context, line, col } => {
        write!(f, "type mismatch in {} at ({},{})", context, line, col)
      }
      Self::VoidVariable { name, line, col } => {
        write!(f, "variable `{}` declared void at ({},{})", name, line, col)
      }
      Self::VoidParameter { name } => write!(f, "parameter `{}` declared void", name),
      Self::DuplicateParameter { name } => write!(f, "duplicate parameter `{}`", name),
      Self::ReturnOutsideFunction { line, col } => {
        write!(f, "return outside of a function at ({},{})", line, col)
      }
      Self::ReturnTypeMismatch { line, col } => {
        write!(f, "return type does not match the function at ({},{})", line, col)
      }
      Self::UnbalancedElseJumps => write!(f, "unbalanced if-else end-jump stack"),
    }
  }
}

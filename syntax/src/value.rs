use crate::symtab::Ty;

// the value carried for one expression on the semantic stack
#[derive(Clone, Debug)]
pub struct ExprVal {
  pub ty: Ty,
  // a variable's unique ir name, a literal, or a temporary
  pub place: String,
  // index of the first quad of this expression's code, or the next quad
  // index when it emitted none
  pub begin: usize,
}

// a boolean condition: unresolved jump lists threaded for backpatching
#[derive(Clone, Debug, Default)]
pub struct BoolVal {
  pub truelist: Vec<usize>,
  pub falselist: Vec<usize>,
  pub begin: usize,
}

#[derive(Clone, Debug, Default)]
pub struct StmtVal {
  pub nextlist: Vec<usize>,
  pub begin: usize,
}

// one tagged union per grammar symbol on the stack
#[derive(Clone, Debug)]
pub enum SemValue {
  Empty,
  Type(Ty),
  Id { name: String, line: u32, col: u32 },
  Num(String),
  Expr(ExprVal),
  Bool(BoolVal),
  Stmt(StmtVal),
  Op(String),
}

impl SemValue {
  pub fn as_type(&self) -> Option<Ty> {
    match self {
      SemValue::Type(t) => Some(*t),
      _ => None,
    }
  }

  pub fn as_expr(&self) -> Option<&ExprVal> {
    match self {
      SemValue::Expr(e) => Some(e),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<&BoolVal> {
    match self {
      SemValue::Bool(b) => Some(b),
      _ => None,
    }
  }

  // statements that carry no jump information degrade to an empty StmtVal
  pub fn as_stmt(&self, next_quad: usize) -> StmtVal {
    match self {
      SemValue::Stmt(s) => s.clone(),
      _ => StmtVal { nextlist: Vec::new(), begin: next_quad },
    }
  }
}

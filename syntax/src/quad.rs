use std::fmt;

// relational comparisons keep their source spelling for the `ifxx` opcodes
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Rel {
  Lt,
  Gt,
  Le,
  Ge,
  Eq,
  Ne,
}

impl Rel {
  pub fn from_op(op: &str) -> Option<Rel> {
    Some(match op {
      "<" => Rel::Lt, ">" => Rel::Gt, "<=" => Rel::Le,
      ">=" => Rel::Ge, "==" => Rel::Eq, "!=" => Rel::Ne,
      _ => return None,
    })
  }
}

impl fmt::Display for Rel {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(match self {
      Rel::Lt => "<", Rel::Gt => ">", Rel::Le => "<=",
      Rel::Ge => ">=", Rel::Eq => "==", Rel::Ne => "!=",
    })
  }
}

// the closed opcode set of the linear IR
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum QuadOp {
  Add,
  Sub,
  Mul,
  Div,
  Assign,
  If(Rel),
  IfNz,
  Goto,
  Ret,
  Retv,
  Read,
  Write,
}

impl QuadOp {
  pub fn is_jump(self) -> bool {
    matches!(self, QuadOp::If(_) | QuadOp::IfNz | QuadOp::Goto)
  }
}

#[derive(Clone, Debug)]
pub struct Quad {
  pub op: QuadOp,
  pub a1: String,
  pub a2: String,
  pub res: String,
  // quad index for jumps, -1 while unresolved
  pub target: i32,
}

// append-only quad list with deferred jump resolution
#[derive(Default, Debug)]
pub struct QuadList {
  quads: Vec<Quad>,
}

impl QuadList {
  pub fn new() -> QuadList {
    QuadList { quads: Vec::new() }
  }

  // index the next emitted quad will get
  pub fn next_quad(&self) -> usize {
    self.quads.len()
  }

  pub fn emit(&mut self, op: QuadOp, a1: impl Into<String>, a2: impl Into<String>, res: impl Into<String>, target: i32) -> usize {
    self.quads.push(Quad { op, a1: a1.into(), a2: a2.into(), res: res.into(), target });
    self.quads.len() - 1
  }

  // resolve every listed jump to `target`
  pub fn backpatch(&mut self, list: &[usize], target: usize) {
    for &i in list {
      debug_assert!(self.quads[i].op.is_jump());
      self.quads[i].target = target as i32;
    }
  }

  pub fn quads(&self) -> &[Quad] {
    &self.quads
  }

  pub fn len(&self) -> usize {
    self.quads.len()
  }

  pub fn is_empty(&self) -> bool {
    self.quads.is_empty()
  }
}

impl fmt::Display for Quad {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self.op {
      QuadOp::Add | QuadOp::Sub | QuadOp::Mul | QuadOp::Div => {
        let op = match self.op {
          QuadOp::Add => "+", QuadOp::Sub => "-", QuadOp::Mul => "*", QuadOp::Div => "/",
          _ => unreachable!(),
        };
        write!(f, "({}, {}, {}, {})", op, self.a1, self.a2, self.res)
      }
      QuadOp::Assign => write!(f, "(=, {}, _, {})", self.a1, self.res),
      QuadOp::If(rel) => write!(f, "(if{}, {}, {}, _, {})", rel, self.a1, self.a2, self.target),
      QuadOp::IfNz => write!(f, "(ifnz, {}, _, _, {})", self.a1, self.target),
      QuadOp::Goto => write!(f, "(goto, _, _, _, {})", self.target),
      QuadOp::Ret => write!(f, "(ret, _, _, _)"),
      QuadOp::Retv => write!(f, "(retv, {}, _, _)", self.a1),
      QuadOp::Read => write!(f, "(read, _, _, {})", self.res),
      QuadOp::Write => write!(f, "(write, {}, _, _)", self.a1),
    }
  }
}

impl fmt::Display for QuadList {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for (i, q) in self.quads.iter().enumerate() {
      writeln!(f, "{}: {}", i, q)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_shapes() {
    let mut q = QuadList::new();
    q.emit(QuadOp::Mul, "2", "3", "t1", -1);
    q.emit(QuadOp::Assign, "t1", "", "x@1#1", -1);
    q.emit(QuadOp::If(Rel::Lt), "a", "b", "", -1);
    q.emit(QuadOp::Goto, "", "", "", -1);
    q.backpatch(&[2], 0);
    q.backpatch(&[3], 4);
    let text = q.to_string();
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "0: (*, 2, 3, t1)");
    assert_eq!(lines[1], "1: (=, t1, _, x@1#1)");
    assert_eq!(lines[2], "2: (if<, a, b, _, 0)");
    assert_eq!(lines[3], "3: (goto, _, _, _, 4)");
  }

  #[test]
  fn backpatch_resolves() {
    let mut q = QuadList::new();
    let i = q.emit(QuadOp::IfNz, "x", "", "", -1);
    let j = q.emit(QuadOp::Goto, "", "", "", -1);
    assert_eq!(q.quads()[i].target, -1);
    q.backpatch(&[i, j], 7);
    assert_eq!(q.quads()[i].target, 7);
    assert_eq!(q.quads()[j].target, 7);
  }
}

use std::fmt;
use common::IndexMap;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Ty {
  Int,
  Void,
  Bool,
}

impl fmt::Display for Ty {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(match self {
      Ty::Int => "int", Ty::Void => "void", Ty::Bool => "bool",
    })
  }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SymKind {
  Var,
  Func,
  Param,
}

impl fmt::Display for SymKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(match self {
      SymKind::Var => "var", SymKind::Func => "func", SymKind::Param => "param",
    })
  }
}

#[derive(Clone, Debug)]
pub struct SymEntry {
  pub kind: SymKind,
  pub ty: Ty,
  pub params: Vec<Ty>,
  // unique across the whole program, used as the IR operand name
  pub ir_name: String,
  pub depth: usize,
}

// a stack of insertion-ordered scopes; index 0 is the global scope; every
// entry is also archived so the dump survives scope pops
#[derive(Debug)]
pub struct ScopeStack {
  scopes: Vec<IndexMap<String, SymEntry>>,
  archive: Vec<(String, SymEntry)>,
  unique: u32,
}

impl ScopeStack {
  pub fn new() -> ScopeStack {
    ScopeStack { scopes: vec![IndexMap::new()], archive: Vec::new(), unique: 0 }
  }

  pub fn depth(&self) -> usize {
    self.scopes.len()
  }

  pub fn begin_scope(&mut self) {
    self.scopes.push(IndexMap::new());
  }

  pub fn end_scope(&mut self) {
    // the global scope is never popped; an extra `}` is a syntax error the
    // table catches before we get here
    if self.scopes.len() > 1 {
      self.scopes.pop();
    }
  }

  pub fn declared_in_current(&self, name: &str) -> bool {
    self.scopes.last().map_or(false, |s| s.contains_key(name))
  }

  // innermost scope first
  pub fn lookup(&self, name: &str) -> Option<&SymEntry> {
    self.scopes.iter().rev().find_map(|s| s.get(name))
  }

  pub fn fresh_ir_name(&mut self, name: &str) -> String {
    self.unique += 1;
    format!("{}@{}#{}", name, self.depth(), self.unique)
  }

  // insert into the current scope; the caller has already rejected duplicates
  pub fn declare(&mut self, name: &str, kind: SymKind, ty: Ty, params: Vec<Ty>) -> String {
    let ir_name = self.fresh_ir_name(name);
    let entry = SymEntry { kind, ty, params, ir_name: ir_name.clone(), depth: self.depth() };
    self.archive.push((name.to_owned(), entry.clone()));
    self.scopes.last_mut().unwrap().insert(name.to_owned(), entry);
    ir_name
  }

  // record the parameter types of a function once they are known
  pub fn set_func_params(&mut self, name: &str, params: &[Ty]) {
    if let Some(e) = self.scopes[0].get_mut(name) {
      e.params = params.to_vec();
    }
    for (n, e) in self.archive.iter_mut().rev() {
      if n.as_str() == name && e.kind == SymKind::Func {
        e.params = params.to_vec();
        break;
      }
    }
  }

  pub fn archive(&self) -> &[(String, SymEntry)] {
    &self.archive
  }

  pub fn dump(&self) -> String {
    use std::fmt::Write;
    let mut s = String::new();
    let _ = writeln!(s, "symbol table ({} entries):", self.archive.len());
    for (name, e) in &self.archive {
      match e.kind {
        SymKind::Func => {
          let params = e.params.iter().map(Ty::to_string).collect::<Vec<_>>().join(", ");
          let _ = writeln!(s, "  {} {} {}({}) as {}", e.kind, e.ty, name, params, e.ir_name);
        }
        _ => {
          let _ = writeln!(s, "  {} {} {} as {} (scope {})", e.kind, e.ty, name, e.ir_name, e.depth);
        }
      }
    }
    s
  }
}

impl Default for ScopeStack {
  fn default() -> Self {
    Self::new()
  }
}

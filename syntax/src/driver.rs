use common::{Token, TokenKind};
use slr_core::{Act, Grammar, Table, EOF_IDX};
use crate::error::{Result, SynError};
use crate::quad::{QuadList, QuadOp, Rel};
use crate::symtab::{ScopeStack, SymKind, Ty};
use crate::token_file::term_name;
use crate::value::{BoolVal, ExprVal, SemValue, StmtVal};

#[derive(Debug)]
pub struct ParseResult {
  pub quads: QuadList,
  pub symtab: ScopeStack,
}

// the shift-reduce driver plus the semantic layer it feeds: scoped symbol
// table, type checks, quad emission with backpatching
pub struct Driver<'a> {
  g: &'a Grammar,
  table: &'a Table,
  // state, symbol and semantic stacks always move together, so they are one
  // vector of triples
  stack: Vec<(u32, u32, SemValue)>,
  scopes: ScopeStack,
  quads: QuadList,
  tmp: u32,
  last_pos: (u32, u32),
  // function-header bookkeeping driven by shift pre-actions
  pending_params: Vec<(String, Ty)>,
  pending_else_jumps: Vec<usize>,
  pending_func: bool,
  in_function: bool,
  cur_func_ret: Ty,
  cur_func_name: String,
  func_scope_depth: usize,
}

impl<'a> Driver<'a> {
  pub fn new(g: &'a Grammar, table: &'a Table) -> Driver<'a> {
    Driver {
      g,
      table,
      stack: vec![(0, EOF_IDX as u32, SemValue::Empty)],
      scopes: ScopeStack::new(),
      quads: QuadList::new(),
      tmp: 0,
      last_pos: (0, 0),
      pending_params: Vec::new(),
      pending_else_jumps: Vec::new(),
      pending_func: false,
      in_function: false,
      cur_func_ret: Ty::Void,
      cur_func_name: String::new(),
      func_scope_depth: 0,
    }
  }

  pub fn parse(mut self, tokens: &[Token]) -> Result<ParseResult> {
    let g = self.g;
    let mut idx = 0;
    loop {
      let (term, tok) = if idx < tokens.len() {
        let tok = &tokens[idx];
        match tok.kind {
          TokenKind::Error => {
            return Err(SynError::LexicalError { lexeme: tok.lexeme.clone(), line: tok.line, col: tok.col });
          }
          TokenKind::EndFile => (EOF_IDX as u32, None),
          kind => {
            let name = term_name(kind).unwrap();
            let id = self.g.term_id(name)
              .ok_or_else(|| SynError::UnknownTerminal { name: name.to_owned() })?;
            self.last_pos = (tok.line, tok.col);
            (id, Some(tok))
          }
        }
      } else {
        (EOF_IDX as u32, None)
      };

      let state = self.stack.last().unwrap().0;
      match self.table[state as usize].act.get(&term).and_then(|a| a.first().copied()) {
        Some(Act::Shift(next)) => {
          self.pre_shift(term, tok)?;
          self.stack.push((next, term, Self::token_value(tok)));
          idx += 1;
        }
        // reducing by `S' -> S` accepts just like the explicit entry on $
        Some(Act::Reduce(0)) | Some(Act::Acc) => return self.accept(),
        Some(Act::Reduce(p)) => self.reduce(p)?,
        None => {
          let (line, col) = tok.map(|t| (t.line, t.col)).unwrap_or(self.last_pos);
          return Err(SynError::NoAction {
            state,
            term: g.show_token(term).to_owned(),
            line,
            col,
          });
        }
      }
    }
  }

  fn accept(self) -> Result<ParseResult> {
    if !self.pending_else_jumps.is_empty() {
      return Err(SynError::UnbalancedElseJumps);
    }
    Ok(ParseResult { quads: self.quads, symtab: self.scopes })
  }

  fn token_value(tok: Option<&Token>) -> SemValue {
    use TokenKind::*;
    match tok {
      None => SemValue::Empty,
      Some(t) => match t.kind {
        Id => SemValue::Id { name: t.lexeme.clone(), line: t.line, col: t.col },
        Num => SemValue::Num(t.lexeme.clone()),
        Lt | Gt | Lte | Gte | Eq | Neq => SemValue::Op(t.lexeme.clone()),
        _ => SemValue::Empty,
      },
    }
  }

  fn reduce(&mut self, p: u32) -> Result<()> {
    let g = self.g;
    let lhs = g.prods[p as usize].lhs;
    let n = g.prods[p as usize].rhs.len();
    debug_assert!(self.stack.len() > n);
    let at = self.stack.len() - n;
    let value = self.run_action(p, at)?;
    self.stack.truncate(at);
    let state = self.stack.last().unwrap().0;
    let next = self.table[state as usize].goto.get(&lhs).copied().ok_or_else(|| SynError::NoGoto {
      state,
      nt: g.show_token(lhs).to_owned(),
    })?;
    self.stack.push((next, lhs, value));
    Ok(())
  }

  // ===== shift pre-actions =====

  fn pre_shift(&mut self, term: u32, _tok: Option<&Token>) -> Result<()> {
    match self.g.show_token(term) {
      "{" => self.pre_lbrace()?,
      "}" => self.pre_rbrace(),
      "else" => self.pre_else()?,
      "(" => self.pre_lparen()?,
      _ => {}
    }
    Ok(())
  }

  // a block opens a scope; the first block of a function also receives the
  // collected parameters
  fn pre_lbrace(&mut self) -> Result<()> {
    self.scopes.begin_scope();
    if self.pending_func {
      self.pending_func = false;
      self.func_scope_depth = self.scopes.depth();
      let params = std::mem::take(&mut self.pending_params);
      let mut tys = Vec::with_capacity(params.len());
      for (name, ty) in &params {
        if self.scopes.declared_in_current(name) {
          return Err(SynError::DuplicateParameter { name: name.clone() });
        }
        self.scopes.declare(name, SymKind::Param, *ty, Vec::new());
        tys.push(*ty);
      }
      self.scopes.set_func_params(&self.cur_func_name, &tys);
    }
    Ok(())
  }

  fn pre_rbrace(&mut self) {
    self.scopes.end_scope();
    if self.in_function && self.scopes.depth() < self.func_scope_depth {
      self.in_function = false;
      self.pending_params.clear();
    }
  }

  // `(` right after `Type id` at the global scope starts a function
  // definition: the name goes into the global scope now so the body can
  // refer to it, parameters are installed when `{` is shifted
  fn pre_lparen(&mut self) -> Result<()> {
    if self.scopes.depth() != 1 || self.stack.len() < 2 {
      return Ok(());
    }
    let top = &self.stack[self.stack.len() - 1];
    let below = &self.stack[self.stack.len() - 2];
    if self.g.show_token(top.1) != "id" || self.g.show_token(below.1) != "Type" {
      return Ok(());
    }
    let (name, line, col) = match &top.2 {
      SemValue::Id { name, line, col } => (name.clone(), *line, *col),
      _ => return Ok(()),
    };
    let ty = match below.2.as_type() {
      Some(t) => t,
      None => return Ok(()),
    };
    if self.scopes.declared_in_current(&name) {
      return Err(SynError::Redefinition { name, line, col });
    }
    self.scopes.declare(&name, SymKind::Func, ty, Vec::new());
    self.pending_func = true;
    self.in_function = true;
    self.cur_func_ret = ty;
    self.cur_func_name = name;
    self.pending_params.clear();
    Ok(())
  }

  // shifting `else`: the then-branch is complete, so insert its end jump and
  // resolve the condition now; the end jump itself is resolved when the whole
  // if-else reduces
  fn pre_else(&mut self) -> Result<()> {
    let g = self.g;
    let len = self.stack.len();
    let mut found = None;
    for i in (4..len).rev() {
      let name = |k: usize| g.show_token(self.stack[k].1);
      if name(i) == "Stmt" && name(i - 1) == ")" && name(i - 2) == "RelExpr"
        && name(i - 3) == "(" && name(i - 4) == "if"
      {
        found = Some(i);
        break;
      }
    }
    let i = match found {
      Some(i) => i,
      None => return Ok(()),
    };
    let cond = match self.stack[i - 2].2.as_bool() {
      Some(b) => b.clone(),
      None => return Ok(()),
    };
    let then = self.stack[i].2.as_stmt(self.quads.next_quad());
    let end_jump = self.quads.emit(QuadOp::Goto, "", "", "", -1);
    self.pending_else_jumps.push(end_jump);
    self.quads.backpatch(&cond.truelist, then.begin);
    let else_begin = self.quads.next_quad();
    self.quads.backpatch(&cond.falselist, else_begin);
    Ok(())
  }

  // ===== reduction actions =====

  fn expr_of<'v>(&self, v: &'v SemValue) -> Result<&'v ExprVal> {
    v.as_expr().ok_or(SynError::TypeMismatch {
      context: "expression",
      line: self.last_pos.0,
      col: self.last_pos.1,
    })
  }

  fn mismatch(&self, context: &'static str) -> SynError {
    SynError::TypeMismatch { context, line: self.last_pos.0, col: self.last_pos.1 }
  }

  fn binop(&mut self, op: QuadOp, a: &SemValue, b: &SemValue) -> Result<SemValue> {
    let a = self.expr_of(a)?.clone();
    let b = self.expr_of(b)?.clone();
    if a.ty != Ty::Int || b.ty != Ty::Int {
      return Err(self.mismatch("arithmetic"));
    }
    self.tmp += 1;
    let t = format!("t{}", self.tmp);
    self.quads.emit(op, a.place, b.place, t.clone(), -1);
    Ok(SemValue::Expr(ExprVal { ty: Ty::Int, place: t, begin: a.begin }))
  }

  fn declare_var(&mut self, ty: &SemValue, id: &SemValue, init: Option<&SemValue>) -> Result<SemValue> {
    let ty = ty.as_type().ok_or_else(|| self.mismatch("declaration"))?;
    let (name, line, col) = match id {
      SemValue::Id { name, line, col } => (name.clone(), *line, *col),
      _ => return Err(self.mismatch("declaration")),
    };
    if ty == Ty::Void {
      return Err(SynError::VoidVariable { name, line, col });
    }
    if self.scopes.declared_in_current(&name) {
      return Err(SynError::Redefinition { name, line, col });
    }
    let ir = self.scopes.declare(&name, SymKind::Var, ty, Vec::new());
    match init {
      None => Ok(SemValue::Stmt(StmtVal { nextlist: Vec::new(), begin: self.quads.next_quad() })),
      Some(e) => {
        let e = self.expr_of(e)?.clone();
        if e.ty != ty {
          return Err(self.mismatch("initialization"));
        }
        self.quads.emit(QuadOp::Assign, e.place, "", ir, -1);
        Ok(SemValue::Stmt(StmtVal { nextlist: Vec::new(), begin: e.begin }))
      }
    }
  }

  fn assign_var(&mut self, id: &SemValue, e: &SemValue) -> Result<SemValue> {
    let (name, line, col) = match id {
      SemValue::Id { name, line, col } => (name.clone(), *line, *col),
      _ => return Err(self.mismatch("assignment")),
    };
    let entry = match self.scopes.lookup(&name) {
      None => return Err(SynError::UndefinedVariable { name, line, col }),
      Some(e) => e.clone(),
    };
    if entry.kind == SymKind::Func {
      return Err(SynError::FunctionAsValue { name, line, col });
    }
    let e = self.expr_of(e)?.clone();
    if e.ty != entry.ty {
      return Err(self.mismatch("assignment"));
    }
    self.quads.emit(QuadOp::Assign, e.place, "", entry.ir_name, -1);
    Ok(SemValue::Stmt(StmtVal { nextlist: Vec::new(), begin: e.begin }))
  }

  fn rel_expr(&mut self, a: &SemValue, op: Option<&SemValue>, b: Option<&SemValue>) -> Result<SemValue> {
    let a = self.expr_of(a)?.clone();
    if a.ty != Ty::Int {
      return Err(self.mismatch("comparison"));
    }
    let (i, j) = match (op, b) {
      (Some(op), Some(b)) => {
        let rel = match op {
          SemValue::Op(s) => Rel::from_op(s).ok_or_else(|| self.mismatch("comparison"))?,
          _ => return Err(self.mismatch("comparison")),
        };
        let b = self.expr_of(b)?.clone();
        if b.ty != Ty::Int {
          return Err(self.mismatch("comparison"));
        }
        let i = self.quads.emit(QuadOp::If(rel), a.place, b.place, "", -1);
        let j = self.quads.emit(QuadOp::Goto, "", "", "", -1);
        (i, j)
      }
      _ => {
        let i = self.quads.emit(QuadOp::IfNz, a.place, "", "", -1);
        let j = self.quads.emit(QuadOp::Goto, "", "", "", -1);
        (i, j)
      }
    };
    Ok(SemValue::Bool(BoolVal { truelist: vec![i], falselist: vec![j], begin: a.begin }))
  }

  fn run_action(&mut self, p: u32, at: usize) -> Result<SemValue> {
    let g = self.g;
    let prod = &g.prods[p as usize];
    let lhs = g.show_token(prod.lhs);
    let rhs = prod.rhs.iter().map(|&s| g.show_token(s)).collect::<Vec<_>>();
    let vals = self.stack[at..].iter().map(|(_, _, v)| v.clone()).collect::<Vec<_>>();
    let next_quad = self.quads.next_quad();

    Ok(match (lhs, rhs.as_slice()) {
      ("Type", ["int"]) => SemValue::Type(Ty::Int),
      ("Type", ["void"]) => SemValue::Type(Ty::Void),

      ("Parameter", ["Type", "id"]) => {
        let ty = vals[0].as_type().ok_or_else(|| self.mismatch("parameter"))?;
        let name = match &vals[1] {
          SemValue::Id { name, .. } => name.clone(),
          _ => return Err(self.mismatch("parameter")),
        };
        if ty == Ty::Void {
          return Err(SynError::VoidParameter { name });
        }
        self.pending_params.push((name, ty));
        SemValue::Empty
      }

      ("Factor", ["id"]) => {
        let (name, line, col) = match &vals[0] {
          SemValue::Id { name, line, col } => (name.clone(), *line, *col),
          _ => return Err(self.mismatch("expression")),
        };
        let entry = match self.scopes.lookup(&name) {
          None => return Err(SynError::UndefinedVariable { name, line, col }),
          Some(e) => e.clone(),
        };
        if entry.kind == SymKind::Func {
          return Err(SynError::FunctionAsValue { name, line, col });
        }
        SemValue::Expr(ExprVal { ty: entry.ty, place: entry.ir_name, begin: next_quad })
      }
      ("Factor", ["num"]) => {
        let lit = match &vals[0] {
          SemValue::Num(s) => s.clone(),
          _ => return Err(self.mismatch("expression")),
        };
        SemValue::Expr(ExprVal { ty: Ty::Int, place: lit, begin: next_quad })
      }
      ("Factor", ["(", "Expr", ")"]) => vals[1].clone(),

      ("Term", [_, "*", _]) => self.binop(QuadOp::Mul, &vals[0], &vals[2])?,
      ("Term", [_, "/", _]) => self.binop(QuadOp::Div, &vals[0], &vals[2])?,
      ("Expr", [_, "+", _]) => self.binop(QuadOp::Add, &vals[0], &vals[2])?,
      ("Expr", [_, "-", _]) => self.binop(QuadOp::Sub, &vals[0], &vals[2])?,

      ("RelOp", [op]) if Rel::from_op(op).is_some() => SemValue::Op((*op).to_owned()),

      ("RelExpr", ["Expr", "RelOp", "Expr"]) => self.rel_expr(&vals[0], Some(&vals[1]), Some(&vals[2]))?,
      ("RelExpr", ["Expr"]) => self.rel_expr(&vals[0], None, None)?,

      ("DeclarationStatement", ["Type", "id", ";"]) => self.declare_var(&vals[0], &vals[1], None)?,
      ("DeclarationStatement", ["Type", "id", "=", "Expr", ";"]) => {
        self.declare_var(&vals[0], &vals[1], Some(&vals[3]))?
      }

      ("AssignmentStatement", ["id", "=", "Expr", ";"]) => self.assign_var(&vals[0], &vals[2])?,

      ("ReturnStatement", ["return", ";"]) => {
        if !self.in_function {
          return Err(SynError::ReturnOutsideFunction { line: self.last_pos.0, col: self.last_pos.1 });
        }
        if self.cur_func_ret != Ty::Void {
          return Err(SynError::ReturnTypeMismatch { line: self.last_pos.0, col: self.last_pos.1 });
        }
        self.quads.emit(QuadOp::Ret, "", "", "", -1);
        SemValue::Stmt(StmtVal { nextlist: Vec::new(), begin: next_quad })
      }
      ("ReturnStatement", ["return", "Expr", ";"]) => {
        if !self.in_function {
          return Err(SynError::ReturnOutsideFunction { line: self.last_pos.0, col: self.last_pos.1 });
        }
        let e = self.expr_of(&vals[1])?.clone();
        if e.ty != self.cur_func_ret {
          return Err(SynError::ReturnTypeMismatch { line: self.last_pos.0, col: self.last_pos.1 });
        }
        self.quads.emit(QuadOp::Retv, e.place, "", "", -1);
        SemValue::Stmt(StmtVal { nextlist: Vec::new(), begin: e.begin })
      }

      ("Stmt", ["read", "id", ";"]) => {
        let (name, line, col) = match &vals[1] {
          SemValue::Id { name, line, col } => (name.clone(), *line, *col),
          _ => return Err(self.mismatch("read")),
        };
        let entry = match self.scopes.lookup(&name) {
          None => return Err(SynError::UndefinedVariable { name, line, col }),
          Some(e) => e.clone(),
        };
        if entry.kind == SymKind::Func {
          return Err(SynError::FunctionAsValue { name, line, col });
        }
        if entry.ty != Ty::Int {
          return Err(self.mismatch("read"));
        }
        self.quads.emit(QuadOp::Read, "", "", entry.ir_name, -1);
        SemValue::Stmt(StmtVal { nextlist: Vec::new(), begin: next_quad })
      }
      ("Stmt", ["write", "Expr", ";"]) => {
        let e = self.expr_of(&vals[1])?.clone();
        if e.ty != Ty::Int {
          return Err(self.mismatch("write"));
        }
        self.quads.emit(QuadOp::Write, e.place, "", "", -1);
        SemValue::Stmt(StmtVal { nextlist: Vec::new(), begin: e.begin })
      }

      ("CompoundStatement", ["{", "StmtList", "}"]) => vals[1].clone(),
      ("CompoundStatement", ["{", "}"]) => {
        SemValue::Stmt(StmtVal { nextlist: Vec::new(), begin: next_quad })
      }

      ("StmtList", ["StmtList", "Stmt"]) => {
        let s1 = vals[0].as_stmt(next_quad);
        let s2 = vals[1].as_stmt(next_quad);
        self.quads.backpatch(&s1.nextlist, s2.begin);
        SemValue::Stmt(StmtVal { nextlist: s2.nextlist, begin: s1.begin })
      }

      ("SelectionStatement", ["if", "(", "RelExpr", ")", "Stmt"]) => {
        let cond = vals[2].as_bool().cloned().ok_or_else(|| self.mismatch("condition"))?;
        let then = vals[4].as_stmt(next_quad);
        self.quads.backpatch(&cond.truelist, then.begin);
        self.quads.backpatch(&cond.falselist, next_quad);
        SemValue::Stmt(StmtVal { nextlist: then.nextlist, begin: cond.begin })
      }
      ("SelectionStatement", ["if", "(", "RelExpr", ")", "Stmt", "else", "Stmt"]) => {
        // the condition was resolved when `else` was shifted; only the end
        // jump of the then-branch remains open
        let end_jump = self.pending_else_jumps.pop().ok_or(SynError::UnbalancedElseJumps)?;
        self.quads.backpatch(&[end_jump], next_quad);
        let cond = vals[2].as_bool().cloned().ok_or_else(|| self.mismatch("condition"))?;
        let (s1, s2) = (vals[4].as_stmt(next_quad), vals[6].as_stmt(next_quad));
        let mut nextlist = s1.nextlist;
        nextlist.extend(s2.nextlist);
        SemValue::Stmt(StmtVal { nextlist, begin: cond.begin })
      }

      ("IterationStatement", ["while", "(", "RelExpr", ")", "Stmt"]) => {
        let cond = vals[2].as_bool().cloned().ok_or_else(|| self.mismatch("condition"))?;
        let body = vals[4].as_stmt(next_quad);
        self.quads.backpatch(&cond.truelist, body.begin);
        self.quads.backpatch(&body.nextlist, cond.begin);
        self.quads.emit(QuadOp::Goto, "", "", "", cond.begin as i32);
        let after = self.quads.next_quad();
        self.quads.backpatch(&cond.falselist, after);
        SemValue::Stmt(StmtVal { nextlist: Vec::new(), begin: cond.begin })
      }

      // everything else is structural: forward a lone value, else push empty
      _ => {
        if vals.len() == 1 {
          vals.into_iter().next().unwrap()
        } else {
          SemValue::Empty
        }
      }
    })
  }
}

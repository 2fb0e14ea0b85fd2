use common::BitSet;
use crate::grammar::{Grammar, EPS_IDX, EOF_IDX};

// FIRST and FOLLOW over terminal-id bit sets, one per nonterminal;
// FIRST may contain the ε bit, FOLLOW never does
pub struct FirstFollow {
  pub first: Vec<BitSet>,
  pub follow: Vec<BitSet>,
}

impl FirstFollow {
  pub fn new(g: &Grammar) -> FirstFollow {
    let first = Self::mk_first(g);
    let follow = Self::mk_follow(g, &first);
    FirstFollow { first, follow }
  }

  // FIRST of a symbol sequence under the current per-nonterminal sets;
  // sets the ε bit iff every symbol can derive ε (so also for the empty sequence)
  fn seq_first(g: &Grammar, first: &[BitSet], seq: &[u32]) -> BitSet {
    let mut f = BitSet::new(g.terms.len());
    let mut all_eps = true;
    for &x in seq {
      match g.as_nt(x) {
        None => {
          f.set(x as usize);
          all_eps = false;
          break;
        }
        Some(nt) => {
          f.or(&first[nt]);
          if !first[nt].test(EPS_IDX) {
            all_eps = false;
            break;
          }
        }
      }
    }
    if all_eps { f.set(EPS_IDX); } else { f.clear(EPS_IDX); }
    f
  }

  pub fn first_of_seq(&self, g: &Grammar, seq: &[u32]) -> BitSet {
    Self::seq_first(g, &self.first, seq)
  }

  // one `FIRST(A) = { ... }` / `FOLLOW(A) = { ... }` line per nonterminal
  pub fn dump(&self, g: &Grammar) -> String {
    use std::fmt::Write;
    let mut s = String::new();
    for (which, sets) in &[("FIRST", &self.first), ("FOLLOW", &self.follow)] {
      for (nt, set) in sets.iter().enumerate() {
        let mut names = Vec::new();
        set.ones(|i| names.push(g.show_token(i as u32)));
        let _ = writeln!(s, "{}({}) = {{ {} }}", which, g.nts[nt], names.join(", "));
      }
    }
    s
  }

  fn mk_first(g: &Grammar) -> Vec<BitSet> {
    let mut first = vec![BitSet::new(g.terms.len()); g.nt_num()];
    loop {
      let mut changed = false;
      for prod in &g.prods {
        let lhs = g.as_nt(prod.lhs).unwrap();
        let f = Self::seq_first(g, &first, &prod.rhs);
        changed |= first[lhs].or(&f);
      }
      if !changed { break; }
    }
    first
  }

  fn mk_follow(g: &Grammar, first: &[BitSet]) -> Vec<BitSet> {
    let mut follow = vec![BitSet::new(g.terms.len()); g.nt_num()];
    follow[g.start as usize].set(EOF_IDX);
    loop {
      let mut changed = false;
      for prod in &g.prods {
        let lhs = g.as_nt(prod.lhs).unwrap();
        let lhs_follow = follow[lhs].clone();
        for (i, &x) in prod.rhs.iter().enumerate() {
          if let Some(nt) = g.as_nt(x) {
            let mut f = Self::seq_first(g, first, &prod.rhs[i + 1..]);
            let nullable = f.test(EPS_IDX);
            f.clear(EPS_IDX);
            changed |= follow[nt].or(&f);
            if nullable {
              changed |= follow[nt].or(&lhs_follow);
            }
          }
        }
      }
      if !changed { break; }
    }
    follow
  }
}

use std::fmt;
use crate::grammar::Grammar;
use crate::table::{Act, Table};

#[derive(Debug)]
pub enum ConflictKind {
  SR { s: u32, r: u32 },
  RR { r1: u32, r2: u32 },
}

#[derive(Debug)]
pub struct Conflict {
  pub kind: ConflictKind,
  pub state: u32,
  pub ch: u32,
  pub kept: Act,
  pub new: Act,
}

fn show_act(g: &Grammar, act: Act) -> String {
  match act {
    Act::Shift(s) => format!("shift {}", s),
    Act::Reduce(r) => format!("reduce {} ({})", r, g.show_prod(r, None)),
    Act::Acc => "accept".to_owned(),
  }
}

// the report the parser prints to stdout, one line per conflict
pub struct ConflictDisplay<'a>(pub &'a Conflict, pub &'a Grammar);

impl fmt::Display for ConflictDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let ConflictDisplay(c, g) = self;
    let what = match c.kind {
      ConflictKind::SR { .. } => "shift/reduce",
      ConflictKind::RR { .. } => "reduce/reduce",
    };
    write!(
      f,
      "warning: {} conflict at state {} on `{}`: existing {}, new {}; keeping {}",
      what, c.state, g.show_token(c.ch), show_act(g, c.kept), show_act(g, c.new), show_act(g, c.kept)
    )
  }
}

// first-written-wins: every cell keeps its slot-0 action, and each discarded
// action is reported once; the caller decides whether conflicts are fatal
// (here they never are)
pub fn solve(table: &mut Table, _g: &Grammar) -> Vec<Conflict> {
  let mut reports = Vec::new();
  for (state, entry) in table.iter_mut().enumerate() {
    for (&ch, acts) in entry.act.iter_mut() {
      if acts.len() <= 1 {
        continue;
      }
      let kept = acts[0];
      for &new in &acts[1..] {
        let kind = match (kept, new) {
          (Act::Shift(s), Act::Reduce(r)) | (Act::Reduce(r), Act::Shift(s)) => ConflictKind::SR { s, r },
          (Act::Reduce(r1), Act::Reduce(r2)) => ConflictKind::RR { r1, r2 },
          // an accept entry colliding with a reduce is a reduce/reduce on the
          // augmented production
          (Act::Acc, Act::Reduce(r)) | (Act::Reduce(r), Act::Acc) => ConflictKind::RR { r1: 0, r2: r },
          _ => unreachable!("there should be a bug in table assembly"),
        };
        reports.push(Conflict { kind, state: state as u32, ch, kept, new });
      }
      acts.truncate(1);
    }
  }
  // hash-map iteration order is arbitrary; sort so reports are stable
  reports.sort_by_key(|c| (c.state, c.ch));
  reports
}

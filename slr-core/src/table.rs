use common::{HashMap, SmallVec};
use crate::first_follow::FirstFollow;
use crate::grammar::{Grammar, EOF_IDX};
use crate::lr0::Lr0Fsm;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Act {
  Shift(u32),
  Reduce(u32),
  Acc,
}

// in most cases there is no conflict, so use a small vec of inline capacity = 1
pub type Acts = SmallVec<[Act; 1]>;

pub struct TableEntry {
  // terminal id -> actions; slot 0 is the retained one after `conflict::solve`
  pub act: HashMap<u32, Acts>,
  // nonterminal id -> state
  pub goto: HashMap<u32, u32>,
}

pub type Table = Vec<TableEntry>;

// assemble ACTION/GOTO from the goto graph and the reduce items; shifts are
// written before reduces, which is what makes first-written-wins keep the
// shift on a shift/reduce collision
pub fn mk_table(fsm: &Lr0Fsm, g: &Grammar, ff: &FirstFollow) -> Table {
  let mut table = Vec::with_capacity(fsm.len());
  for node in fsm {
    let (mut act, mut goto) = (HashMap::new(), HashMap::new());
    for (&k, &v) in &node.link {
      if g.as_nt(k).is_some() {
        goto.insert(k, v);
      } else {
        act.insert(k, smallvec![Act::Shift(v)]);
      }
    }
    for item in &node.closure {
      if !item.is_reduce(g) {
        continue;
      }
      if item.is_accept(g) {
        act.entry(EOF_IDX as u32).or_insert_with(SmallVec::new).push(Act::Acc);
      } else {
        let lhs = g.as_nt(g.prods[item.prod_id as usize].lhs).unwrap();
        ff.follow[lhs].ones(|b| {
          let cell: &mut Acts = act.entry(b as u32).or_insert_with(SmallVec::new);
          let new = Act::Reduce(item.prod_id);
          // identical duplicates are silent
          if !cell.contains(&new) {
            cell.push(new);
          }
        });
      }
    }
    table.push(TableEntry { act, goto });
  }
  table
}

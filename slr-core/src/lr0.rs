use std::collections::VecDeque;
use common::{HashMap, HashSet};
use crate::grammar::Grammar;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Lr0Item {
  pub prod_id: u32,
  pub dot: u32,
}

impl Lr0Item {
  pub fn is_reduce(&self, g: &Grammar) -> bool {
    self.dot as usize >= g.prods[self.prod_id as usize].rhs.len()
  }

  // the accept item is `S' -> S.`
  pub fn is_accept(&self, g: &Grammar) -> bool {
    self.prod_id == 0 && self.is_reduce(g)
  }
}

pub struct Lr0Node {
  pub closure: Vec<Lr0Item>,
  pub link: HashMap<u32, u32>,
}

pub type Lr0Fsm = Vec<Lr0Node>;

struct Ctx<'a> {
  g: &'a Grammar,
}

impl Ctx<'_> {
  fn go(&self, items: &[Lr0Item], mov: u32) -> Vec<Lr0Item> {
    let mut new_items = HashSet::new();
    for item in items {
      let prod = &self.g.prods[item.prod_id as usize];
      if item.dot as usize >= prod.rhs.len() { // dot is after the last symbol
        continue;
      }
      if prod.rhs[item.dot as usize] == mov {
        new_items.insert(Lr0Item { prod_id: item.prod_id, dot: item.dot + 1 });
      }
    }
    self.closure(new_items)
  }

  fn closure(&self, mut items: HashSet<Lr0Item>) -> Vec<Lr0Item> {
    let mut q = items.iter().copied().collect::<VecDeque<_>>();
    while let Some(item) = q.pop_front() {
      let prod = &self.g.prods[item.prod_id as usize];
      if item.dot as usize >= prod.rhs.len() {
        continue;
      }
      let b = prod.rhs[item.dot as usize];
      if let Some(nt) = self.g.as_nt(b) {
        for &pid in self.g.prods_of(nt) {
          let new_item = Lr0Item { prod_id: pid, dot: 0 };
          if items.insert(new_item) {
            q.push_back(new_item);
          }
        }
      }
    }
    // sorted, so vec equality is item-set equality
    let mut items = items.into_iter().collect::<Vec<_>>();
    items.sort_unstable();
    items
  }
}

// bfs over item sets from closure({S' -> .S}), deduplicating exactly
pub fn work(g: &Grammar) -> Lr0Fsm {
  let ctx = Ctx { g };
  let init = ctx.closure({
    let mut init = HashSet::new();
    init.insert(Lr0Item { prod_id: 0, dot: 0 });
    init
  });
  let mut ss = HashMap::new();
  ss.insert(init.clone(), 0u32);
  let mut q = VecDeque::new();
  q.push_back(init);
  let mut result = Vec::new();
  while let Some(cur) = q.pop_front() {
    let mut link = HashMap::new();
    for mov in 0..g.token_num() as u32 {
      let ns = ctx.go(&cur, mov);
      if !ns.is_empty() {
        let id = match ss.get(&ns) {
          None => {
            let id = ss.len() as u32;
            ss.insert(ns.clone(), id);
            q.push_back(ns);
            id
          }
          Some(id) => *id,
        };
        link.insert(mov, id);
      }
    }
    result.push(Lr0Node { closure: cur, link });
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar::RawGrammar;

  const EXPR: &str = "\
START_SYMBOL E
E -> E + T
E -> T
T -> T * F
T -> F
F -> ( E )
F -> id
";

  #[test]
  fn canonical_collection_size() {
    let g = RawGrammar::parse(EXPR).extend().unwrap();
    let fsm = work(&g);
    // the dragon-book expression grammar has exactly 12 LR(0) states
    assert_eq!(fsm.len(), 12);
  }

  #[test]
  fn initial_closure() {
    let g = RawGrammar::parse(EXPR).extend().unwrap();
    let fsm = work(&g);
    // closure({E' -> .E}) pulls in every E, T and F production
    assert_eq!(fsm[0].closure.len(), 7);
    assert!(fsm[0].closure.iter().all(|i| i.dot == 0));
    // shifting over E, T, F, ( and id all leave state 0
    let targets = [g.term_id("(").unwrap(), g.term_id("id").unwrap()];
    for t in &targets {
      assert!(fsm[0].link.contains_key(t));
    }
  }

  #[test]
  fn goto_dedup() {
    let g = RawGrammar::parse(EXPR).extend().unwrap();
    let fsm = work(&g);
    // every link target must be a real state
    for node in &fsm {
      for (_, &to) in &node.link {
        assert!((to as usize) < fsm.len());
      }
    }
    // the accept item appears in exactly one state
    let accepts = fsm.iter().filter(|n| n.closure.iter().any(|i| i.is_accept(&g))).count();
    assert_eq!(accepts, 1);
  }
}

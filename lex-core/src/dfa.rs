use std::collections::{BTreeMap, BTreeSet, VecDeque};
use common::{HashMap, TokenKind};
use crate::nfa::Nfa;

pub struct DfaState {
  // deterministic: at most one destination per byte
  pub trans: HashMap<u8, u32>,
  pub accept: Option<TokenKind>,
}

// state 0 is the start state
pub struct Dfa {
  pub states: Vec<DfaState>,
}

// the set of nfa states reachable via zero or more ε edges; kept sorted so
// set equality is plain vec equality
fn eps_closure(nfa: &Nfa, set: &[u32]) -> Vec<u32> {
  let mut closure = set.to_vec();
  let mut q = set.iter().copied().collect::<VecDeque<_>>();
  while let Some(s) = q.pop_front() {
    for &t in &nfa.states[s as usize].eps {
      if !closure.contains(&t) {
        closure.push(t);
        q.push_back(t);
      }
    }
  }
  closure.sort_unstable();
  closure
}

// the accept kind of a subset is the highest-priority accept kind among its
// members; numerically smaller priority wins, so `int` beats `{ID}`
fn choose_accept(nfa: &Nfa, set: &[u32]) -> Option<TokenKind> {
  let mut best: Option<TokenKind> = None;
  for &s in set {
    if let Some(kind) = nfa.states[s as usize].accept {
      if best.map_or(true, |b| kind.priority() < b.priority()) {
        best = Some(kind);
      }
    }
  }
  best
}

impl Dfa {
  // subset construction
  pub fn subset(nfa: &Nfa) -> Dfa {
    let init = eps_closure(nfa, &[nfa.start]);
    let mut states = vec![DfaState { trans: HashMap::new(), accept: choose_accept(nfa, &init) }];
    let mut ids = HashMap::new();
    ids.insert(init.clone(), 0u32);
    let mut q = VecDeque::new();
    q.push_back((0u32, init));
    while let Some((cur, set)) = q.pop_front() {
      // only bytes that actually appear on some outgoing edge; ordered for determinism
      let mut alphabet = BTreeSet::new();
      for &s in &set {
        alphabet.extend(nfa.states[s as usize].trans.keys().copied());
      }
      for ch in alphabet {
        let mut moved = Vec::new();
        for &s in &set {
          if let Some(ts) = nfa.states[s as usize].trans.get(&ch) {
            for &t in ts {
              if !moved.contains(&t) { moved.push(t); }
            }
          }
        }
        if moved.is_empty() { continue; }
        let next = eps_closure(nfa, &moved);
        let id = match ids.get(&next) {
          Some(&id) => id,
          None => {
            let id = states.len() as u32;
            states.push(DfaState { trans: HashMap::new(), accept: choose_accept(nfa, &next) });
            ids.insert(next.clone(), id);
            q.push_back((id, next));
            id
          }
        };
        states[cur as usize].trans.insert(ch, id);
      }
    }
    Dfa { states }
  }

  // partition refinement: start from {non-accepting} ∪ {one block per accept
  // kind}, split a block whenever two of its states map some byte into
  // different blocks, repeat until stable
  pub fn minimize(&self) -> Dfa {
    let n = self.states.len();
    let mut groups: BTreeMap<Option<TokenKind>, Vec<u32>> = BTreeMap::new();
    for i in 0..n {
      groups.entry(self.states[i].accept).or_insert_with(Vec::new).push(i as u32);
    }
    let mut blocks = groups.into_iter().map(|(_, v)| v).collect::<Vec<_>>();
    let mut block_of = vec![0usize; n];
    loop {
      for (bi, b) in blocks.iter().enumerate() {
        for &s in b { block_of[s as usize] = bi; }
      }
      let mut next = Vec::new();
      let mut changed = false;
      for b in &blocks {
        let mut split: BTreeMap<Vec<(u8, usize)>, Vec<u32>> = BTreeMap::new();
        for &s in b {
          let mut sig = self.states[s as usize].trans.iter()
            .map(|(&ch, &to)| (ch, block_of[to as usize])).collect::<Vec<_>>();
          sig.sort_unstable();
          split.entry(sig).or_insert_with(Vec::new).push(s);
        }
        changed |= split.len() > 1;
        next.extend(split.into_iter().map(|(_, v)| v));
      }
      blocks = next;
      if !changed { break; }
    }
    // the block holding the old start must become state 0
    for (bi, b) in blocks.iter().enumerate() {
      for &s in b { block_of[s as usize] = bi; }
    }
    let root = block_of[0];
    blocks.swap(0, root);
    for (bi, b) in blocks.iter().enumerate() {
      for &s in b { block_of[s as usize] = bi; }
    }
    let mut states = Vec::with_capacity(blocks.len());
    for b in &blocks {
      let rep = b[0] as usize;
      let trans = self.states[rep].trans.iter()
        .map(|(&ch, &to)| (ch, block_of[to as usize] as u32)).collect();
      states.push(DfaState { trans, accept: self.states[rep].accept });
    }
    Dfa { states }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rules::RuleSet;

  fn dfa_for(rules: &str) -> (Dfa, Dfa) {
    let rs = RuleSet::parse(rules).unwrap();
    let full = Dfa::subset(&Nfa::from_rules(&rs));
    let min = full.minimize();
    (full, min)
  }

  #[test]
  fn keyword_beats_identifier_in_subsets() {
    let (full, _) = dfa_for("INT int\nID {ID}\n");
    // walk i-n-t from the start
    let mut s = 0u32;
    for &b in b"int" {
      s = full.states[s as usize].trans[&b];
    }
    assert_eq!(full.states[s as usize].accept, Some(TokenKind::Int));
    // one more identifier byte falls back to ID
    let s = full.states[s as usize].trans[&b'x'];
    assert_eq!(full.states[s as usize].accept, Some(TokenKind::Id));
  }

  #[test]
  fn minimization_shrinks_and_keeps_start() {
    let (full, min) = dfa_for("INT int\nWHILE while\nID {ID}\nNUM {NUM}\n");
    assert!(min.states.len() <= full.states.len());
    // start state must stay non-accepting and keep an `i` edge
    assert_eq!(min.states[0].accept, None);
    assert!(min.states[0].trans.contains_key(&b'i'));
  }

  #[test]
  fn minimized_has_no_equivalent_pair() {
    let (_, min) = dfa_for("INT int\nID {ID}\nNUM {NUM}\nASSIGN =\nEQ ==\n");
    // no two states may share accept kind and per-byte target signature
    let sig = |i: usize| {
      let mut v = min.states[i].trans.iter().map(|(&c, &t)| (c, t)).collect::<Vec<_>>();
      v.sort_unstable();
      (min.states[i].accept, v)
    };
    for i in 0..min.states.len() {
      for j in i + 1..min.states.len() {
        assert_ne!(sig(i), sig(j), "states {} and {} are equivalent", i, j);
      }
    }
  }
}

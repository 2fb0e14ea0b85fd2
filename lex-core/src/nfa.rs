use common::{HashMap, TokenKind};
use crate::regex::Re;
use crate::rules::RuleSet;

pub struct NfaState {
  // nondeterministic byte transitions
  pub trans: HashMap<u8, Vec<u32>>,
  pub eps: Vec<u32>,
  // None for non-accepting states
  pub accept: Option<TokenKind>,
}

// all states live here and refer to each other by index, so the cyclic
// transition graph never owns anything
pub struct Nfa {
  pub states: Vec<NfaState>,
  pub start: u32,
}

impl Nfa {
  fn node(&mut self) -> u32 {
    self.states.push(NfaState { trans: HashMap::new(), eps: Vec::new(), accept: None });
    self.states.len() as u32 - 1
  }

  // textbook thompson rules; returns (start, accept) of the fresh piece
  fn thompson(&mut self, re: &Re) -> (u32, u32) {
    match re {
      Re::Ch(b) => {
        let (s, t) = (self.node(), self.node());
        self.states[s as usize].trans.entry(*b).or_insert_with(Vec::new).push(t);
        (s, t)
      }
      Re::Concat(l, r) => {
        let (ls, la) = self.thompson(l);
        let (rs, ra) = self.thompson(r);
        self.states[la as usize].eps.push(rs);
        (ls, ra)
      }
      Re::Union(l, r) => {
        let (s, t) = (self.node(), self.node());
        let (ls, la) = self.thompson(l);
        let (rs, ra) = self.thompson(r);
        self.states[s as usize].eps.push(ls);
        self.states[s as usize].eps.push(rs);
        self.states[la as usize].eps.push(t);
        self.states[ra as usize].eps.push(t);
        (s, t)
      }
      Re::Star(c) => {
        let (s, t) = (self.node(), self.node());
        let (cs, ca) = self.thompson(c);
        self.states[s as usize].eps.push(cs);
        self.states[s as usize].eps.push(t);
        self.states[ca as usize].eps.push(cs);
        self.states[ca as usize].eps.push(t);
        (s, t)
      }
    }
  }

  // one master start state with an ε edge into every per-rule nfa; each
  // piece's accept state is tagged with the rule's token kind
  pub fn from_rules(rules: &RuleSet) -> Nfa {
    let mut nfa = Nfa { states: Vec::new(), start: 0 };
    let start = nfa.node();
    nfa.start = start;
    for rule in &rules.rules {
      // empty patterns are already rejected by the rule loader
      let re = Re::from_pattern(&rule.pattern)
        .unwrap_or_else(|| panic!("empty pattern for token {}", rule.kind.name()));
      let (s, a) = nfa.thompson(&re);
      nfa.states[a as usize].accept = Some(rule.kind);
      nfa.states[start as usize].eps.push(s);
    }
    nfa
  }
}

use std::fmt::Write;
use common::{HashMap, SmallVec};

pub type ProdVec = SmallVec<[u32; 4]>;

// three reserved terminals; user symbols start after them
pub const EPS: &str = "ε";
pub const EOF: &str = "$";
pub const ERR: &str = "__err";
pub const EPS_IDX: usize = 0;
pub const EOF_IDX: usize = 1;
pub const ERR_IDX: usize = 2;

// the raw, uninterned shape of a grammar file: names only
pub struct RawGrammar {
  pub name: String,
  pub start: String,
  pub prods: Vec<(String, Vec<String>)>,
}

// symbols a grammar file may use as terminals without being lowercase words
const OPERATOR_TERMS: &[&str] = &[
  "+", "-", "*", "/", "(", ")", "{", "}", ";", "=",
  "<", ">", "!", ",", ".", "&", "|", "^", "~", "%", "?", ":", "[", "]",
  "==", "!=", "<=", ">=", ":=", "++", "--",
  "*=", "/=", "%=", "&=", "|=", "^=",
  "<<", ">>", "<<=", ">>=", "&&", "||",
];

// a terminal is either a known operator/punctuation literal, or an
// alphabetic all-lowercase word; everything else is a nonterminal
pub fn is_terminal_name(s: &str) -> bool {
  if OPERATOR_TERMS.contains(&s) {
    return true;
  }
  let mut chs = s.chars();
  match chs.next() {
    Some(c) if c.is_ascii_alphabetic() => {
      s.chars().all(|c| !c.is_ascii_alphabetic() || c.is_ascii_lowercase())
    }
    _ => false,
  }
}

fn strip_quotes(s: &str) -> &str {
  if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
    &s[1..s.len() - 1]
  } else {
    s
  }
}

impl RawGrammar {
  // line-oriented loader; malformed lines are reported to stderr and skipped
  pub fn parse(text: &str) -> RawGrammar {
    let mut raw = RawGrammar { name: String::new(), start: String::new(), prods: Vec::new() };
    for (num, line) in text.lines().enumerate() {
      let num = num + 1;
      let line = line.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }
      if let Some(rest) = line.strip_prefix("GRAMMAR_NAME") {
        if !raw.name.is_empty() {
          eprintln!("grammar: line {}: duplicate GRAMMAR_NAME, keeping `{}`", num, raw.name);
        } else {
          raw.name = rest.trim().to_owned();
        }
        continue;
      }
      if let Some(rest) = line.strip_prefix("START_SYMBOL") {
        if !raw.start.is_empty() {
          eprintln!("grammar: line {}: duplicate START_SYMBOL, keeping `{}`", num, raw.start);
        } else {
          raw.start = strip_quotes(rest.trim()).to_owned();
        }
        continue;
      }
      if let Some(arrow) = line.find("->") {
        let lhs = strip_quotes(line[..arrow].trim()).to_owned();
        if lhs.is_empty() {
          eprintln!("grammar: line {}: production with empty left-hand side", num);
          continue;
        }
        let rhs = Self::split_symbols(&line[arrow + 2..]);
        raw.prods.push((lhs, rhs));
      } else {
        // continuation line: more right-hand-side symbols for the last production
        match raw.prods.last_mut() {
          Some((_, rhs)) => rhs.extend(Self::split_symbols(line)),
          None => eprintln!("grammar: line {}: continuation line with no preceding production", num),
        }
      }
    }
    raw
  }

  fn split_symbols(s: &str) -> Vec<String> {
    s.split_whitespace().map(|w| strip_quotes(w).to_owned()).collect()
  }

  fn is_augmented(&self) -> bool {
    if self.start.ends_with('\'') {
      return true;
    }
    let aug = format!("{}'", self.start);
    self.prods.iter().any(|(lhs, rhs)| *lhs == aug && rhs.len() == 1 && rhs[0] == self.start)
  }

  // augment (unless already augmented), classify and intern every symbol,
  // renumber productions from 0 with `S' -> S` first
  pub fn extend(&self) -> Result<Grammar, String> {
    if self.start.is_empty() {
      return Err("grammar has no START_SYMBOL".to_owned());
    }
    if self.prods.is_empty() {
      return Err("grammar has no productions".to_owned());
    }

    let mut prods = Vec::with_capacity(self.prods.len() + 1);
    let start_name;
    if self.is_augmented() {
      start_name = if self.start.ends_with('\'') {
        self.start.clone()
      } else {
        format!("{}'", self.start)
      };
      // keep the augmented production first
      prods.extend(self.prods.iter().filter(|(l, _)| *l == start_name).cloned());
      prods.extend(self.prods.iter().filter(|(l, _)| *l != start_name).cloned());
    } else {
      start_name = format!("{}'", self.start);
      prods.push((start_name.clone(), vec![self.start.clone()]));
      prods.extend(self.prods.iter().cloned());
    }

    // `ε` alone on the right-hand side is the empty production
    for (_, rhs) in &mut prods {
      if rhs.len() == 1 && rhs[0] == EPS {
        rhs.clear();
      }
    }

    // first pass: collect symbol name tables in first-seen order
    let mut terms = vec![EPS.to_owned(), EOF.to_owned(), ERR.to_owned()];
    let mut term2id = HashMap::new();
    term2id.insert(EPS.to_owned(), EPS_IDX as u32);
    term2id.insert(EOF.to_owned(), EOF_IDX as u32);
    term2id.insert(ERR.to_owned(), ERR_IDX as u32);
    let mut nts: Vec<String> = Vec::new();
    let mut nt2id: HashMap<String, u32> = HashMap::new();
    {
      let add = |name: &str, terms: &mut Vec<String>, nts: &mut Vec<String>,
                     term2id: &mut HashMap<String, u32>, nt2id: &mut HashMap<String, u32>| {
        if is_terminal_name(name) {
          if !term2id.contains_key(name) {
            term2id.insert(name.to_owned(), terms.len() as u32);
            terms.push(name.to_owned());
          }
        } else if !nt2id.contains_key(name) {
          nt2id.insert(name.to_owned(), nts.len() as u32);
          nts.push(name.to_owned());
        }
      };
      for (lhs, rhs) in &prods {
        if is_terminal_name(lhs) {
          return Err(format!("production left-hand side `{}` looks like a terminal", lhs));
        }
        add(lhs, &mut terms, &mut nts, &mut term2id, &mut nt2id);
        for sym in rhs {
          add(sym, &mut terms, &mut nts, &mut term2id, &mut nt2id);
        }
      }
    }
    let start = match nt2id.get(&start_name) {
      Some(&id) => id,
      None => return Err(format!("start symbol `{}` has no production", start_name)),
    };

    // second pass: intern; terminals occupy [0, terms.len()), nonterminals follow
    let tn = terms.len() as u32;
    let mut interned = Vec::with_capacity(prods.len());
    let mut nt_prods = vec![Vec::new(); nts.len()];
    for (id, (lhs, rhs)) in prods.iter().enumerate() {
      let lhs_id = nt2id[lhs.as_str()];
      let rhs = rhs.iter()
        .map(|s| term2id.get(s.as_str()).copied().unwrap_or_else(|| tn + nt2id[s.as_str()]))
        .collect::<ProdVec>();
      nt_prods[lhs_id as usize].push(id as u32);
      interned.push(Prod { lhs: tn + lhs_id, rhs, id: id as u32 });
    }

    Ok(Grammar {
      name: self.name.clone(),
      terms,
      nts,
      start,
      prods: interned,
      nt_prods,
      term2id,
    })
  }
}

#[derive(Clone)]
pub struct Prod {
  // a symbol id: terminal if < terms.len(), nonterminal otherwise
  pub lhs: u32,
  pub rhs: ProdVec,
  pub id: u32,
}

// terminal id is distributed in [0, terms.len()),
// non-terminal id in [terms.len(), terms.len() + nts.len());
// `start` is the *local* index of the augmented start in `nts`
pub struct Grammar {
  pub name: String,
  pub terms: Vec<String>,
  pub nts: Vec<String>,
  pub start: u32,
  pub prods: Vec<Prod>,
  nt_prods: Vec<Vec<u32>>,
  term2id: HashMap<String, u32>,
}

impl Grammar {
  pub fn token_num(&self) -> usize { self.terms.len() + self.nts.len() }

  pub fn nt_num(&self) -> usize { self.nts.len() }

  // try to convert a general symbol id to an index in `nts`
  pub fn as_nt(&self, ch: u32) -> Option<usize> {
    (ch as usize).checked_sub(self.terms.len()).filter(|&i| i < self.nts.len())
  }

  pub fn term_id(&self, name: &str) -> Option<u32> {
    self.term2id.get(name).copied()
  }

  pub fn prods_of(&self, nt: usize) -> &[u32] {
    &self.nt_prods[nt]
  }

  pub fn show_token(&self, id: u32) -> &str {
    self.terms.get(id as usize).map(String::as_str)
      .unwrap_or_else(|| &self.nts[id as usize - self.terms.len()])
  }

  pub fn show_prod(&self, id: u32, dot: Option<u32>) -> String {
    let prod = &self.prods[id as usize];
    let mut s = format!("{} ->", self.show_token(prod.lhs));
    for (idx, &rhs) in prod.rhs.iter().enumerate() {
      s.push(if Some(idx as u32) == dot { '.' } else { ' ' });
      s += self.show_token(rhs);
    }
    if Some(prod.rhs.len() as u32) == dot { s.push('.'); }
    s
  }

  // the load-time report the parser prints before building tables
  pub fn summary(&self) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "grammar: {}", self.name);
    let _ = writeln!(s, "start symbol: {}", self.nts[self.start as usize]);
    let _ = writeln!(s, "terminals ({}): {}", self.terms.len() - 3, self.terms[3..].join(" "));
    let _ = writeln!(s, "nonterminals ({}): {}", self.nts.len(), self.nts.join(" "));
    let _ = writeln!(s, "productions ({}):", self.prods.len());
    for p in &self.prods {
      let _ = writeln!(s, "[{}] {}", p.id, self.show_prod(p.id, None));
    }
    s
  }
}

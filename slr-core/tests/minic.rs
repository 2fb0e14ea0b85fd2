use slr_core::{conflict, lr0, table::mk_table, Act, FirstFollow, Grammar, RawGrammar};

const MINIC: &str = include_str!("../../demos/minic.grammar");

fn load() -> Grammar {
  RawGrammar::parse(MINIC).extend().unwrap()
}

fn nt(g: &Grammar, name: &str) -> usize {
  g.nts.iter().position(|n| n == name).unwrap()
}

fn follow_names(g: &Grammar, ff: &FirstFollow, name: &str) -> Vec<String> {
  let mut v = Vec::new();
  ff.follow[nt(g, name)].ones(|i| v.push(g.show_token(i as u32).to_owned()));
  v.sort();
  v
}

#[test]
fn minic_loads_completely() {
  let g = load();
  assert_eq!(g.name, "MiniC");
  assert_eq!(g.nts[g.start as usize], "Program'");
  // every keyword and operator the token mapping can produce is a known terminal
  for t in &[
    "id", "num", "int", "void", "if", "else", "while", "return", "read", "write",
    "=", "+", "-", "*", "/", "<", ">", "<=", ">=", "==", "!=", "(", ")", "{", "}", ";", ",",
  ] {
    assert!(g.term_id(t).is_some(), "missing terminal `{}`", t);
  }
  // the augmented production sits at id 0 and the file order follows
  assert_eq!(g.show_prod(0, None), "Program' -> Program");
  assert_eq!(g.show_prod(1, None), "Program -> DeclList");
}

#[test]
fn minic_follow_sets() {
  let g = load();
  let ff = FirstFollow::new(&g);
  // a condition is always parenthesized
  assert_eq!(follow_names(&g, &ff, "RelExpr"), vec![")"]);
  // the dangling-else ambiguity shows up as `else` following a statement
  assert!(follow_names(&g, &ff, "Stmt").contains(&"else".to_owned()));
  // the augmented start is followed by the end marker only
  assert_eq!(follow_names(&g, &ff, "Program'"), vec!["$"]);
  // expressions stop at operators, delimiters and statement ends, never `*`
  let expr = follow_names(&g, &ff, "Expr");
  assert!(expr.contains(&";".to_owned()) && expr.contains(&")".to_owned()));
  assert!(!expr.contains(&"*".to_owned()));
  assert!(follow_names(&g, &ff, "Term").contains(&"*".to_owned()));
}

#[test]
fn minic_table_is_deterministic_after_solve() {
  let g = load();
  let ff = FirstFollow::new(&g);
  let fsm = lr0::work(&g);
  let mut table = mk_table(&fsm, &g, &ff);
  let conflicts = conflict::solve(&mut table, &g);
  assert_eq!(conflicts.len(), 1, "only the dangling else may conflict");
  for entry in &table {
    for (_, acts) in &entry.act {
      assert_eq!(acts.len(), 1);
    }
  }
  // exactly one accept entry in the whole table
  let accepts = table.iter()
    .flat_map(|e| e.act.values())
    .filter(|a| matches!(a[0], Act::Acc))
    .count();
  assert_eq!(accepts, 1);
}

#[test]
fn minic_automaton_covers_every_production() {
  let g = load();
  let fsm = lr0::work(&g);
  // every production must be reducible somewhere, or it could never fire
  let mut reduced = vec![false; g.prods.len()];
  for node in &fsm {
    for item in &node.closure {
      if item.is_reduce(&g) {
        reduced[item.prod_id as usize] = true;
      }
    }
  }
  for (id, r) in reduced.iter().enumerate() {
    assert!(r, "production {} is never reducible: {}", id, g.show_prod(id as u32, None));
  }
}

#[test]
fn first_follow_dump_mentions_every_nonterminal() {
  let g = load();
  let ff = FirstFollow::new(&g);
  let dump = ff.dump(&g);
  for n in &g.nts {
    assert!(dump.contains(&format!("FIRST({})", n)));
    assert!(dump.contains(&format!("FOLLOW({})", n)));
  }
  assert!(dump.contains(&format!("FOLLOW(Program') = {{ {} }}", "$")));
}

#[test]
fn goto_entries_only_on_nonterminals() {
  let g = load();
  let ff = FirstFollow::new(&g);
  let fsm = lr0::work(&g);
  let table = mk_table(&fsm, &g, &ff);
  for entry in &table {
    for (&sym, _) in &entry.goto {
      assert!(g.as_nt(sym).is_some());
    }
    for (&sym, _) in &entry.act {
      assert!(g.as_nt(sym).is_none());
    }
  }
}

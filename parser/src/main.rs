use clap::{App, Arg};
use std::process::exit;
use std::{fs, io};

use slr_core::{conflict, conflict::ConflictDisplay, lr0, table::mk_table, FirstFollow, RawGrammar};
use syntax::{token_file, Driver};

// build the SLR(1) table from the grammar file, replay the scanner's token
// file through the driver, and dump the symbol table and the quads
fn main() -> io::Result<()> {
  let m = App::new("parser")
    .about("SLR(1) parser: grammar file + token file -> symbol table and three-address code")
    .arg(Arg::with_name("grammar").required(true))
    .arg(Arg::with_name("tokens").required(true))
    .arg(Arg::with_name("verbose").long("verbose").help("Print item-set statistics to stderr"))
    .get_matches();

  let grammar_text = fs::read_to_string(m.value_of("grammar").unwrap())?;
  let raw = RawGrammar::parse(&grammar_text);
  let g = raw.extend().unwrap_or_else(|e| {
    eprintln!("parser: {}", e);
    exit(1);
  });
  print!("{}", g.summary());

  let ff = FirstFollow::new(&g);
  let fsm = lr0::work(&g);
  let mut table = mk_table(&fsm, &g, &ff);
  let conflicts = conflict::solve(&mut table, &g);
  if m.is_present("verbose") {
    eprint!("{}", ff.dump(&g));
    eprintln!("parser: lr(0) automaton has {} states", fsm.len());
  }
  for c in &conflicts {
    println!("{}", ConflictDisplay(c, &g));
  }

  let token_text = fs::read_to_string(m.value_of("tokens").unwrap())?;
  let tokens = token_file::load_tokens(&token_text);

  match Driver::new(&g, &table).parse(&tokens) {
    Ok(result) => {
      print!("{}", result.symtab.dump());
      println!("ir ({} quads):", result.quads.len());
      print!("{}", result.quads);
      Ok(())
    }
    Err(e) => {
      eprintln!("parser: {}", e);
      exit(1);
    }
  }
}

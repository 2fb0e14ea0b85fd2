use clap::{App, Arg};
use std::path::PathBuf;
use std::process::{exit, Command};
use std::{env, io};

// the two stages run as separate processes and meet at the token file
const TOKEN_FILE: &str = "tokens.txt";

// the scanner and parser binaries are installed next to this one
fn sibling(name: &str) -> io::Result<PathBuf> {
  let mut path = env::current_exe()?;
  path.set_file_name(name);
  Ok(path)
}

fn run(bin: &str, args: &[&str]) -> io::Result<bool> {
  let path = sibling(bin)?;
  let status = Command::new(&path).args(args).status()?;
  Ok(status.success())
}

fn main() -> io::Result<()> {
  let m = App::new("minicc")
    .about("Run the generated scanner, then the SLR(1) parser, over a MiniC source file")
    .arg(Arg::with_name("source").required(true))
    .arg(Arg::with_name("rules").required(true))
    .arg(Arg::with_name("grammar").required(true))
    .get_matches();

  let source = m.value_of("source").unwrap();
  let rules = m.value_of("rules").unwrap();
  let grammar = m.value_of("grammar").unwrap();

  println!("[minicc] running scanner on {}", source);
  if !run("scanner", &[source, rules, "--output", TOKEN_FILE])? {
    eprintln!("[minicc] scanner failed");
    exit(1);
  }

  println!("[minicc] running parser on {}", TOKEN_FILE);
  if !run("parser", &[grammar, TOKEN_FILE])? {
    eprintln!("[minicc] parser failed");
    exit(1);
  }
  Ok(())
}

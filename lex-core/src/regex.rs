// the minimal operator set thompson construction needs
pub enum Re {
  Ch(u8),
  Concat(Box<Re>, Box<Re>),
  Union(Box<Re>, Box<Re>),
  Star(Box<Re>),
}

impl Re {
  // a literal string, matched byte by byte; right-deep concatenation
  pub fn literal(s: &str) -> Option<Re> {
    let mut it = s.bytes().rev();
    let mut node = Re::Ch(it.next()?);
    for b in it {
      node = Re::Concat(Box::new(Re::Ch(b)), Box::new(node));
    }
    Some(node)
  }

  // a byte class as a left-deep union
  fn class(mut bytes: impl Iterator<Item = u8>) -> Option<Re> {
    let mut node = Re::Ch(bytes.next()?);
    for b in bytes {
      node = Re::Union(Box::new(node), Box::new(Re::Ch(b)));
    }
    Some(node)
  }

  // letter or underscore, then (letter | digit | underscore)*
  pub fn ident() -> Re {
    let head = || (b'a'..=b'z').chain(b'A'..=b'Z').chain(std::iter::once(b'_'));
    let tail = || head().chain(b'0'..=b'9');
    Re::Concat(
      Box::new(Re::class(head()).unwrap()),
      Box::new(Re::Star(Box::new(Re::class(tail()).unwrap()))),
    )
  }

  // [0-9][0-9]*
  pub fn number() -> Re {
    let digit = || Re::class(b'0'..=b'9').unwrap();
    Re::Concat(Box::new(digit()), Box::new(Re::Star(Box::new(digit()))))
  }

  // the rule file pattern language: the two named built-ins, or a literal
  pub fn from_pattern(pattern: &str) -> Option<Re> {
    match pattern {
      "{ID}" => Some(Re::ident()),
      "{NUM}" => Some(Re::number()),
      _ => Re::literal(pattern),
    }
  }
}

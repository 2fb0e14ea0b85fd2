use common::TokenKind;

// one `TOKEN_NAME pattern` line of the rule file
pub struct LexRule {
  pub kind: TokenKind,
  pub pattern: String,
}

pub struct RuleSet {
  pub rules: Vec<LexRule>,
}

impl RuleSet {
  // line-oriented: blank lines and `#` comments are skipped, an unknown token name is fatal
  pub fn parse(text: &str) -> Result<RuleSet, String> {
    let mut rules = Vec::new();
    for line in text.lines() {
      let line = line.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }
      let mut sp = line.split_whitespace();
      let (name, pattern) = match (sp.next(), sp.next()) {
        (Some(n), Some(p)) => (n, p),
        _ => continue,
      };
      let kind = TokenKind::from_name(name)
        .ok_or_else(|| format!("unknown token name in rule file: `{}`", name))?;
      rules.push(LexRule { kind, pattern: pattern.to_owned() });
    }
    Ok(RuleSet { rules })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_rules_and_skips_noise() {
    let rs = RuleSet::parse("# keywords\nINT int\n\nID {ID}\nNUM {NUM}\nASSIGN =\n").unwrap();
    assert_eq!(rs.rules.len(), 4);
    assert_eq!(rs.rules[0].kind, TokenKind::Int);
    assert_eq!(rs.rules[1].pattern, "{ID}");
    assert_eq!(rs.rules[3].pattern, "=");
  }

  #[test]
  fn unknown_name_is_fatal() {
    assert!(RuleSet::parse("FLOAT 1.0\n").is_err());
  }
}

pub mod rules;
pub mod regex;
pub mod nfa;
pub mod dfa;
pub mod lexer;

pub use crate::rules::{LexRule, RuleSet};
pub use crate::regex::Re;
pub use crate::nfa::Nfa;
pub use crate::dfa::Dfa;
pub use crate::lexer::Lexer;

// the whole generation pipeline: rules -> nfa -> dfa -> minimized dfa
pub fn build_dfa(rules: &RuleSet) -> Dfa {
  Dfa::subset(&Nfa::from_rules(rules)).minimize()
}

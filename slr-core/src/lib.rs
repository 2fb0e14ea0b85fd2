#[macro_use]
extern crate smallvec;

pub mod grammar;
pub mod first_follow;
pub mod lr0;
pub mod table;
pub mod conflict;

pub use crate::grammar::*;
pub use crate::first_follow::FirstFollow;
pub use crate::lr0::{Lr0Item, Lr0Node, Lr0Fsm};
pub use crate::table::{Act, Acts, TableEntry, Table};
pub use crate::conflict::{Conflict, ConflictKind};

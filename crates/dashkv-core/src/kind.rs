//! The enumerated tag identifying an entity's type within the store.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Entity kind. Serialised in PascalCase (`"GlobalRole"`), parsed
/// case-insensitively so `globalrole` on a command line works too.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Kind {
  GlobalRole,
  Project,
}

impl Kind {
  /// The first key segment under which entities of this kind are stored.
  pub fn plural(self) -> &'static str {
    match self {
      Self::GlobalRole => "globalroles",
      Self::Project => "projects",
    }
  }
}

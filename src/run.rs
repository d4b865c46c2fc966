mod cli;
mod tui;

pub(crate) use cli::{as_cli, parse_add_args};
pub(crate) use tui::as_tui;

use crate::db::Database;
use crate::store::Tracker;

/// The store as wired up by `main`: SQLite-backed.
pub(crate) type Store = Tracker<Database>;

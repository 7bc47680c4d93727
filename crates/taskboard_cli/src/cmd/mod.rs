//! CLI command implementations.
//!
//! | Module  | Commands handled |
//! |---------|------------------|
//! | `board` | `Board`          |
//! | `card`  | `Card`           |
//! | `drop`  | `Move`           |
//! | `view`  | `View`           |

pub mod board;
pub mod card;
pub mod drop;
pub mod view;

pub use board::cmd_board;
pub use card::cmd_card;
pub use drop::cmd_move;
pub use view::cmd_view;

use taskboard_core::Patch;

/// Patch for an optional field driven by a `--x <value>` / `--clear-x` pair.
pub(crate) fn clearable<T>(value: Option<T>, clear: bool) -> Patch<Option<T>> {
    if clear {
        Patch::Set(None)
    } else {
        Patch::from_option(value.map(Some))
    }
}

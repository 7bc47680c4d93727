use super::clearable;
use crate::BoardCommands;
use anyhow::{Context, Result};
use taskboard_core::{BoardPatch, BoardSession, KeyValueStore, NewBoard, Patch};

pub fn cmd_board<S: KeyValueStore>(
    session: &mut BoardSession<S>,
    command: &BoardCommands,
) -> Result<()> {
    match command {
        BoardCommands::Add {
            title,
            color,
            order,
        } => {
            let board = session
                .create_board(NewBoard {
                    title: Some(title.clone()),
                    order: *order,
                    color: color.clone(),
                })
                .context("Failed to create board")?;
            println!("{}", board.id);
        }
        BoardCommands::Edit {
            id,
            title,
            color,
            clear_color,
            order,
        } => {
            let patch = BoardPatch {
                title: Patch::from_option(title.clone()),
                order: Patch::from_option(*order),
                color: clearable(color.clone(), *clear_color),
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to change for board {id}");
            }
            let board = session
                .update_board(id, patch)
                .with_context(|| format!("Failed to update board {id}"))?;
            println!("{} {}", board.id, board.title);
        }
        BoardCommands::Delete { id } => {
            session
                .delete_board(id)
                .with_context(|| format!("Failed to delete board {id}"))?;
            println!("Deleted board {id}");
        }
    }
    Ok(())
}

use super::clearable;
use crate::CardCommands;
use anyhow::{Context, Result};
use taskboard_core::{BoardSession, CardPatch, KeyValueStore, NewCard, Patch};

pub fn cmd_card<S: KeyValueStore>(
    session: &mut BoardSession<S>,
    command: &CardCommands,
) -> Result<()> {
    match command {
        CardCommands::Add {
            board,
            content,
            description,
            due,
            frequency,
            labels,
            order,
        } => {
            let new = NewCard {
                description: description.clone(),
                order: *order,
                due_date: *due,
                frequency: frequency.map(Into::into),
                labels: labels.clone(),
                ..NewCard::new(board.as_str(), content.as_str())
            };
            let card = session
                .create_card(new)
                .with_context(|| format!("Failed to create card on board {board}"))?;
            println!("{}", card.id);
        }
        CardCommands::Edit {
            id,
            content,
            description,
            clear_description,
            due,
            clear_due,
            frequency,
            clear_frequency,
            labels,
            clear_labels,
            board,
            order,
        } => {
            let labels = if *clear_labels {
                Patch::Set(Vec::new())
            } else if labels.is_empty() {
                Patch::Keep
            } else {
                Patch::Set(labels.clone())
            };
            let patch = CardPatch {
                board_id: Patch::from_option(board.clone()),
                content: Patch::from_option(content.clone()),
                description: clearable(description.clone(), *clear_description),
                order: Patch::from_option(*order),
                due_date: clearable(*due, *clear_due),
                frequency: clearable(frequency.map(Into::into), *clear_frequency),
                is_completed: Patch::Keep,
                labels,
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to change for card {id}");
            }
            let card = session
                .update_card(id, patch)
                .with_context(|| format!("Failed to update card {id}"))?;
            println!("{} {}", card.id, card.content);
        }
        CardCommands::Done { id } => {
            session
                .set_completed(id, true)
                .with_context(|| format!("Failed to complete card {id}"))?;
            println!("Completed card {id}");
        }
        CardCommands::Undo { id } => {
            session
                .set_completed(id, false)
                .with_context(|| format!("Failed to reopen card {id}"))?;
            println!("Reopened card {id}");
        }
        CardCommands::Delete { id } => {
            session
                .delete_card(id)
                .with_context(|| format!("Failed to delete card {id}"))?;
            println!("Deleted card {id}");
        }
    }
    Ok(())
}

use anyhow::{Context, Result};
use taskboard_core::{BoardSession, DropEvent, DropKind, KeyValueStore};

pub fn cmd_move<S: KeyValueStore>(
    session: &mut BoardSession<S>,
    dragged: &str,
    target: Option<&str>,
) -> Result<()> {
    let event = DropEvent::new(dragged, target.map(str::to_string));
    let outcome = session
        .handle_drop(&event)
        .with_context(|| format!("Failed to move {dragged}"))?;

    match outcome.kind {
        DropKind::Ignored => println!("Nothing moved"),
        DropKind::CardReorder { board_id } => {
            println!("Reordered board {board_id} ({} updates)", outcome.updates)
        }
        DropKind::CardMove { from, to } | DropKind::CardToBoard { from, to } => println!(
            "Moved card from {from} to {to} ({} updates)",
            outcome.updates
        ),
        DropKind::BoardReorder => println!("Reordered boards ({} updates)", outcome.updates),
    }
    Ok(())
}

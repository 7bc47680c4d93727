//! Plain-text rendering of the board projections.

use chrono::Datelike;
use std::fmt::Write;
use taskboard_core::view::calendar::MonthGrid;
use taskboard_core::view::kanban::KanbanBoard;
use taskboard_core::view::list::CardGroup;
use taskboard_core::Card;

const MAX_CELL_CARDS: usize = 2;

pub fn kanban(board: &KanbanBoard<'_>) -> String {
    let mut out = String::new();
    if board.columns.is_empty() {
        out.push_str("No boards yet\n");
        return out;
    }
    for column in &board.columns {
        let _ = writeln!(
            out,
            "== {} [{}] ({})",
            column.board.title, column.board.id, column.cards.len()
        );
        for card in &column.cards {
            let _ = writeln!(out, "  {}", card_line(card));
        }
    }
    out
}

pub fn list(groups: &[CardGroup<'_>]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "## {} {}", group.title(), group.color());
        if group.cards.is_empty() {
            out.push_str("  (empty)\n");
        }
        for card in &group.cards {
            let _ = writeln!(out, "  {}", card_line(card));
        }
    }
    out
}

pub fn calendar(grid: &MonthGrid<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", grid.title());
    out.push_str("Sun Mon Tue Wed Thu Fri Sat\n");
    for week in grid.weeks() {
        let cells: Vec<String> = week
            .iter()
            .map(|day| {
                let marker = if day.is_today {
                    '*'
                } else if day.cards.is_empty() {
                    ' '
                } else {
                    '+'
                };
                if day.in_current_month {
                    format!("{:>2}{marker}", day.date.day())
                } else {
                    "   ".to_string()
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" ").trim_end());
    }

    for day in grid.days.iter().filter(|day| !day.cards.is_empty()) {
        let _ = writeln!(out, "{}", day.date.format("%Y-%m-%d"));
        for card in day.cards.iter().take(MAX_CELL_CARDS) {
            let _ = writeln!(out, "  {}", card_line(card));
        }
        if day.cards.len() > MAX_CELL_CARDS {
            let _ = writeln!(out, "  +{} more", day.cards.len() - MAX_CELL_CARDS);
        }
    }
    out
}

fn card_line(card: &Card) -> String {
    let mut line = format!(
        "[{}] {} {}",
        if card.is_completed { 'x' } else { ' ' },
        card.content,
        card.id
    );
    if let Some(due) = card.due_date {
        let _ = write!(line, " due:{}", due.format("%Y-%m-%d"));
    }
    if !card.labels.is_empty() {
        let _ = write!(line, " #{}", card.labels.join(" #"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::{calendar, kanban, list};
    use chrono::NaiveDate;
    use taskboard_core::view::list::{group_by_board, ListSort};
    use taskboard_core::view::{calendar as cal, kanban as kb};
    use taskboard_core::{Board, Card, Snapshot};

    fn snapshot() -> Snapshot {
        let board = Board::new("Todo");
        let mut card = Card::new(board.id.clone(), "Write report");
        card.order = 1;
        card.labels = vec!["work".to_string()];
        card.due_date = NaiveDate::from_ymd_opt(2025, 3, 14);
        let orphan = Card::new("gone", "Orphan");
        Snapshot {
            revision: 1,
            boards: vec![board],
            cards: vec![card, orphan],
        }
    }

    #[test]
    fn kanban_lists_cards_under_their_board() {
        let snapshot = snapshot();
        let text = kanban(&kb::columns(&snapshot));
        assert!(text.starts_with("== Todo"));
        assert!(text.contains("Write report"));
        assert!(text.contains("due:2025-03-14 #work"));
        assert!(!text.contains("Orphan"));
    }

    #[test]
    fn list_ends_with_unassigned_group() {
        let snapshot = snapshot();
        let text = list(&group_by_board(&snapshot, ListSort::default()));
        let unassigned = text.find("## Unassigned").unwrap();
        assert!(text[unassigned..].contains("Orphan"));
    }

    #[test]
    fn calendar_marks_due_days() {
        let snapshot = snapshot();
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let grid = cal::month_grid(&snapshot, 2025, 3, today).unwrap();
        let text = calendar(&grid);
        assert!(text.starts_with("March 2025\n"));
        assert!(text.contains("14+"));
        assert!(text.contains(" 1*"));
        assert!(text.contains("2025-03-14\n  [ ] Write report"));
    }
}

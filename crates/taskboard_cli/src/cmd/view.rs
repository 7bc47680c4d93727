use crate::render;
use crate::{SortArg, ViewCommands};
use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use taskboard_core::view::list::{group_by_board, ListSort, SortDirection, SortField};
use taskboard_core::view::{calendar, kanban};
use taskboard_core::{BoardSession, KeyValueStore};

pub fn cmd_view<S: KeyValueStore>(session: &BoardSession<S>, command: &ViewCommands) -> Result<()> {
    let snapshot = session.snapshot();
    let output = match command {
        ViewCommands::Board => render::kanban(&kanban::columns(snapshot)),
        ViewCommands::List { sort, desc } => {
            let sort = list_sort(*sort, *desc);
            render::list(&group_by_board(snapshot, sort))
        }
        ViewCommands::Calendar { month } => {
            let today = Local::now().date_naive();
            let (year, month) = month.unwrap_or((today.year(), today.month()));
            let grid = calendar::month_grid(snapshot, year, month, today)
                .with_context(|| format!("Invalid month {year}-{month:02}"))?;
            render::calendar(&grid)
        }
    };
    print!("{output}");
    Ok(())
}

fn list_sort(sort: Option<SortArg>, desc: bool) -> ListSort {
    let Some(sort) = sort else {
        return ListSort::default();
    };
    let field = match sort {
        SortArg::Content => SortField::Content,
        SortArg::Due => SortField::DueDate,
        SortArg::Created => SortField::CreatedAt,
        SortArg::Updated => SortField::UpdatedAt,
    };
    ListSort {
        field,
        direction: if desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
    }
}

use core::fmt::Write;
use sapper_core::{Cell, CellView, Coord, Coord2, GameStatus, MinefieldEngine};
use serde::Serialize;

fn digits(n: Coord) -> usize {
    match n {
        0..=9 => 1,
        10..=99 => 2,
        _ => 3,
    }
}

fn play_glyph(view: CellView) -> char {
    match view {
        CellView::Hidden => '#',
        CellView::Flagged => 'F',
        CellView::Revealed(0) => '.',
        CellView::Revealed(count) => char::from(b'0' + count),
        CellView::Exploded => '@',
    }
}

/// Glyph once the game is over, when mine positions may be shown.
fn final_glyph(cell: Cell) -> char {
    match (cell.is_mine(), cell.is_flagged()) {
        (true, false) if !cell.is_revealed() => '*',
        (false, true) => 'x',
        _ => play_glyph(cell.view()),
    }
}

/// Text grid with column numbers on top and row numbers on the left.
pub(crate) fn render_board(engine: &MinefieldEngine, uncover: bool) -> String {
    let (size_x, size_y) = engine.size();
    let col_width = digits(size_x.saturating_sub(1));
    let row_width = digits(size_y.saturating_sub(1));
    let mut out = String::new();

    // writing into a String cannot fail
    let _ = write!(out, "{:row_width$}", "");
    for x in 0..size_x {
        let _ = write!(out, " {x:>col_width$}");
    }
    out.push('\n');

    for y in 0..size_y {
        let _ = write!(out, "{y:>row_width$}");
        for x in 0..size_x {
            let glyph = match engine.cell((x, y)) {
                Ok(cell) if uncover => final_glyph(cell),
                Ok(cell) => play_glyph(cell.view()),
                Err(_) => '?',
            };
            let _ = write!(out, " {glyph:>col_width$}");
        }
        out.push('\n');
    }

    let _ = write!(out, "Mines left: {}", engine.mines_left());
    out
}

#[derive(Debug, Serialize)]
pub(crate) struct BoardDump {
    size: Coord2,
    status: GameStatus,
    mines_left: isize,
    /// Row-major, `cells[y][x]`.
    cells: Vec<Vec<CellView>>,
}

impl BoardDump {
    pub(crate) fn from_engine(engine: &MinefieldEngine) -> Self {
        let (size_x, size_y) = engine.size();
        let cells = (0..size_y)
            .map(|y| {
                (0..size_x)
                    .map(|x| engine.cell_view((x, y)).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self {
            size: engine.size(),
            status: engine.status(),
            mines_left: engine.mines_left(),
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::Field;

    fn engine() -> MinefieldEngine {
        let field = Field::from_mine_coords((3, 2), &[(2, 0)]).unwrap();
        MinefieldEngine::from_field(field)
    }

    #[test]
    fn renders_hidden_board() {
        assert_eq!(
            render_board(&engine(), false),
            "  0 1 2\n0 # # #\n1 # # #\nMines left: 1"
        );
    }

    #[test]
    fn renders_numbers_and_flags() {
        let mut engine = engine();
        engine.reveal((0, 1)).unwrap();
        engine.toggle_flag((2, 0)).unwrap();

        assert_eq!(
            render_board(&engine, false),
            "  0 1 2\n0 . 1 F\n1 . 1 #\nMines left: 0"
        );
    }

    #[test]
    fn uncovered_board_shows_mines_and_misflags() {
        let mut engine = engine();
        engine.toggle_flag((0, 0)).unwrap();
        engine.reveal((1, 1)).unwrap();

        assert_eq!(
            render_board(&engine, true),
            "  0 1 2\n0 x # *\n1 # 1 #\nMines left: 0"
        );
    }

    #[test]
    fn wide_boards_pad_columns() {
        let engine = MinefieldEngine::from_field(Field::from_mine_coords((11, 1), &[]).unwrap());
        let text = render_board(&engine, false);

        assert!(text.starts_with("   0  1  2"));
        assert!(text.contains(" 9 10\n"));
    }

    #[test]
    fn dump_is_row_major() {
        let mut engine = engine();
        engine.reveal((0, 1)).unwrap();

        let json = serde_json::to_value(BoardDump::from_engine(&engine)).unwrap();

        assert_eq!(json["size"], serde_json::json!([3, 2]));
        assert_eq!(json["status"], "Unknown");
        assert_eq!(json["cells"][1][0], serde_json::json!({ "Revealed": 0 }));
        assert_eq!(json["cells"][0][2], "Hidden");
    }
}

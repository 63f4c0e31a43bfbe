//! ASCII rendering of a fogged board.

use dungeon_vision_board::{query, Board};
use dungeon_vision_core::{Coordinate, TileDescriptor, TileKind};

use crate::scenario::ORIGIN_GLYPH;

/// Renders the bounding box of every known tile and the origin.
///
/// Fogged and unknown coordinates are blank. Visible tiles use the same
/// glyphs accepted by scenario layouts. Trailing blanks are trimmed.
pub(crate) fn render(board: &Board, origin: Coordinate) -> String {
    let coordinates = query::known_coordinates(board);
    let columns = coordinates.iter().map(|coordinate| coordinate.column());
    let rows = coordinates.iter().map(|coordinate| coordinate.row());
    let min_column = columns.clone().min().unwrap_or(origin.column()).min(origin.column());
    let max_column = columns.max().unwrap_or(origin.column()).max(origin.column());
    let min_row = rows.clone().min().unwrap_or(origin.row()).min(origin.row());
    let max_row = rows.max().unwrap_or(origin.row()).max(origin.row());

    let mut output = String::new();
    for row in min_row..=max_row {
        let line: String = (min_column..=max_column)
            .map(|column| glyph_at(board, Coordinate::new(column, row), origin))
            .collect();
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

fn glyph_at(board: &Board, coordinate: Coordinate, origin: Coordinate) -> char {
    if coordinate == origin {
        return ORIGIN_GLYPH;
    }
    if query::is_fogged(board, coordinate) {
        return ' ';
    }
    query::descriptor(board, coordinate).map_or(' ', tile_glyph)
}

fn tile_glyph(descriptor: &TileDescriptor) -> char {
    match descriptor.kind {
        TileKind::Decor if descriptor.blocks_vision => '*',
        _ if descriptor.blocks_vision => '#',
        TileKind::Water => '~',
        _ if descriptor.is_shadow => ',',
        _ => '.',
    }
}

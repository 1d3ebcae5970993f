use tile_defence_rendering::{Scene, TileAppearance};

/// Draws the scene as one text line per row.
///
/// `S` marks the start, `B` the base, `#` a tower, `.` the path and a blank
/// the remaining ground.
pub(crate) fn render(scene: &Scene, columns: usize) -> String {
    let mut out = String::with_capacity(scene.tiles.len() + scene.tiles.len() / columns.max(1));
    for row in scene.tiles.chunks(columns.max(1)) {
        for sprite in row {
            out.push(glyph(sprite.appearance, sprite.blocked));
        }
        out.push('\n');
    }
    out
}

fn glyph(appearance: TileAppearance, blocked: bool) -> char {
    match appearance {
        TileAppearance::Start => 'S',
        TileAppearance::Base => 'B',
        _ if blocked => '#',
        TileAppearance::Path | TileAppearance::PathSelected => '.',
        TileAppearance::Ground | TileAppearance::GroundSelected => ' ',
    }
}

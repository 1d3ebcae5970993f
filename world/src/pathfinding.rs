//! A* search over the tile graph.

use tile_defence_core::TileCoord;
use tracing::trace;

use crate::graph::{Tile, TileGraph};

/// Runs A* from `start` to `goal`, leaving a parent chain in the tiles.
///
/// Every edge costs one tile length and the heuristic is the straight-line
/// distance to `goal`. On success, following parents from `goal` reaches
/// `start`. On failure the parents are not a usable chain and must not be
/// read. Coordinates outside the grid fail without touching any tile.
pub(crate) fn find_path(graph: &mut TileGraph, start: TileCoord, goal: TileCoord) -> bool {
    let (Some(start), Some(goal)) = (graph.index_of(start), graph.index_of(goal)) else {
        return false;
    };

    graph.reset_search_state();

    let edge_cost = graph.tile_size();
    let goal_position = graph.tiles[goal].position();
    let mut open_set: Vec<usize> = Vec::new();
    let mut expanded = 0_usize;

    let mut current = start;
    graph.tiles[current].search.in_closed_set = true;

    while current != goal {
        let current_g = graph.tiles[current].search.g;

        for slot in 0..graph.tiles[current].adjacent().len() {
            let neighbour_index = graph.tiles[current].adjacent()[slot];
            let neighbour = &mut graph.tiles[neighbour_index];
            if neighbour.blocked || neighbour.search.in_closed_set {
                continue;
            }

            let g = current_g + edge_cost;
            let position = neighbour.position();
            let search = &mut neighbour.search;
            if !search.in_open_set {
                search.parent = Some(current);
                search.h = position.distance(goal_position);
                search.g = g;
                search.f = g + search.h;
                search.in_open_set = true;
                open_set.push(neighbour_index);
            } else if g < search.g {
                search.parent = Some(current);
                search.g = g;
                search.f = g + search.h;
            }
        }

        let Some(slot) = cheapest(&graph.tiles, &open_set) else {
            trace!(expanded, "open set exhausted before reaching the goal");
            return false;
        };

        current = open_set.remove(slot);
        let search = &mut graph.tiles[current].search;
        search.in_open_set = false;
        search.in_closed_set = true;
        expanded += 1;
    }

    trace!(expanded, "search reached the goal");
    true
}

/// Position in `open_set` of the first tile with the lowest total cost.
fn cheapest(tiles: &[Tile], open_set: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (slot, &index) in open_set.iter().enumerate() {
        let f = tiles[index].search().f;
        match best {
            Some((_, best_f)) if f >= best_f => {}
            _ => best = Some((slot, f)),
        }
    }
    best.map(|(slot, _)| slot)
}

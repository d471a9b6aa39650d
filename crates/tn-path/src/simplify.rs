//! String pulling: drop intermediate tiles a straight line can skip.

use log::trace;

use tn_core::{TileId, TraversalProfile};
use tn_grid::TileGraph;

/// Straighten `tiles` into waypoints.
///
/// The result always keeps the first and last tile.  From each anchor the
/// farthest later tile is chosen such that
///
/// * every tile in between allows shortcuts,
/// * the tiles in the span share at least one of the agent's modes, and
/// * a trace between the two locations is clear.
///
/// Consecutive waypoints therefore remain traversable to one another.  With
/// `enabled == false` the input is returned unchanged.
pub fn string_pull(
    graph:   &TileGraph<'_>,
    tiles:   &[TileId],
    profile: &TraversalProfile,
    enabled: bool,
) -> Vec<TileId> {
    if !enabled || tiles.len() <= 2 {
        return tiles.to_vec();
    }

    let last = tiles.len() - 1;
    let mut out = vec![tiles[0]];
    let mut anchor = 0;
    while anchor < last {
        let mut next = anchor + 1;
        for candidate in (anchor + 2..=last).rev() {
            if can_shortcut(graph, &tiles[anchor..=candidate], profile) {
                next = candidate;
                break;
            }
        }
        if next > anchor + 1 {
            trace!("string pull: {} -> {} skips {}", tiles[anchor], tiles[next], next - anchor - 1);
        }
        out.push(tiles[next]);
        anchor = next;
    }
    out
}

/// Whether the first and last tile of `span` can be joined directly.
fn can_shortcut(graph: &TileGraph<'_>, span: &[TileId], profile: &TraversalProfile) -> bool {
    let mut shared = profile.modes;
    for &id in span {
        let Some(tile) = graph.tile(id) else { return false };
        if !tile.allows_shortcut() || !tile.traversable(profile) {
            return false;
        }
        shared = shared.intersection(tile.legal_modes());
    }
    if shared.is_empty() {
        return false;
    }

    match (span.first().and_then(|&t| graph.tile(t)), span.last().and_then(|&t| graph.tile(t))) {
        (Some(a), Some(b)) => !graph.obstructed(a.location, b.location),
        _ => false,
    }
}

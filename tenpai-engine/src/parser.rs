//! Compact tile notation: digits followed by their suit letter, e.g.
//! `"123m406p77z"`. A `0` is the red five of its suit.

use crate::errors::{HandError, HandResult};
use crate::tile::{Suit, Tile, TileCounts, TileType, NUM_TILE_TYPES};

/// Hands out physical copies so no instance is used twice.
struct TileManager {
    used: [[bool; 4]; NUM_TILE_TYPES],
}

impl TileManager {
    fn new() -> Self {
        Self {
            used: [[false; 4]; NUM_TILE_TYPES],
        }
    }

    fn get_tile(&mut self, tile_type: TileType, is_red: bool) -> Result<Tile, String> {
        let is_five = tile_type.is_suited() && tile_type.rank() == 5;

        // Plain fives leave the red copy for last.
        let search_indices: &[u8] = match (is_five, is_red) {
            (true, true) => &[0],
            (true, false) => &[1, 2, 3, 0],
            (false, _) => &[0, 1, 2, 3],
        };

        let copy = search_indices
            .iter()
            .find(|&&idx| !self.used[tile_type.index()][idx as usize])
            .copied()
            .ok_or_else(|| format!("No more copies of tile {}", tile_type))?;
        self.used[tile_type.index()][copy as usize] = true;
        Ok(Tile::from_type(tile_type, copy))
    }
}

fn parse_error(text: &str, message: impl Into<String>) -> HandError {
    HandError::Parse {
        input: text.to_string(),
        message: message.into(),
    }
}

pub fn parse_tiles(text: &str) -> HandResult<Vec<Tile>> {
    let mut tm = TileManager::new();
    let mut tiles = Vec::new();
    let mut pending_digits: Vec<u8> = Vec::new();

    for c in text.chars() {
        if let Some(d) = c.to_digit(10) {
            pending_digits.push(d as u8);
        } else if let Some(suit) = Suit::from_letter(c) {
            if pending_digits.is_empty() {
                return Err(parse_error(text, format!("Suit '{}' without digits", c)));
            }
            for &d in &pending_digits {
                let (rank, is_red) = match (d, suit) {
                    (0, Suit::Jihai) => {
                        return Err(parse_error(text, "Honors have no red tile"));
                    }
                    (0, _) => (5, true),
                    (d, _) => (d, false),
                };
                let tile_type = TileType::from_suit_rank(suit, rank)
                    .ok_or_else(|| parse_error(text, format!("No tile {}{}", d, c)))?;
                let tile = tm
                    .get_tile(tile_type, is_red)
                    .map_err(|e| parse_error(text, e))?;
                tiles.push(tile);
            }
            pending_digits.clear();
        } else if !c.is_whitespace() {
            return Err(parse_error(text, format!("Unexpected character '{}'", c)));
        }
    }

    if !pending_digits.is_empty() {
        return Err(parse_error(text, "Pending digits without suit"));
    }

    Ok(tiles)
}

pub fn parse_tile(text: &str) -> HandResult<Tile> {
    let tiles = parse_tiles(text)?;
    match tiles.as_slice() {
        [tile] => Ok(*tile),
        [] => Err(parse_error(text, "No tile found in string")),
        _ => Err(parse_error(
            text,
            format!(
                "Expected exactly one tile, but found {} tiles in string",
                tiles.len()
            ),
        )),
    }
}

/// Parses notation straight into a per-type histogram.
pub fn parse_counts(text: &str) -> HandResult<TileCounts> {
    Ok(crate::tile::count_tiles(&parse_tiles(text)?))
}

/// Formats tiles in notation, grouping consecutive tiles of one suit.
pub fn tiles_to_string(tiles: &[Tile]) -> String {
    let mut out = String::new();
    let mut current: Option<Suit> = None;
    for tile in tiles {
        let suit = tile.suit();
        if current.is_some_and(|s| s != suit) {
            out.push(current.map_or('?', Suit::letter));
        }
        current = Some(suit);
        let digit = if tile.is_red() { 0 } else { tile.rank() };
        out.push(char::from(b'0' + digit));
    }
    if let Some(suit) = current {
        out.push(suit.letter());
    }
    out
}

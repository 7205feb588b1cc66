//! Riichi mahjong hand engine: tile model, hand state, winning-hand
//! decomposition, shanten, yaku classification and fu/han scoring.

pub mod agari;
pub mod errors;
pub mod family;
pub mod hand;
pub mod parser;
pub mod rule;
pub mod score;
pub mod shanten;
pub mod tile;
pub mod types;
pub mod yaku;

pub use errors::{CallKind, HandError, HandResult};
pub use hand::Hand;
pub use rule::ScoringRule;
pub use score::Score;
pub use tile::{Tile, TileType};
pub use types::{Conditions, Meld, MeldType, WinResult, Wind};
pub use yaku::Yaku;

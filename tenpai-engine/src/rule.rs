use serde::{Deserialize, Serialize};

/// Ruleset-dependent scoring constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoringRule {
    pub is_kokushi_musou_13machi_double: bool,
    pub is_suuankou_tanki_double: bool,
    pub is_junsei_chuurenpoutou_double: bool,
    pub is_daisuushii_double: bool,

    /// Whether all-simples counts on an open hand (kuitan).
    pub open_tanyao: bool,

    /// Round 4 han 30 fu and 3 han 60 fu up to mangan.
    pub kiriage_mangan: bool,

    /// Whether plain four concealed triplets also scores on ron.
    /// The single-wait form always scores on ron.
    pub suuankou_on_ron: bool,

    /// Fixed fu for seven pairs.
    pub chiitoitsu_fu: u8,
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self::default_tenhou()
    }
}

impl ScoringRule {
    pub fn default_tenhou() -> Self {
        Self {
            is_kokushi_musou_13machi_double: false,
            is_suuankou_tanki_double: false,
            is_junsei_chuurenpoutou_double: false,
            is_daisuushii_double: false,

            open_tanyao: true,
            kiriage_mangan: false,
            suuankou_on_ron: false,
            chiitoitsu_fu: 25,
        }
    }

    pub fn default_mjsoul() -> Self {
        Self {
            is_kokushi_musou_13machi_double: true,
            is_suuankou_tanki_double: true,
            is_junsei_chuurenpoutou_double: true,
            is_daisuushii_double: true,

            open_tanyao: true,
            kiriage_mangan: false,
            suuankou_on_ron: false,
            chiitoitsu_fu: 25,
        }
    }
}

use serde::Serialize;

pub const LEAGUE_LOYALIST: &str = "League Loyalist";
const LEAGUE_LOYALIST_NUMBER: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rarity {
    #[serde(rename = "C")]
    Common,
    #[serde(rename = "U")]
    Uncommon,
    #[serde(rename = "R")]
    Rare,
    #[serde(rename = "M")]
    Mythic,
    #[serde(rename = "S")]
    Spg,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub name: &'static str,
    pub rarity: Rarity,
    pub collector_number: u32,
}

/// Achievements earned from the number of leagues a player has entered.
pub fn achievements_for(league_count: usize) -> Vec<Achievement> {
    let rarity = match league_count {
        30.. => Rarity::Spg,
        20.. => Rarity::Mythic,
        10.. => Rarity::Rare,
        5.. => Rarity::Uncommon,
        3.. => Rarity::Common,
        _ => return Vec::new(),
    };

    vec![Achievement {
        name: LEAGUE_LOYALIST,
        rarity,
        collector_number: LEAGUE_LOYALIST_NUMBER,
    }]
}

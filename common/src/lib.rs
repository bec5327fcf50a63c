#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParseStatus {
    pub is_parsing: bool,
    pub progress: f32,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BaseDemoInfo {
    pub id: i64,
    pub map: String,
    pub demo_source: Option<String>,
    pub parsed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoundListEntry {
    pub match_number: i32,
    pub display_round_number: i32,
    pub start_tick: i64,
    pub end_tick: Option<i64>,
    pub winner_team: Option<String>,
    pub end_reason: String,
    pub bomb_planted: bool,
    pub bomb_defused: bool,
    pub bomb_exploded: bool,
}

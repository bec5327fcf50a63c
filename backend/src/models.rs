use diesel::prelude::*;

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::demo_files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DemoFile {
    pub id: i64,
    pub file_name: String,
    pub map: String,
    pub demo_source: Option<String>,
    pub tick_rate: i32,
    pub total_ticks: i64,
    pub duration_secs: f32,
    pub created_at: chrono::NaiveDateTime,
    pub parsed_at: Option<chrono::NaiveDateTime>,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DemoMatch {
    pub demo_id: i64,
    pub match_number: i32,
    pub map: String,
    pub game_mode: Option<String>,
    pub ct_score: i32,
    pub t_score: i32,
    pub overtime: bool,
    pub finished: bool,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::rounds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DemoRound {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub start_tick: i64,
    pub end_tick: Option<i64>,
    pub winner_team: Option<String>,
    pub end_reason: String,
    pub ct_live_players: i16,
    pub t_live_players: i16,
    pub bomb_planted: bool,
    pub bomb_defused: bool,
    pub bomb_exploded: bool,
    pub bomb_site: Option<i32>,
    pub is_warmup: bool,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::players)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DemoPlayer {
    pub demo_id: i64,
    pub slot: i16,
    pub platform_id: i64,
    pub name: String,
    pub team: Option<String>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::kills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewKill {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub tick: i64,
    pub attacker_slot: Option<i16>,
    pub victim_slot: i16,
    pub assister_slot: Option<i16>,
    pub weapon: String,
    pub headshot: bool,
    pub penetrated: i16,
    pub noscope: bool,
    pub through_smoke: bool,
    pub attacker_blind: bool,
    pub team_kill: bool,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::damages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDamage {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub tick: i64,
    pub attacker_slot: Option<i16>,
    pub victim_slot: i16,
    pub health_removed: i16,
    pub armor_removed: i16,
    pub hitgroup: i16,
    pub weapon: String,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::weapon_fires)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewWeaponFire {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub tick: i64,
    pub player_slot: i16,
    pub weapon: String,
    pub silenced: bool,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::bomb_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewBombEvent {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub tick: i64,
    pub player_slot: Option<i16>,
    pub kind: String,
    pub site: Option<i32>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChatMessage {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub tick: i64,
    pub player_slot: i16,
    pub message: String,
    pub team_only: bool,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::radio_commands)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRadioCommand {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub tick: i64,
    pub player_slot: i16,
    pub command: String,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::voice_communications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewVoiceCommunication {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub tick: i64,
    pub player_slot: i16,
    pub duration_ms: i32,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::economy_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewEconomyEvent {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub tick: i64,
    pub player_slot: i16,
    pub kind: String,
    pub item: Option<String>,
    pub amount: i32,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::player_positions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPlayerPosition {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub tick: i64,
    pub player_slot: i16,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub health: i16,
    pub armor: i16,
    pub money: i32,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::grenades)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Grenade {
    pub demo_id: i64,
    pub entity_id: i32,
    pub match_number: i32,
    pub round_number: i32,
    pub owner_slot: Option<i16>,
    pub grenade_type: String,
    pub throw_tick: i64,
    pub detonate_tick: Option<i64>,
    pub close_reason: String,
    pub throw_x: Option<f32>,
    pub throw_y: Option<f32>,
    pub throw_z: Option<f32>,
    pub detonate_x: Option<f32>,
    pub detonate_y: Option<f32>,
    pub detonate_z: Option<f32>,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::grenade_trajectories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GrenadeTrajectory {
    pub demo_id: i64,
    pub entity_id: i32,
    pub tick: i64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::smoke_clouds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SmokeCloud {
    pub demo_id: i64,
    pub entity_id: i32,
    pub match_number: i32,
    pub round_number: i32,
    pub owner_slot: Option<i16>,
    pub start_tick: i64,
    pub end_tick: Option<i64>,
    pub close_reason: String,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::fire_areas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FireArea {
    pub demo_id: i64,
    pub entity_id: i32,
    pub match_number: i32,
    pub round_number: i32,
    pub owner_slot: Option<i16>,
    pub start_tick: i64,
    pub end_tick: Option<i64>,
    pub close_reason: String,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::flash_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewFlashEvent {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub flashed_slot: i16,
    pub flasher_slot: Option<i16>,
    pub start_tick: i64,
    pub end_tick: Option<i64>,
    pub close_reason: String,
    pub team_flash: bool,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::dropped_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DroppedItem {
    pub demo_id: i64,
    pub entity_id: i32,
    pub match_number: i32,
    pub round_number: i32,
    pub owner_slot: Option<i16>,
    pub item: String,
    pub drop_tick: i64,
    pub pickup_tick: Option<i64>,
    pub picked_up_by_slot: Option<i16>,
    pub close_reason: String,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::entity_lifecycles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewEntityLifecycle {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub entity_id: i32,
    pub tick: i64,
    pub entity_kind: String,
    pub event: String,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::player_round_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlayerRoundStats {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub player_slot: i16,
    pub kills: i16,
    pub deaths: i16,
    pub assists: i16,
    pub damage: i32,
    pub start_money: Option<i32>,
    pub end_money: Option<i32>,
    pub survived: bool,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::player_match_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlayerMatchStats {
    pub demo_id: i64,
    pub match_number: i32,
    pub player_slot: i16,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub damage: i32,
    pub headshots: i32,
    pub rounds_played: i32,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::advanced_player_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AdvancedPlayerStats {
    pub demo_id: i64,
    pub match_number: i32,
    pub player_slot: i16,
    pub kd_ratio: f32,
    pub adr: f32,
    pub headshot_percentage: f32,
    pub kills_per_round: f32,
    pub deaths_per_round: f32,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::round_impacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoundImpact {
    pub demo_id: i64,
    pub match_number: i32,
    pub round_number: i32,
    pub player_slot: i16,
    pub impact: f32,
    pub opening_kill: bool,
}

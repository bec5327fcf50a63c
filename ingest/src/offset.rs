/// Platforms that log pre-competitive rounds (warm-up, knife) before live
/// play, and how many such rounds they log. Read-time correction only; the
/// rounds themselves are always stored.
pub static ROUND_OFFSETS: phf::Map<&'static str, i32> = phf::phf_map! {
    "faceit" => 2,
    "esea" => 2,
};

pub fn source_offset(demo_source: Option<&str>) -> i32 {
    demo_source
        .and_then(|tag| ROUND_OFFSETS.get(tag))
        .copied()
        .unwrap_or(0)
}

/// Maps a stored (ingestion-order) round number to the user-visible one,
/// clamped to a minimum of 1.
pub fn display_round_number(stored: i32, demo_source: Option<&str>) -> i32 {
    (stored - source_offset(demo_source)).max(1)
}

/// Inverse of [`display_round_number`] for translating user-facing round
/// queries back to storage keys.
pub fn stored_round_number(display: i32, demo_source: Option<&str>) -> i32 {
    display + source_offset(demo_source)
}

/// Whether a stored round appears in user-facing listings. Rounds whose
/// corrected number would be zero or below stay in storage but are hidden.
pub fn is_listed(stored: i32, demo_source: Option<&str>) -> bool {
    stored - source_offset(demo_source) >= 1
}

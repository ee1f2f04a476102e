pub mod game_stats;
pub mod schedule_fetch;
pub mod team_games;
pub mod viz_export;

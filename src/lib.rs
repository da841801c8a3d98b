pub mod athlete_graph;
pub mod bracket_feed;
pub mod match_store;
pub mod regions;
pub mod report_export;
pub mod reports;
pub mod scouting;

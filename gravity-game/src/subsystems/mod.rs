pub mod collision_handling;
pub mod entity_spawning;
pub mod gravity;
pub mod player_controls_handling;
pub mod timer_handling;

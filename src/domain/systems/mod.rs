pub mod boss_fire;

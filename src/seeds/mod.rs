pub mod events_seed;

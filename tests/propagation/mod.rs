mod state_map;
mod sync;

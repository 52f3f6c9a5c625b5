mod hot_reload;
mod reentrancy;

pub mod classify;
pub mod duration;
pub mod pacer;
pub mod pipeline;
pub mod seed;

pub mod benchmarks;
pub mod run;
pub mod video;

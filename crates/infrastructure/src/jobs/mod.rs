mod cache_sweep_job;

pub use cache_sweep_job::CacheSweepJob;

pub mod purge;
pub mod scan;
pub mod shared;

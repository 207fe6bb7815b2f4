pub mod bezier;
pub mod path;
pub mod samples;

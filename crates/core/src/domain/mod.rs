pub mod headline;
pub mod insight;

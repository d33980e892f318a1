
pub use world::TestWorld;

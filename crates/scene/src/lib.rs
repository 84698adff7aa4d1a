pub mod camera;
pub mod components;
pub mod entity;
pub mod geometry;
pub mod globe;
pub mod prefabs;
pub mod projection;
pub mod world;

pub use globe::*;
pub use projection::*;
pub use world::*;

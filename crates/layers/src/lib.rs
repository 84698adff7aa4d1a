pub mod beam;
pub mod markers;
pub mod symbology;

pub use beam::*;
pub use markers::*;
pub use symbology::*;

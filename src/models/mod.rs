pub mod assessment;
pub mod crop;
pub mod environment;
pub mod recommendation;
pub mod report;

pub use assessment::*;
pub use crop::*;
pub use environment::*;
pub use recommendation::*;
pub use report::*;

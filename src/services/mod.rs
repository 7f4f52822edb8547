pub mod browse;
pub mod clock;
pub mod providers;
pub mod quiz;
pub mod random;
pub mod recommendations;

pub use clock::{Clock, FixedClock, SystemClock};
pub use providers::CatalogProvider;
pub use random::{RandomSource, SeededRandom, ThreadRandom};

mod memory;
pub mod traits;

pub use memory::InMemoryPopsicleRepository;
pub use traits::PopsicleRepository;

//! In-memory adapters for the driven ports.
//!
//! These back the integration tests and any embedding that does not bring
//! its own store. They honour the port contracts a production adapter must
//! provide: the pending-request dedup index, the (swap, reviewer) unique
//! index, and compare-and-set updates on the swap revision.

mod feedback_store;
mod swap_store;
mod user_directory;

pub use feedback_store::InMemoryFeedbackRepository;
pub use swap_store::InMemorySwapRepository;
pub use user_directory::InMemoryUserDirectory;

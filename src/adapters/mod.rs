//! Session adapters that are not real hardware.

mod mock_session;

pub use mock_session::MockSession;

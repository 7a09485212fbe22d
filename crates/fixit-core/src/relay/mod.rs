//! Realtime chat relay between a listing owner and the accepted repairman.

pub mod dispatcher;
pub mod policy;
pub mod registry;

pub use dispatcher::{ChannelSession, ChannelState, ChatDispatcher, DispatchOutcome};
pub use policy::{AcceptedBidPolicy, RelayPolicy};
pub use registry::{ChannelHandle, ConnectionRegistry, RelayOutcome};

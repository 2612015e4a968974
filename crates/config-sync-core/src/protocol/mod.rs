//! Protocol module containing the pull/notify message types and the
//! pull-response decoder.

pub mod codec;
pub mod messages;

pub use codec::{decode_pull_response, ProtocolError};
pub use messages::{ConfigUpdate, NotifyRequest, PullReply, PullRequest, UPDATE_AVAILABLE};

//! HTTP adapters for the external collaborators: the case-law database,
//! the regulation text service, and the completion capability.

pub mod caselaw;
pub mod completion;
pub mod regulation;

pub use caselaw::CourtListenerClient;
pub use completion::MessagesApiGateway;
pub use regulation::EcfrClient;

//! CDMA/IMS phone wiring and the disconnect-cause classifier.

pub mod collaborators;
pub mod dial;
pub mod disconnect;
mod phone;
mod types;

pub use collaborators::{
    CallTracker, CdmaComponentFactory, CommandsInterface, ImsPhone, PhoneComponent, PhoneRegistry,
    ServiceStateTracker, SubscriptionSourceManager, UiccApplication,
};
pub use disconnect::{NORMAL_CLEARING, classify};
pub use phone::*;
pub use types::{
    AppState, CallDetails, CallDomain, CallState, Connection, DisconnectCause, EriSource,
    PhoneEvent, PhoneType, RadioEvent, ServiceState, SubscriptionSource,
};

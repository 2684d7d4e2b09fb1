//! Radio and call vocabulary shared by the phone and its collaborators.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Radio technology family the commands interface is switched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneType {
    None = 0,
    Gsm = 1,
    Cdma = 2,
}

impl PhoneType {
    /// Numeric id as stored in the current-active-phone property.
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    #[default]
    Idle,
    Ringing,
    Offhook,
}

/// Registration state reported by the service-state tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    InService,
    OutOfService,
    EmergencyOnly,
    PowerOff,
}

impl ServiceState {
    pub const ALL: [ServiceState; 4] = [
        ServiceState::InService,
        ServiceState::OutOfService,
        ServiceState::EmergencyOnly,
        ServiceState::PowerOff,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ServiceState::InService => "in-service",
            ServiceState::OutOfService => "out-of-service",
            ServiceState::EmergencyOnly => "emergency-only",
            ServiceState::PowerOff => "power-off",
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServiceState {
    type Err = String;

    /// Accepts the dashed names, with `_` as an alternative separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        ServiceState::ALL
            .into_iter()
            .find(|st| st.name() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown service state: \"{s}\". Expected one of: \
                     in-service, out-of-service, emergency-only, power-off"
                )
            })
    }
}

/// Where CDMA subscription data comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionSource {
    Ruim,
    #[default]
    Nv,
}

/// UICC application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    Unknown,
    Detected,
    Pin,
    Puk,
    SubscriptionPerso,
    Ready,
}

impl FromStr for AppState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "unknown" => Ok(AppState::Unknown),
            "detected" => Ok(AppState::Detected),
            "pin" => Ok(AppState::Pin),
            "puk" => Ok(AppState::Puk),
            "subscription_perso" | "perso" => Ok(AppState::SubscriptionPerso),
            "ready" => Ok(AppState::Ready),
            _ => Err(format!(
                "Unknown UICC app state: \"{s}\". Expected one of: \
                 unknown, detected, pin, puk, perso, ready"
            )),
        }
    }
}

/// Why a call ended, as seen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisconnectCause {
    PowerOff,
    OutOfService,
    IccError,
    Normal,
    ErrorUnspecified,
}

impl fmt::Display for DisconnectCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DisconnectCause::PowerOff => "POWER_OFF",
            DisconnectCause::OutOfService => "OUT_OF_SERVICE",
            DisconnectCause::IccError => "ICC_ERROR",
            DisconnectCause::Normal => "NORMAL",
            DisconnectCause::ErrorUnspecified => "ERROR_UNSPECIFIED",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallDomain {
    Unknown,
    /// Circuit switched.
    Cs,
    /// Packet switched (IMS).
    Ps,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDetails {
    pub call_domain: CallDomain,
}

/// Handle to a dialed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub address: String,
    pub details: CallDetails,
}

/// Unsolicited radio notifications the phone subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RadioEvent {
    RadioAvailable,
    RadioOffOrNotAvailable,
    RadioOn,
    SuppServiceNotification,
    EmergencyCallbackModeEnter,
    ExitEmergencyCallbackModeResponse,
    ImsNetworkStateChanged,
}

/// Messages delivered through the phone's own queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneEvent {
    /// Posted by init when IMS calling is on; creates the IMS sub-phone.
    InitComplete,
    RegisteredToNetwork,
    SubscriptionSourceChanged,
    Radio(RadioEvent),
}

/// Source the ERI (enhanced roaming indicator) table is loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EriSource {
    File,
    Xml,
}

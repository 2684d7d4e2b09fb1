//! Disconnect-cause classification.
//!
//! Radio conditions take precedence over the network's cause code: a call
//! that drops while the radio is off is reported as `PowerOff` whatever code
//! the network sent.

use super::types::{AppState, DisconnectCause, ServiceState, SubscriptionSource};

/// Call-fail cause for a normal hang-up.
pub const NORMAL_CLEARING: i32 = 16;

/// Map a call-fail `cause_code` to a [`DisconnectCause`]. First match wins.
///
/// `uicc_app` is `None` when no UICC application is present.
pub fn classify(
    service_state: ServiceState,
    subscription_source: SubscriptionSource,
    uicc_app: Option<AppState>,
    cause_code: i32,
) -> DisconnectCause {
    match service_state {
        ServiceState::PowerOff => return DisconnectCause::PowerOff,
        ServiceState::OutOfService | ServiceState::EmergencyOnly => {
            return DisconnectCause::OutOfService;
        }
        ServiceState::InService => {}
    }
    if subscription_source == SubscriptionSource::Ruim && uicc_app != Some(AppState::Ready) {
        return DisconnectCause::IccError;
    }
    if cause_code == NORMAL_CLEARING {
        DisconnectCause::Normal
    } else {
        DisconnectCause::ErrorUnspecified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READY: Option<AppState> = Some(AppState::Ready);

    #[test]
    fn power_off_wins_over_everything() {
        assert_eq!(
            classify(ServiceState::PowerOff, SubscriptionSource::Ruim, None, NORMAL_CLEARING),
            DisconnectCause::PowerOff
        );
    }

    #[test]
    fn no_service_is_out_of_service_for_any_code() {
        for st in [ServiceState::OutOfService, ServiceState::EmergencyOnly] {
            for code in [0, NORMAL_CLEARING, 31, -1] {
                assert_eq!(
                    classify(st, SubscriptionSource::Nv, READY, code),
                    DisconnectCause::OutOfService
                );
                // Wins over a RUIM subscription with no UICC application.
                assert_eq!(
                    classify(st, SubscriptionSource::Ruim, None, code),
                    DisconnectCause::OutOfService
                );
            }
        }
    }

    #[test]
    fn ruim_without_app_is_icc_error() {
        assert_eq!(
            classify(ServiceState::InService, SubscriptionSource::Ruim, None, NORMAL_CLEARING),
            DisconnectCause::IccError
        );
    }

    #[test]
    fn ruim_app_not_ready_is_icc_error() {
        assert_eq!(
            classify(
                ServiceState::InService,
                SubscriptionSource::Ruim,
                Some(AppState::Pin),
                NORMAL_CLEARING
            ),
            DisconnectCause::IccError
        );
    }

    #[test]
    fn nv_ignores_uicc_state() {
        assert_eq!(
            classify(ServiceState::InService, SubscriptionSource::Nv, None, NORMAL_CLEARING),
            DisconnectCause::Normal
        );
    }

    #[test]
    fn ruim_ready_uses_cause_code() {
        assert_eq!(
            classify(ServiceState::InService, SubscriptionSource::Ruim, READY, NORMAL_CLEARING),
            DisconnectCause::Normal
        );
        assert_eq!(
            classify(ServiceState::InService, SubscriptionSource::Ruim, READY, 17),
            DisconnectCause::ErrorUnspecified
        );
    }

    #[test]
    fn other_codes_are_unspecified() {
        for code in [0, 1, 31, -1] {
            assert_eq!(
                classify(ServiceState::InService, SubscriptionSource::Nv, READY, code),
                DisconnectCause::ErrorUnspecified
            );
        }
    }
}

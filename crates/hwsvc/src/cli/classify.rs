//! `classify` subcommand: map a call-fail cause code to a disconnect cause.

use hwsvc_lib::telephony::{SubscriptionSource, classify};

use super::{AppState, ClassifyOutput, Result, ServiceState, kv, kv_width, print_json};

pub(super) fn cmd_classify(
    service_state: ServiceState,
    ruim: bool,
    icc: Option<AppState>,
    cause_code: i32,
    json: bool,
) -> Result<()> {
    let source = if ruim {
        SubscriptionSource::Ruim
    } else {
        SubscriptionSource::Nv
    };
    let output = ClassifyOutput {
        service_state,
        ruim,
        icc,
        cause_code,
        disconnect_cause: classify(service_state, source, icc, cause_code),
    };

    if json {
        return print_json(&output);
    }
    let w = kv_width(
        &["Service state:", "Subscription:", "Cause code:", "Disconnect cause:"],
        &[],
    );
    kv("Service state:", service_state, w);
    kv("Subscription:", if ruim { "RUIM" } else { "NV" }, w);
    kv("Cause code:", cause_code, w);
    kv("Disconnect cause:", output.disconnect_cause, w);
    Ok(())
}

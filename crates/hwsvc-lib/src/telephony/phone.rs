//! CDMA phone with an IMS sub-phone.
//!
//! [`CdmaImsPhone`] is the base phone (commands interface, service-state
//! tracker, UICC, properties, event queue) composed with a [`CdmaStrategy`]
//! holding the CDMA collaborators that `init` builds.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use super::collaborators::{
    CallTracker, CdmaComponentFactory, CommandsInterface, ImsPhone, PhoneComponent, PhoneRegistry,
    ServiceStateTracker, SubscriptionSourceManager, UiccApplication,
};
use super::dial;
use super::disconnect;
use super::types::{
    CallDetails, CallDomain, CallState, Connection, DisconnectCause, EriSource, PhoneEvent,
    PhoneType, RadioEvent,
};
use crate::error::{HwsvcError, Result};
use crate::properties::Properties;

pub const PHONE_NAME: &str = "CDMALTEIms";
pub const MAX_CONNECTIONS: usize = 8;
pub const MAX_CONNECTIONS_PER_CALL: usize = 1;

/// Property tracking which radio family is active.
pub const PROPERTY_CURRENT_ACTIVE_PHONE: &str = "persist.radio.current_phone";
/// `"true"` when the radio was in emergency-callback mode before a restart.
pub const PROPERTY_INECM_MODE: &str = "ril.cdma.inecmmode";
pub const PROPERTY_OTASP_NUM_SCHEMA: &str = "ro.cdma.otaspnumschema";
pub const PROPERTY_CDMA_HOME_OPERATOR_ALPHA: &str = "ro.cdma.home.operator.alpha";
pub const PROPERTY_CDMA_HOME_OPERATOR_NUMERIC: &str = "ro.cdma.home.operator.numeric";
pub const PROPERTY_ICC_OPERATOR_ALPHA: &str = "gsm.sim.operator.alpha";
pub const PROPERTY_ICC_OPERATOR_NUMERIC: &str = "gsm.sim.operator.numeric";
pub const PROPERTY_CALLS_ON_IMS: &str = "persist.radio.calls.on.ims";

/// Radio notifications registered during init, in registration order.
pub const INIT_RADIO_EVENTS: [RadioEvent; 6] = [
    RadioEvent::RadioAvailable,
    RadioEvent::RadioOffOrNotAvailable,
    RadioEvent::RadioOn,
    RadioEvent::SuppServiceNotification,
    RadioEvent::EmergencyCallbackModeEnter,
    RadioEvent::ExitEmergencyCallbackModeResponse,
];

/// Everything the phone is built from.
pub struct PhoneWiring {
    pub commands: Arc<dyn CommandsInterface>,
    pub service_state: Arc<dyn ServiceStateTracker>,
    pub uicc: Option<Arc<dyn UiccApplication>>,
    pub factory: Arc<dyn CdmaComponentFactory>,
    pub registry: Arc<dyn PhoneRegistry>,
    pub properties: Arc<Properties>,
}

/// CDMA collaborators, built once by init.
pub struct CdmaStrategy {
    call_tracker: Option<Arc<dyn CallTracker>>,
    subscription: Arc<dyn SubscriptionSourceManager>,
    components: Vec<Box<dyn PhoneComponent>>,
    in_ecm: bool,
    otasp_num_schema: String,
}

impl CdmaStrategy {
    /// Names of the owned components, in build order.
    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name()).collect()
    }
}

pub struct CdmaImsPhone {
    commands: Arc<dyn CommandsInterface>,
    service_state: Arc<dyn ServiceStateTracker>,
    uicc: Option<Arc<dyn UiccApplication>>,
    factory: Arc<dyn CdmaComponentFactory>,
    registry: Arc<dyn PhoneRegistry>,
    properties: Arc<Properties>,
    strategy: CdmaStrategy,
    ims_phone: Option<Arc<dyn ImsPhone>>,
    events_tx: Sender<PhoneEvent>,
    events_rx: Receiver<PhoneEvent>,
}

impl CdmaImsPhone {
    /// Build and initialize the phone.
    ///
    /// Init switches the radio to CDMA, builds the collaborators, registers
    /// for radio notifications, then restores persisted radio state. When IMS
    /// calling is enabled an `InitComplete` event is queued; the IMS
    /// sub-phone is created once [`process_events`](Self::process_events)
    /// runs, after the caller has registered this phone.
    pub fn new(wiring: PhoneWiring) -> Self {
        log::debug!("[phone] init");
        let PhoneWiring {
            commands,
            service_state,
            uicc,
            factory,
            registry,
            properties,
        } = wiring;
        let (events_tx, events_rx) = mpsc::channel();

        let strategy = Self::init(&*commands, &*service_state, &*factory, &properties);
        if properties.get_or(PROPERTY_CALLS_ON_IMS, "false") == "true" {
            // Receiver is owned by the phone, so the send cannot fail.
            let _ = events_tx.send(PhoneEvent::InitComplete);
        }

        CdmaImsPhone {
            commands,
            service_state,
            uicc,
            factory,
            registry,
            properties,
            strategy,
            ims_phone: None,
            events_tx,
            events_rx,
        }
    }

    fn init(
        commands: &dyn CommandsInterface,
        service_state: &dyn ServiceStateTracker,
        factory: &dyn CdmaComponentFactory,
        properties: &Properties,
    ) -> CdmaStrategy {
        commands.set_phone_type(PhoneType::Cdma);

        let call_tracker = factory.call_tracker();
        let subscription = factory.subscription_source_manager();
        let components = vec![
            factory.data_connection_tracker(),
            factory.phone_book_manager(),
            factory.sub_info(),
            factory.eri_manager(EriSource::Xml),
        ];

        for event in INIT_RADIO_EVENTS {
            commands.register(event);
        }
        service_state.register_for_network_attached();

        properties.set(
            PROPERTY_CURRENT_ACTIVE_PHONE,
            &PhoneType::Cdma.code().to_string(),
        );

        // Recover from a phone-process restart while in ECM.
        let in_ecm = properties.get_or(PROPERTY_INECM_MODE, "false") == "true";
        if in_ecm {
            log::debug!("[phone] restoring emergency callback mode");
            commands.exit_emergency_callback_mode();
        }

        let otasp_num_schema = properties.get_or(PROPERTY_OTASP_NUM_SCHEMA, "");

        let alpha = properties.get_or(PROPERTY_CDMA_HOME_OPERATOR_ALPHA, "");
        properties.set(PROPERTY_ICC_OPERATOR_ALPHA, &alpha);
        let numeric = properties.get_or(PROPERTY_CDMA_HOME_OPERATOR_NUMERIC, "");
        properties.set(PROPERTY_ICC_OPERATOR_NUMERIC, &numeric);

        CdmaStrategy {
            call_tracker,
            subscription,
            components,
            in_ecm,
            otasp_num_schema,
        }
    }

    /// Sender for this phone's event queue.
    pub fn events(&self) -> Sender<PhoneEvent> {
        self.events_tx.clone()
    }

    /// Handle every queued event, in order. Returns how many were handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            log::debug!("[phone] event {event:?}");
            match event {
                PhoneEvent::InitComplete => self.create_ims_phone(),
                other => log::debug!("[phone] {other:?} left to base handling"),
            }
            handled += 1;
        }
        handled
    }

    fn create_ims_phone(&mut self) {
        if self.ims_phone.is_some() {
            log::error!("[phone] IMS phone already present");
            return;
        }
        let Some(call_tracker) = self.strategy.call_tracker.clone() else {
            log::error!("[phone] no call tracker, unable to create IMS phone");
            return;
        };
        log::debug!("[phone] creating IMS phone");
        let ims = self.factory.ims_phone(call_tracker, self.commands.clone());
        self.registry.register_phone(ims.clone());
        self.ims_phone = Some(ims);
    }

    fn destroy_ims_phone(&mut self) {
        if let Some(ims) = self.ims_phone.take() {
            self.registry.unregister_phone(&ims);
            ims.dispose();
        }
    }

    pub fn dispose(&mut self) {
        self.commands.unregister(RadioEvent::ImsNetworkStateChanged);
        self.destroy_ims_phone();
    }

    pub fn ims_phone(&self) -> Option<&Arc<dyn ImsPhone>> {
        self.ims_phone.as_ref()
    }

    pub fn strategy(&self) -> &CdmaStrategy {
        &self.strategy
    }

    pub fn is_in_ecm(&self) -> bool {
        self.strategy.in_ecm
    }

    pub fn otasp_num_schema(&self) -> &str {
        &self.strategy.otasp_num_schema
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Call state, `Idle` without a call tracker.
    pub fn state(&self) -> CallState {
        self.strategy
            .call_tracker
            .as_ref()
            .map_or(CallState::Idle, |ct| ct.state())
    }

    pub fn set_state(&self, state: CallState) {
        if let Some(ct) = &self.strategy.call_tracker {
            ct.set_state(state);
        }
    }

    pub fn phone_name(&self) -> &'static str {
        PHONE_NAME
    }

    pub fn max_connections(&self) -> usize {
        MAX_CONNECTIONS
    }

    pub fn max_connections_per_call(&self) -> usize {
        MAX_CONNECTIONS_PER_CALL
    }

    /// Normalize `dial_string` for CDMA and dial it circuit-switched.
    pub fn dial(&self, dial_string: &str) -> Result<Connection> {
        let stripped = dial::strip_separators(dial_string);
        log::debug!("[phone] dial string={stripped}");
        let formatted = dial::format_dial_string(&stripped);
        log::debug!("[phone] formatted dial string={formatted}");

        let call_tracker = self
            .strategy
            .call_tracker
            .as_ref()
            .ok_or_else(|| HwsvcError::Telephony("No call tracker available".into()))?;
        call_tracker.dial(
            &formatted,
            CallDetails {
                call_domain: CallDomain::Cs,
            },
        )
    }

    /// Classify a call-fail cause against the current radio conditions.
    pub fn disconnect_cause_from_code(&self, cause_code: i32) -> DisconnectCause {
        disconnect::classify(
            self.service_state.service_state(),
            self.strategy.subscription.subscription_source(),
            self.uicc.as_ref().map(|app| app.app_state()),
            cause_code,
        )
    }
}

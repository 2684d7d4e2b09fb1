//! Boundaries to the radio stack. The phone only wires these together.

use std::sync::Arc;

use super::types::{
    AppState, CallDetails, CallState, Connection, EriSource, PhoneType, RadioEvent, ServiceState,
    SubscriptionSource,
};
use crate::error::Result;

/// Radio interface layer.
pub trait CommandsInterface: Send + Sync {
    fn set_phone_type(&self, phone_type: PhoneType);
    fn register(&self, event: RadioEvent);
    fn unregister(&self, event: RadioEvent);
    fn exit_emergency_callback_mode(&self);
}

pub trait ServiceStateTracker: Send + Sync {
    fn service_state(&self) -> ServiceState;
    fn register_for_network_attached(&self);
}

pub trait CallTracker: Send + Sync {
    fn state(&self) -> CallState;
    fn set_state(&self, state: CallState);
    fn dial(&self, dial_string: &str, details: CallDetails) -> Result<Connection>;
}

pub trait UiccApplication: Send + Sync {
    fn app_state(&self) -> AppState;
}

pub trait SubscriptionSourceManager: Send + Sync {
    fn subscription_source(&self) -> SubscriptionSource;
}

/// IMS sub-phone sharing the CDMA phone's call tracker.
pub trait ImsPhone: Send + Sync {
    fn name(&self) -> &str;
    fn dispose(&self);
}

/// Process-wide list of phones calls can be routed through.
pub trait PhoneRegistry: Send + Sync {
    fn register_phone(&self, phone: Arc<dyn ImsPhone>);
    fn unregister_phone(&self, phone: &Arc<dyn ImsPhone>);
}

/// Collaborator the phone owns but does not call into.
pub trait PhoneComponent: Send + Sync {
    fn name(&self) -> &str;
}

/// Builds the CDMA strategy's collaborators.
pub trait CdmaComponentFactory: Send + Sync {
    /// `None` when no call tracker can be built; IMS is then unavailable.
    fn call_tracker(&self) -> Option<Arc<dyn CallTracker>>;
    fn subscription_source_manager(&self) -> Arc<dyn SubscriptionSourceManager>;
    fn data_connection_tracker(&self) -> Box<dyn PhoneComponent>;
    fn phone_book_manager(&self) -> Box<dyn PhoneComponent>;
    fn sub_info(&self) -> Box<dyn PhoneComponent>;
    fn eri_manager(&self, source: EriSource) -> Box<dyn PhoneComponent>;
    fn ims_phone(
        &self,
        call_tracker: Arc<dyn CallTracker>,
        commands: Arc<dyn CommandsInterface>,
    ) -> Arc<dyn ImsPhone>;
}

/// Recording implementations of every boundary.
pub mod mock {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        m.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// One observable interaction, in the order it happened.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        SetPhoneType(PhoneType),
        Register(RadioEvent),
        Unregister(RadioEvent),
        ExitEmergencyCallbackMode,
        RegisterForNetworkAttached,
        Built(&'static str),
        RegisterPhone(String),
        UnregisterPhone(String),
        DisposeIms(String),
    }

    /// Shared, ordered call journal.
    #[derive(Debug, Default)]
    pub struct Journal {
        calls: Mutex<Vec<Call>>,
    }

    impl Journal {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn push(&self, call: Call) {
            lock(&self.calls).push(call);
        }

        pub fn calls(&self) -> Vec<Call> {
            lock(&self.calls).clone()
        }

        pub fn position(&self, call: &Call) -> Option<usize> {
            lock(&self.calls).iter().position(|c| c == call)
        }

        pub fn count(&self, call: &Call) -> usize {
            lock(&self.calls).iter().filter(|c| *c == call).count()
        }
    }

    pub struct MockCommands {
        pub journal: Arc<Journal>,
    }

    impl CommandsInterface for MockCommands {
        fn set_phone_type(&self, phone_type: PhoneType) {
            self.journal.push(Call::SetPhoneType(phone_type));
        }
        fn register(&self, event: RadioEvent) {
            self.journal.push(Call::Register(event));
        }
        fn unregister(&self, event: RadioEvent) {
            self.journal.push(Call::Unregister(event));
        }
        fn exit_emergency_callback_mode(&self) {
            self.journal.push(Call::ExitEmergencyCallbackMode);
        }
    }

    pub struct MockServiceState {
        pub journal: Arc<Journal>,
        pub state: Mutex<ServiceState>,
    }

    impl MockServiceState {
        pub fn set(&self, state: ServiceState) {
            *lock(&self.state) = state;
        }
    }

    impl ServiceStateTracker for MockServiceState {
        fn service_state(&self) -> ServiceState {
            *lock(&self.state)
        }
        fn register_for_network_attached(&self) {
            self.journal.push(Call::RegisterForNetworkAttached);
        }
    }

    #[derive(Default)]
    pub struct MockCallTracker {
        pub state: Mutex<CallState>,
        pub dialed: Mutex<Vec<(String, CallDetails)>>,
    }

    impl CallTracker for MockCallTracker {
        fn state(&self) -> CallState {
            *lock(&self.state)
        }
        fn set_state(&self, state: CallState) {
            *lock(&self.state) = state;
        }
        fn dial(&self, dial_string: &str, details: CallDetails) -> Result<Connection> {
            lock(&self.dialed).push((dial_string.to_string(), details.clone()));
            Ok(Connection {
                address: dial_string.to_string(),
                details,
            })
        }
    }

    pub struct MockUicc(pub Mutex<AppState>);

    impl UiccApplication for MockUicc {
        fn app_state(&self) -> AppState {
            *lock(&self.0)
        }
    }

    pub struct MockSubscription(pub Mutex<SubscriptionSource>);

    impl SubscriptionSourceManager for MockSubscription {
        fn subscription_source(&self) -> SubscriptionSource {
            *lock(&self.0)
        }
    }

    pub struct MockImsPhone {
        journal: Arc<Journal>,
    }

    impl ImsPhone for MockImsPhone {
        fn name(&self) -> &str {
            "RilIms"
        }
        fn dispose(&self) {
            self.journal.push(Call::DisposeIms(self.name().to_string()));
        }
    }

    pub struct MockRegistry {
        pub journal: Arc<Journal>,
        pub phones: Mutex<Vec<String>>,
    }

    impl PhoneRegistry for MockRegistry {
        fn register_phone(&self, phone: Arc<dyn ImsPhone>) {
            self.journal.push(Call::RegisterPhone(phone.name().to_string()));
            lock(&self.phones).push(phone.name().to_string());
        }
        fn unregister_phone(&self, phone: &Arc<dyn ImsPhone>) {
            self.journal.push(Call::UnregisterPhone(phone.name().to_string()));
            lock(&self.phones).retain(|p| p != phone.name());
        }
    }

    struct Component(&'static str);

    impl PhoneComponent for Component {
        fn name(&self) -> &str {
            self.0
        }
    }

    pub struct MockFactory {
        pub journal: Arc<Journal>,
        /// `None` simulates a platform without a call tracker.
        pub call_tracker: Option<Arc<MockCallTracker>>,
        pub subscription: Arc<MockSubscription>,
        pub ims_built: AtomicUsize,
    }

    impl MockFactory {
        fn built(&self, name: &'static str) -> Box<dyn PhoneComponent> {
            self.journal.push(Call::Built(name));
            Box::new(Component(name))
        }
    }

    impl CdmaComponentFactory for MockFactory {
        fn call_tracker(&self) -> Option<Arc<dyn CallTracker>> {
            self.journal.push(Call::Built("call_tracker"));
            self.call_tracker
                .clone()
                .map(|ct| ct as Arc<dyn CallTracker>)
        }
        fn subscription_source_manager(&self) -> Arc<dyn SubscriptionSourceManager> {
            self.journal.push(Call::Built("subscription_source_manager"));
            self.subscription.clone()
        }
        fn data_connection_tracker(&self) -> Box<dyn PhoneComponent> {
            self.built("data_connection_tracker")
        }
        fn phone_book_manager(&self) -> Box<dyn PhoneComponent> {
            self.built("phone_book_manager")
        }
        fn sub_info(&self) -> Box<dyn PhoneComponent> {
            self.built("sub_info")
        }
        fn eri_manager(&self, source: EriSource) -> Box<dyn PhoneComponent> {
            self.built(match source {
                EriSource::Xml => "eri_manager_xml",
                EriSource::File => "eri_manager_file",
            })
        }
        fn ims_phone(
            &self,
            _call_tracker: Arc<dyn CallTracker>,
            _commands: Arc<dyn CommandsInterface>,
        ) -> Arc<dyn ImsPhone> {
            self.ims_built.fetch_add(1, Ordering::SeqCst);
            Arc::new(MockImsPhone {
                journal: self.journal.clone(),
            })
        }
    }

    /// Every mock, wired to one journal.
    pub struct MockRadio {
        pub journal: Arc<Journal>,
        pub commands: Arc<MockCommands>,
        pub service_state: Arc<MockServiceState>,
        pub call_tracker: Arc<MockCallTracker>,
        pub uicc: Arc<MockUicc>,
        pub subscription: Arc<MockSubscription>,
        pub registry: Arc<MockRegistry>,
    }

    impl MockRadio {
        pub fn new() -> Self {
            let journal = Journal::new();
            MockRadio {
                commands: Arc::new(MockCommands {
                    journal: journal.clone(),
                }),
                service_state: Arc::new(MockServiceState {
                    journal: journal.clone(),
                    state: Mutex::new(ServiceState::InService),
                }),
                call_tracker: Arc::new(MockCallTracker::default()),
                uicc: Arc::new(MockUicc(Mutex::new(AppState::Ready))),
                subscription: Arc::new(MockSubscription(Mutex::new(SubscriptionSource::Nv))),
                registry: Arc::new(MockRegistry {
                    journal: journal.clone(),
                    phones: Mutex::new(Vec::new()),
                }),
                journal,
            }
        }

        pub fn factory(&self, with_call_tracker: bool) -> MockFactory {
            MockFactory {
                journal: self.journal.clone(),
                call_tracker: with_call_tracker.then(|| self.call_tracker.clone()),
                subscription: self.subscription.clone(),
                ims_built: AtomicUsize::new(0),
            }
        }
    }

    impl Default for MockRadio {
        fn default() -> Self {
            Self::new()
        }
    }
}

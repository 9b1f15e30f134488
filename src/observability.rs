use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("chatrelay.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("chatrelay.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("chatrelay.client.request_duration_seconds");

pub(crate) static CHAT_SUBMISSIONS: Counter = Counter::new("chatrelay.chat.submissions");
pub(crate) static CHAT_SESSIONS_CREATED: Counter = Counter::new("chatrelay.chat.sessions_created");
pub(crate) static CHAT_SUBMIT_ERRORS: Counter = Counter::new("chatrelay.chat.submit_errors");
pub(crate) static CHAT_RESETS: Counter = Counter::new("chatrelay.chat.resets");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&CHAT_SUBMISSIONS);
    collector.register_counter(&CHAT_SESSIONS_CREATED);
    collector.register_counter(&CHAT_SUBMIT_ERRORS);
    collector.register_counter(&CHAT_RESETS);
}

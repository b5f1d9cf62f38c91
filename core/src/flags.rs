use std::time::Duration;

use env_flags::env_flags;

env_flags! {
    /// How long to wait for the backend to accept a connection.
    pub CHAT_CONNECT_TIMEOUT_MS: Duration = Duration::from_millis(5_000), |value| {
        value.parse().map(Duration::from_millis)
    };

    /// How long a live stream may stay silent before the read is abandoned.
    pub CHAT_STREAM_IDLE_TIMEOUT_MS: Duration = Duration::from_millis(300_000), |value| {
        value.parse().map(Duration::from_millis)
    };
}

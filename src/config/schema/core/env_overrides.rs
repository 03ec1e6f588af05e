use super::Config;

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Environment values win over the file; empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(name) = non_empty("SERVICE_NAME") {
            self.service_name = name;
        }

        if let Some(level) = non_empty("LOG_LEVEL") {
            self.log_level = level;
        }

        if let Some(region) = non_empty("REGION") {
            self.region = Some(region);
        }

        if let Some(port_str) = non_empty("APP_PORT")
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.server.port = port;
        }

        if let Some(addrs) = non_empty("QUEUE_PROXY_ADDRS") {
            self.consumer.addresses = addrs
                .split(',')
                .map(str::trim)
                .filter(|addr| !addr.is_empty())
                .map(ToOwned::to_owned)
                .collect();
        }

        if let Some(group) = non_empty("GROUP_ID") {
            self.consumer.group_id = group;
        }

        if let Some(topic) = non_empty("TOPIC") {
            self.consumer.topic = topic;
        }

        if let Some(offset) = non_empty("CONSUMER_OFFSET") {
            self.consumer.offset = offset;
        }

        if let Some(flag) = non_empty("CONSUMER_AUTOCOMMIT_ENABLE")
            && let Ok(enabled) = flag.parse::<bool>()
        {
            self.consumer.auto_commit = enabled;
        }

        if let Some(key) = non_empty("AUTHORIZATION_KEY") {
            self.consumer.authorization_key = Some(key);
        }

        if let Some(address) = non_empty("PRODUCER_ADDRESS") {
            self.sink.address = address;
        }

        if let Some(auth) = non_empty("PRODUCER_AUTHORIZATION") {
            self.sink.authorization = Some(auth);
        }

        if let Some(host) = non_empty("PRODUCER_HOST_HEADER") {
            self.sink.queue = Some(host);
        }

        if let Some(topic) = non_empty("PRODUCER_TOPIC") {
            self.sink.topic = Some(topic);
        }

        if let Some(kind) = non_empty("PRODUCER_TYPE") {
            self.sink.kind = kind;
        }
    }
}

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub gateway_base_url: String,
    pub gateway_public_key: String,
    pub gateway_secret_key: String,
    pub app_base_url: String,
    pub attribution_api_url: String,
    pub attribution_api_token: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "9999".to_string())
                .parse()
                .unwrap_or(9999),
            gateway_base_url: env::var("GATEWAY_BASE_URL")
                .unwrap_or_else(|_| "http://payment-gateway:8080".to_string()),
            gateway_public_key: env::var("GATEWAY_PUBLIC_KEY")
                .unwrap_or_else(|_| "".to_string()),
            gateway_secret_key: env::var("GATEWAY_SECRET_KEY")
                .unwrap_or_else(|_| "".to_string()),
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9999".to_string()),
            attribution_api_url: env::var("ATTRIBUTION_API_URL")
                .unwrap_or_else(|_| "http://attribution-api:8080/orders".to_string()),
            attribution_api_token: env::var("ATTRIBUTION_API_TOKEN")
                .unwrap_or_else(|_| "".to_string()),
        }
    }

    /// Postback URL the gateway calls back on payment lifecycle events.
    pub fn webhook_url(&self) -> String {
        format!("{}/webhook", self.app_base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_url_strips_trailing_slash() {
        let mut config = Config::from_env();
        config.app_base_url = "https://checkout.example.com/".to_string();
        assert_eq!(config.webhook_url(), "https://checkout.example.com/webhook");
    }
}

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
    pub kp_window_days: i64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5001/api".into()),
            auth_token: env::var("AUTH_TOKEN").ok().filter(|s| !s.is_empty()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .expect("REQUEST_TIMEOUT_SECS must be a number"),
            kp_window_days: env::var("KP_WINDOW_DAYS")
                .unwrap_or_else(|_| "3".into())
                .parse()
                .unwrap_or(3),
        }
    }
}

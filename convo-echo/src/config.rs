//! Demo configuration loaded from environment variables.
//!
//! Credentials, service sid and both phone numbers are required; everything else has a default.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use twilio_conversations::{mask_token, Credentials, DEFAULT_BASE_URL};

#[derive(Clone)]
pub struct EchoConfig {
    /// MS_TWILIO_ACCOUNT_SID
    pub account_sid: String,
    /// MS_TWILIO_API_KEY_SID
    pub api_key_sid: String,
    /// MS_TWILIO_SECRET
    pub api_secret: String,
    /// MS_TWILIO_DEFAULT_SERVICE_SID
    pub service_sid: String,
    /// PHONE_NUMBER, the operator's own number
    pub phone_number: String,
    /// MS_WHATSAPP_NUMBER, the provider-side sender number
    pub proxy_number: String,
    /// MESSAGING_CHANNEL; empty means bare numbers
    pub channel: String,
    /// TWILIO_CONVERSATIONS_URL
    pub api_base_url: String,
    /// POLL_INTERVAL_MS
    pub poll_interval: Duration,
    /// HTTP_TIMEOUT_SECS
    pub http_timeout: Duration,
    /// MAX_RETRIES for transient failures
    pub max_retries: u32,
    /// LOG_FILE
    pub log_file: String,
}

fn required(name: &str) -> Result<String> {
    let value = env::var(name).with_context(|| format!("{} not set", name))?;
    if value.trim().is_empty() {
        anyhow::bail!("{} is set but empty", name);
    }
    Ok(value.trim().to_string())
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} is not a valid number: {}", name, raw)),
        _ => Ok(default),
    }
}

impl EchoConfig {
    /// Loads from environment variables. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        let account_sid = required("MS_TWILIO_ACCOUNT_SID")?;
        let api_key_sid = required("MS_TWILIO_API_KEY_SID")?;
        let api_secret = required("MS_TWILIO_SECRET")?;
        let service_sid = required("MS_TWILIO_DEFAULT_SERVICE_SID")?;
        let phone_number = required("PHONE_NUMBER")?;
        let proxy_number = required("MS_WHATSAPP_NUMBER")?;

        let channel = env::var("MESSAGING_CHANNEL")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "whatsapp".to_string());
        let api_base_url = env::var("TWILIO_CONVERSATIONS_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let poll_interval = Duration::from_millis(parsed("POLL_INTERVAL_MS", 1000u64)?);
        let http_timeout = Duration::from_secs(parsed("HTTP_TIMEOUT_SECS", 30u64)?);
        let max_retries = parsed("MAX_RETRIES", 5u32)?;
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/convo-echo.log".to_string());

        Ok(Self {
            account_sid,
            api_key_sid,
            api_secret,
            service_sid,
            phone_number,
            proxy_number,
            channel,
            api_base_url,
            poll_interval,
            http_timeout,
            max_retries,
            log_file,
        })
    }

    /// Checks values that parse but cannot work (bad URL, zero interval).
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.api_base_url).is_err() {
            anyhow::bail!(
                "TWILIO_CONVERSATIONS_URL is set but not a valid URL: {}",
                self.api_base_url
            );
        }
        if self.poll_interval.is_zero() {
            anyhow::bail!("POLL_INTERVAL_MS must be greater than zero");
        }
        if self.phone_number == self.proxy_number {
            anyhow::bail!("PHONE_NUMBER and MS_WHATSAPP_NUMBER must differ");
        }
        Ok(())
    }

    fn address(&self, number: &str) -> String {
        if self.channel.is_empty() {
            number.to_string()
        } else {
            format!("{}:{}", self.channel, number)
        }
    }

    /// The operator's address on the channel, e.g. `whatsapp:+15550001111`.
    pub fn operator_address(&self) -> String {
        self.address(&self.phone_number)
    }

    /// The provider-side sender address on the channel.
    pub fn proxy_address(&self) -> String {
        self.address(&self.proxy_number)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            api_key_sid: self.api_key_sid.clone(),
            api_secret: self.api_secret.clone(),
        }
    }
}

impl std::fmt::Debug for EchoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EchoConfig")
            .field("account_sid", &mask_token(&self.account_sid))
            .field("api_key_sid", &mask_token(&self.api_key_sid))
            .field("api_secret", &"***")
            .field("service_sid", &self.service_sid)
            .field("operator_address", &self.operator_address())
            .field("proxy_address", &self.proxy_address())
            .field("api_base_url", &self.api_base_url)
            .field("poll_interval", &self.poll_interval)
            .field("http_timeout", &self.http_timeout)
            .field("max_retries", &self.max_retries)
            .field("log_file", &self.log_file)
            .finish()
    }
}

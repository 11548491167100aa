use anyhow::{bail, Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub feed: FeedConfig,
    pub whatsapp: Option<WhatsAppConfig>,
    pub email: Option<EmailConfig>,
    pub monitor: MonitorConfig,
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    pub sender_name: String,
    pub sender_address: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub poll_interval_secs: u64,
    pub cycle_timeout_secs: u64,
    pub seen_file: String,
    pub log_level: String,
    pub health_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        dotenv::dotenv().ok();

        let feed = FeedConfig {
            api_url: env::var("API_URL").context("API_URL must be set")?,
        };

        let whatsapp = whatsapp_section(
            optional_var("ACCOUNT_SID"),
            optional_var("AUTH_TOKEN"),
            optional_var("FROM_WHATSAPP"),
            optional_var("TO_WHATSAPP"),
        )?;

        let email = email_section(
            optional_var("EMAIL_API_KEY"),
            optional_var("SENDER_EMAIL"),
            optional_var("RECEIVER_EMAILS"),
            optional_var("SENDER_NAME"),
        )?;

        let monitor = MonitorConfig {
            poll_interval_secs: parse_var("POLL_INTERVAL_SECS", 120)?,
            cycle_timeout_secs: parse_var("CYCLE_TIMEOUT_SECS", 60)?,
            seen_file: env::var("SEEN_FILE").unwrap_or_else(|_| "seen.json".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            health_port: parse_var("HEALTH_PORT", 3000)?,
        };

        Ok(Config {
            feed,
            whatsapp,
            email,
            monitor,
        })
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        None => Ok(default),
    }
}

// A channel section is enabled only when every variable it needs is present;
// a half-filled section is a configuration mistake, not a disabled channel.
fn whatsapp_section(
    account_sid: Option<String>,
    auth_token: Option<String>,
    from: Option<String>,
    to: Option<String>,
) -> Result<Option<WhatsAppConfig>> {
    match (account_sid, auth_token, from, to) {
        (Some(account_sid), Some(auth_token), Some(from), Some(to)) => Ok(Some(WhatsAppConfig {
            account_sid,
            auth_token,
            from,
            to,
        })),
        (None, None, None, None) => Ok(None),
        _ => bail!(
            "incomplete WhatsApp configuration: ACCOUNT_SID, AUTH_TOKEN, FROM_WHATSAPP and TO_WHATSAPP must all be set together"
        ),
    }
}

fn email_section(
    api_key: Option<String>,
    sender_address: Option<String>,
    recipients_raw: Option<String>,
    sender_name: Option<String>,
) -> Result<Option<EmailConfig>> {
    match (api_key, sender_address, recipients_raw) {
        (Some(api_key), Some(sender_address), Some(raw)) => {
            let recipients = parse_recipients(&raw);
            if recipients.is_empty() {
                bail!("RECEIVER_EMAILS is set but contains no addresses");
            }
            Ok(Some(EmailConfig {
                api_key,
                sender_name: sender_name.unwrap_or_else(|| "Yad2 Alert Bot".to_string()),
                sender_address,
                recipients,
            }))
        }
        (None, None, None) => Ok(None),
        _ => bail!(
            "incomplete email configuration: EMAIL_API_KEY, SENDER_EMAIL and RECEIVER_EMAILS must all be set together"
        ),
    }
}

fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn whatsapp_section_requires_all_variables() {
        let section = whatsapp_section(some("sid"), some("token"), some("from"), some("to"))
            .unwrap()
            .unwrap();
        assert_eq!(section.account_sid, "sid");
        assert_eq!(section.to, "to");

        assert!(whatsapp_section(None, None, None, None).unwrap().is_none());
        assert!(whatsapp_section(some("sid"), None, some("from"), some("to")).is_err());
    }

    #[test]
    fn email_section_requires_all_variables() {
        let section = email_section(some("key"), some("bot@example.com"), some("a@b.c"), None)
            .unwrap()
            .unwrap();
        assert_eq!(section.recipients, vec!["a@b.c"]);
        assert_eq!(section.sender_name, "Yad2 Alert Bot");

        assert!(email_section(None, None, None, None).unwrap().is_none());
        assert!(email_section(some("key"), None, some("a@b.c"), None).is_err());
        assert!(email_section(some("key"), some("bot@example.com"), some(" , "), None).is_err());
    }

    #[test]
    fn recipients_are_trimmed_and_empty_entries_dropped() {
        let recipients = parse_recipients("one@example.com, two@example.com ,,");
        assert_eq!(recipients, vec!["one@example.com", "two@example.com"]);
    }
}

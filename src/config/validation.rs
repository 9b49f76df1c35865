use crate::config::types::{Config, CrawlerConfig, SearchConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

const MAX_CONCURRENT_FETCHES: u32 = 256;
const MIN_FETCH_TIMEOUT_MS: u64 = 100;
const MAX_FETCH_TIMEOUT_MS: u64 = 600_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_search_config(&config.search)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_CONCURRENT_FETCHES
    {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES, config.max_concurrent_fetches
        )));
    }

    if config.fetch_timeout_ms < MIN_FETCH_TIMEOUT_MS
        || config.fetch_timeout_ms > MAX_FETCH_TIMEOUT_MS
    {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_ms must be between {}ms and {}ms, got {}ms",
            MIN_FETCH_TIMEOUT_MS, MAX_FETCH_TIMEOUT_MS, config.fetch_timeout_ms
        )));
    }

    Ok(())
}

/// Validates the search endpoint configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid search endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Search endpoint '{}' must use http or https",
            config.endpoint
        )));
    }

    if config.query_parameter.trim().is_empty() {
        return Err(ConfigError::Validation(
            "query_parameter cannot be empty".to_string(),
        ));
    }

    if let Some(query) = &config.default_query {
        if query.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_query cannot be blank when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    if let Some(email) = &config.contact_email {
        validate_email(email)?;
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

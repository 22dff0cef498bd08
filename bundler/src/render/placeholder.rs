//! Placeholder substitution
//!
//! Templates carry literal tokens such as `<PROD_HOST>` or `<PATH_TO_LOGS>`.
//! Rendering is plain substring replacement: every occurrence is replaced,
//! missing tokens are a no-op and unknown tokens are left untouched.

use cluster_models::{Credentials, LogstashHost};

/// Which credentials slot feeds an environment scoped substitution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Prod,
    Mon,
}

impl Environment {
    pub fn tag(&self) -> &'static str {
        match self {
            Environment::Prod => "PROD",
            Environment::Mon => "MON",
        }
    }
}

/// Known placeholder kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Host(Environment),
    User(Environment),
    Password(Environment),
    SslEnabled(Environment),
    PathToLogs,
    LogstashApi,
    ClusterId,
}

impl Placeholder {
    /// The literal token as it appears in a template
    pub fn token(&self) -> String {
        match self {
            Placeholder::Host(env) => format!("<{}_HOST>", env.tag()),
            Placeholder::User(env) => format!("<{}_USER>", env.tag()),
            Placeholder::Password(env) => format!("<{}_PASSWORD>", env.tag()),
            Placeholder::SslEnabled(env) => format!("<{}_SSL_ENABLED>", env.tag()),
            Placeholder::PathToLogs => "<PATH_TO_LOGS>".to_string(),
            Placeholder::LogstashApi => "<LOGSTASH-API>".to_string(),
            Placeholder::ClusterId => "<CLUSTER_ID>".to_string(),
        }
    }

    pub fn replace(&self, text: &str, value: &str) -> String {
        text.replace(&self.token(), value)
    }
}

/// TLS is assumed whenever the host mentions "https" anywhere.
pub fn ssl_enabled(host: &str) -> bool {
    host.contains("https")
}

/// Replace the four connection tokens of `env` with values from `credentials`.
pub fn substitute_credentials(text: &str, credentials: &Credentials, env: Environment) -> String {
    let ssl = ssl_enabled(&credentials.host).to_string();
    [
        (Placeholder::Host(env), credentials.host.as_str()),
        (Placeholder::User(env), credentials.username.as_str()),
        (Placeholder::Password(env), credentials.password.as_str()),
        (Placeholder::SslEnabled(env), ssl.as_str()),
    ]
    .iter()
    .fold(text.to_string(), |acc, (placeholder, value)| {
        placeholder.replace(&acc, value)
    })
}

/// Replace the host scoped tokens with values from a Logstash node.
pub fn substitute_host(text: &str, host: &LogstashHost) -> String {
    let text = Placeholder::PathToLogs.replace(text, &host.logstash_logs_folder);
    Placeholder::LogstashApi.replace(&text, &host.logstash_api_host)
}

pub fn substitute_cluster_id(text: &str, cluster_id: &str) -> String {
    Placeholder::ClusterId.replace(text, cluster_id)
}

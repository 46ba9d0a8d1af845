//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use backend::domain::MailingRenderers;
use backend::domain::dispatch::DispatchConfig;
use backend::domain::ports::{
    FixtureCertificateRenderer, FixtureCodeRenderer, MailTransport,
};
use backend::outbound::mail::UnconfiguredMailTransport;
use backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) mail: Arc<dyn MailTransport>,
    pub(crate) renderers: MailingRenderers,
    pub(crate) dispatch: DispatchConfig,
}

impl ServerConfig {
    /// Configuration with in-memory storage, a logging mail transport, and
    /// placeholder renderers.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            mail: Arc::new(UnconfiguredMailTransport),
            renderers: MailingRenderers {
                codes: Arc::new(FixtureCodeRenderer),
                certificates: Arc::new(FixtureCertificateRenderer),
            },
            dispatch: DispatchConfig::default(),
        }
    }

    /// Attach a database connection pool; repositories become Diesel-backed.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_mail_transport(mut self, mail: Arc<dyn MailTransport>) -> Self {
        self.mail = mail;
        self
    }

    #[must_use]
    pub fn with_renderers(mut self, renderers: MailingRenderers) -> Self {
        self.renderers = renderers;
        self
    }

    #[must_use]
    pub fn with_dispatch_config(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }
}

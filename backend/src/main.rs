//! Backend entry-point: loads settings, wires adapters, and serves the REST
//! API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::MailingRenderers;
use backend::domain::ports::{
    CertificateRenderer, CodeRenderer, FixtureCertificateRenderer, FixtureCodeRenderer,
    MailTransport,
};
use backend::inbound::http::health::HealthState;
use backend::outbound::mail::{
    SmtpConfig, SmtpMailTransport, SmtpSecurity, UnconfiguredMailTransport,
};
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use backend::outbound::render::{CommandCertificateRenderer, CommandCodeRenderer, RenderCommand};
use backend::settings::AppSettings;

use server::{ServerConfig, create_server};

const DEFAULT_SENDER: &str = "Conference <no-reply@localhost>";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(bind_addr)
        .with_dispatch_config(settings.dispatch_config())
        .with_mail_transport(build_mail_transport(&settings)?)
        .with_renderers(build_renderers(&settings));

    match settings.database_url() {
        Some(database_url) => {
            let applied = run_pending_migrations(database_url)
                .await
                .map_err(std::io::Error::other)?;
            info!(applied, "database schema up to date");
            let pool = DbPool::new(
                PoolConfig::new(database_url).with_max_size(settings.db_pool_size()),
            )
            .await
            .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database URL configured; data is kept in memory"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

fn build_mail_transport(settings: &AppSettings) -> std::io::Result<Arc<dyn MailTransport>> {
    let Some(host) = settings.smtp_host() else {
        warn!("no SMTP host configured; outgoing mail is logged and dropped");
        return Ok(Arc::new(UnconfiguredMailTransport));
    };
    let security = SmtpSecurity::parse(settings.smtp_security()).ok_or_else(|| {
        std::io::Error::other(format!(
            "unknown SMTP security mode {:?}",
            settings.smtp_security()
        ))
    })?;
    let transport = SmtpMailTransport::new(SmtpConfig {
        host: host.to_owned(),
        port: settings.smtp_port(),
        username: settings.smtp_username.clone(),
        password: settings.smtp_password.clone(),
        from: settings
            .smtp_from
            .clone()
            .unwrap_or_else(|| DEFAULT_SENDER.to_owned()),
        security,
        timeout: settings.smtp_timeout(),
        transient_retry_after: settings.smtp_retry_after(),
    })
    .map_err(std::io::Error::other)?;
    info!(host, port = settings.smtp_port(), "SMTP transport configured");
    Ok(Arc::new(transport))
}

fn build_renderers(settings: &AppSettings) -> MailingRenderers {
    let timeout = settings.render_timeout();
    let codes: Arc<dyn CodeRenderer> = match settings
        .qr_command()
        .and_then(RenderCommand::from_command_line)
    {
        Some(command) => Arc::new(CommandCodeRenderer::new(command.with_timeout(timeout))),
        None => {
            warn!("no QR renderer command configured; using placeholder images");
            Arc::new(FixtureCodeRenderer)
        }
    };
    let certificates: Arc<dyn CertificateRenderer> = match settings
        .certificate_command()
        .and_then(RenderCommand::from_command_line)
    {
        Some(command) => Arc::new(CommandCertificateRenderer::new(command.with_timeout(timeout))),
        None => {
            warn!("no certificate renderer command configured; using placeholder documents");
            Arc::new(FixtureCertificateRenderer)
        }
    };
    MailingRenderers {
        codes,
        certificates,
    }
}

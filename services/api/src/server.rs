use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_form_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use pawd_forms::config::AppConfig;
use pawd_forms::error::AppError;
use pawd_forms::forms::{FormRules, FormsService, WebhookClient};
use pawd_forms::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let rules = FormRules::for_domain(&config.forms.school_domain)?;
    if config.forms.endpoints.signup.is_none() {
        warn!("SIGN_UP_API_KEY is not set; signup submissions will fail");
    }
    let forms_service = Arc::new(FormsService::new(
        rules,
        Arc::new(WebhookClient::new()),
        config.forms.endpoints.clone(),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_form_routes(forms_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        school_domain = %config.forms.school_domain,
        "pawd forms relay ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

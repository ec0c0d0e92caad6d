//! DermaSense Server
//!
//! HTTP API for skin lesion diagnosis. Loads the classifier once at startup
//! (degrading to simpler models when the artifact is unusable), then serves
//! predictions, SMS reports and contact form submissions.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use dermasense::backend::{backend_name, default_device, InferenceBackend};
use dermasense::contact::{ContactStore, JsonLinesStore};
use dermasense::inference::BurnEngine;
use dermasense::model::ModelLoader;
use dermasense::notify::{
    NotificationGateway, SmsProvider, SmsSettings, TwilioCredentials, TwilioProvider,
    DEFAULT_COUNTRY_CODE,
};
use dermasense::utils::logging::{init_logging, LogConfig, LogLevel};
use dermasense_server::{build_router, AppState, ServerConfig};

/// DermaSense Server
#[derive(Parser, Debug)]
#[command(name = "dermasense-server")]
#[command(version)]
#[command(about = "HTTP API for DermaSense skin lesion diagnosis")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Trained model artifact
    #[arg(long = "model", env = "MODEL_PATH", default_value = dermasense::model::DEFAULT_MODEL_PATH)]
    model_path: PathBuf,

    /// Pretrained MobileNetV2 feature weights for the rebuild fallback
    #[arg(long = "backbone", env = "BACKBONE_PATH")]
    backbone_path: Option<PathBuf>,

    /// Directory holding the web pages
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Directory uploads are stored in
    #[arg(long, env = "UPLOAD_DIR", default_value = "static/uploads")]
    upload_dir: PathBuf,

    /// JSON-lines file for contact form submissions
    #[arg(long, env = "CONTACTS_FILE")]
    contacts_file: Option<PathBuf>,

    /// Twilio account SID
    #[arg(long, env = "TWILIO_SID", hide_env_values = true)]
    twilio_sid: Option<String>,

    /// Twilio auth token
    #[arg(long, env = "TWILIO_AUTH_TOKEN", hide_env_values = true)]
    twilio_auth_token: Option<String>,

    /// Twilio sender number
    #[arg(long, env = "TWILIO_PHONE_NUMBER", default_value = "")]
    twilio_phone_number: String,

    /// Recipient for test messages sent without a number
    #[arg(long, env = "YOUR_PHONE_NUMBER")]
    default_recipient: Option<String>,

    /// Country calling code prepended to bare phone numbers
    #[arg(long, env = "SMS_COUNTRY_CODE", default_value = DEFAULT_COUNTRY_CODE)]
    sms_country_code: String,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn build_sms(cli: &Cli) -> NotificationGateway {
    let settings = SmsSettings {
        from_number: cli.twilio_phone_number.clone(),
        country_code: cli.sms_country_code.clone(),
        default_recipient: cli.default_recipient.clone(),
    };

    let Some(credentials) =
        TwilioCredentials::from_parts(cli.twilio_sid.clone(), cli.twilio_auth_token.clone())
    else {
        warn!("Twilio credentials not set; SMS service not available");
        return NotificationGateway::new(None, settings);
    };

    match TwilioProvider::new(credentials) {
        Ok(provider) => {
            let provider: Arc<dyn SmsProvider> = Arc::new(provider);
            let gateway = NotificationGateway::new(Some(provider), settings);
            if gateway.is_demo() {
                warn!("Twilio credentials are placeholders; SMS runs in demo mode");
            } else {
                info!("Twilio client initialized");
            }
            gateway
        }
        Err(e) => {
            warn!("Twilio initialization failed: {}", e);
            NotificationGateway::new(None, settings)
        }
    }
}

async fn build_contacts(path: Option<&PathBuf>) -> Option<Arc<dyn ContactStore>> {
    let path = path?;
    match JsonLinesStore::open(path).await {
        Ok(store) => {
            info!("Contact messages stored in {:?}", store.path());
            let store: Arc<dyn ContactStore> = Arc::new(store);
            Some(store)
        }
        Err(e) => {
            warn!("Contact storage unavailable: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Values from .env never override the real environment
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::production()
    };
    if let Some(level) = &cli.log_level {
        log_config = log_config.with_level(LogLevel::parse(level));
    }
    let _ = init_logging(&log_config);

    let config = ServerConfig {
        static_dir: cli.static_dir.clone(),
        upload_dir: cli.upload_dir.clone(),
        model_path: cli.model_path.clone(),
        port: cli.port,
        ..ServerConfig::default()
    };

    info!("DermaSense Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Model:      {:?}", config.model_path);
    info!("  Backbone:   {:?}", cli.backbone_path);
    info!("  Backend:    {}", backend_name());
    info!("  Static dir: {:?}", config.static_dir);
    info!("  Upload dir: {:?}", config.upload_dir);

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // Model loading is blocking and never fails outward
    let loader = ModelLoader::new(&config.model_path).with_backbone(cli.backbone_path.clone());
    let engine = tokio::task::spawn_blocking(move || {
        let device = default_device();
        let artifact = loader.load::<InferenceBackend>(&device);
        BurnEngine::new(artifact, device)
    })
    .await?;

    let sms = build_sms(&cli);
    let mut state = AppState::new(config)
        .with_engine(Arc::new(engine))
        .with_sms(sms);
    if let Some(contacts) = build_contacts(cli.contacts_file.as_ref()).await {
        state = state.with_contacts(contacts);
    } else {
        warn!("No contact storage configured; /contact will answer 503");
    }

    let app = build_router(Arc::new(state));

    // Start server
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

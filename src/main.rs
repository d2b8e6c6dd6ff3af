use predictboard::application::client::DashboardClient;
use predictboard::application::session::Session;
use predictboard::config::Config;
use predictboard::infrastructure::ServiceFactory;
use predictboard::interfaces::ui::DashboardApp;

use anyhow::Context;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

// A writer that sends logs to the UI via a crossbeam channel
struct ChannelWriter {
    sender: crossbeam_channel::Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let line = String::from_utf8_lossy(buf).trim_end().to_string();
        if !line.is_empty() {
            let _ = self.sender.try_send(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct ChannelWriterFactory {
    sender: crossbeam_channel::Sender<String>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ChannelWriterFactory {
    type Writer = ChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ChannelWriter {
            sender: self.sender.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // 0. Load Env
    dotenvy::dotenv().ok();

    // 1. Log channel feeding the activity panel
    let (log_tx, log_rx) = crossbeam_channel::unbounded();

    // 2. Logging (Stdout + UI)
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .pretty();

    let ui_layer = tracing_subscriber::fmt::layer()
        .with_writer(ChannelWriterFactory { sender: log_tx })
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .with(ui_layer)
        .init();

    let config = Config::from_env()?;
    info!(
        "Starting prediction dashboard ({:?} mode, server {})",
        config.mode, config.inference.base_url
    );

    // 3. Runtime for background requests. Lives until the window closes.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    // 4. Initial load. Missing price history is fatal.
    let surface = ServiceFactory::create_control_surface(&config);
    let loaded = runtime.block_on(surface.load())?;

    let session = Session::new(loaded);
    let client = DashboardClient::new(runtime.handle().clone(), surface, log_rx);
    let app = DashboardApp::new(session, client, config.dashboard.preview_rows);

    // 5. Run UI (Blocks Main Thread)
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title("Prediction Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Prediction Dashboard",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    info!("Dashboard closed");
    Ok(())
}

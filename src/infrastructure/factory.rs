use crate::application::control_surface::ControlSurface;
use crate::config::{Config, Mode};
use crate::domain::ports::InferenceService;
use crate::infrastructure::inference::HttpInferenceClient;
use crate::infrastructure::mock::MockInferenceService;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create_inference_service(config: &Config) -> Arc<dyn InferenceService> {
        match config.mode {
            Mode::Live => {
                let client = HttpInferenceClient::new(&config.inference);
                info!("Using inference server at {}", client.base_url());
                Arc::new(client)
            }
            Mode::Mock => {
                info!("MODE=mock: using synthetic inference data");
                Arc::new(MockInferenceService::synthetic(
                    &config.inference.alias_prefix,
                    Utc::now(),
                ))
            }
        }
    }

    pub fn create_control_surface(config: &Config) -> Arc<ControlSurface> {
        Arc::new(ControlSurface::new(
            Self::create_inference_service(config),
            config.inference.alias_prefix.clone(),
            &config.dashboard,
        ))
    }
}

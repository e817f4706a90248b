use std::sync::LazyLock;
use std::time::Duration;

const DEFAULT_MODEL_URL: &str = "https://storage.googleapis.com/mediapipe-models/face_landmarker/face_landmarker/float16/1/face_landmarker.task";

pub struct RelayConfig {
    listen_addr: String,
    engine: String,
    model_path: String,
    model_url: String,
    detect_timeout: Duration,
}

impl RelayConfig {
    fn from_env() -> Self {
        Self {
            listen_addr: env_or("FACE_RELAY_LISTEN", "0.0.0.0:8001"),
            engine: env_or("FACE_RELAY_ENGINE", "stub"),
            model_path: env_or("FACE_RELAY_MODEL_PATH", "face_landmarker.task"),
            model_url: env_or("FACE_RELAY_MODEL_URL", DEFAULT_MODEL_URL),
            detect_timeout: Duration::from_millis(
                std::env::var("FACE_RELAY_DETECT_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1000),
            ),
        }
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// Download source for the model asset; empty disables provisioning.
    pub fn model_url(&self) -> &str {
        &self.model_url
    }

    /// How long one detection may stay in flight before the frame is
    /// reported without a result.
    pub fn detect_timeout(&self) -> Duration {
        self.detect_timeout
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn config() -> &'static RelayConfig {
    static CONFIG: LazyLock<RelayConfig> = LazyLock::new(RelayConfig::from_env);
    &CONFIG
}

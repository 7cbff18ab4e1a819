use tokio::sync::RwLock;
use yaku_config::Config;
use yaku_provider::ApiKeys;

pub struct AppState {
    pub config: RwLock<Config>,
    pub keys: ApiKeys,
}

impl AppState {
    pub fn new(config: Config, keys: ApiKeys) -> Self {
        Self {
            config: RwLock::new(config),
            keys,
        }
    }
}

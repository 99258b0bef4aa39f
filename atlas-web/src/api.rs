use once_cell::unsync::OnceCell;
use shared::AtlasClient;
use shared::api::default_base_url;
use url::Url;

use crate::config::FrontendConfig;

thread_local! {
    static SHARED_CLIENT: OnceCell<AtlasClient> = OnceCell::new();
}

/// Process-wide backend client, built from [`FrontendConfig`] on first use.
pub fn shared_client() -> AtlasClient {
    SHARED_CLIENT.with(|cell| {
        cell.get_or_init(|| AtlasClient::new(base_url(&FrontendConfig::new())))
            .clone()
    })
}

fn base_url(config: &FrontendConfig) -> Url {
    Url::parse(config.api_base_url()).unwrap_or_else(|err| {
        web_sys::console::warn_1(
            &format!("Invalid API base URL {:?}: {err}", config.api_base_url()).into(),
        );
        default_base_url()
    })
}

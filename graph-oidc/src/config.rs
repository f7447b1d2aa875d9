/// Configuration for the OIDC authorization-code callback flow, per
/// SPEC_FULL.md §6.3/§6.5. Grounded on `r2e-oidc::OidcServerConfig`'s shape
/// (a single plain config struct with no profile layering), generalized from
/// an embedded-IdP config into one describing an *external* IdP.
#[derive(Clone, Debug)]
pub struct OidcClientConfig {
    pub discovery_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl OidcClientConfig {
    pub fn new(
        discovery_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            discovery_url: discovery_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }
}

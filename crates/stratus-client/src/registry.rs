//! Lazy, memoized construction of per-service clients.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use stratus_api::{negotiate, ApiVersion, Discovery, Gateway, ResourceApi, ServiceKind, Transport};
use stratus_auth::{AuthStrategy, CloudOptions, Session};

use crate::error::{Error, Result};
use crate::services;

/// A negotiated, endpoint-bound client for one service.
#[derive(Debug)]
pub struct ServiceClient {
    /// The service this client talks to.
    pub service: ServiceKind,
    /// The version the server committed to.
    pub server_version: ApiVersion,
    /// The version this client speaks.
    pub client_version: ApiVersion,
    /// The request surface, bound to the negotiated endpoint.
    pub api: ResourceApi,
}

impl ServiceClient {
    /// The major component of the negotiated client version. Some
    /// services route by major (identity v2 `/tenants` vs v3
    /// `/projects`).
    #[must_use]
    pub fn client_major(&self) -> u64 {
        self.client_version
            .version_components()
            .ok()
            .and_then(|components| components.first().copied())
            .unwrap_or(0)
    }
}

/// Construction state of a registry slot. `Building` is a reentrancy
/// sentinel: it is present only while [`ClientRegistry::build`] for
/// that service is on the stack.
#[derive(Debug)]
enum Slot {
    Building,
    Ready(Arc<ServiceClient>),
}

/// Builds service clients on first use and hands out the same client
/// on every later request for the same service.
///
/// A failed build leaves no slot behind: the next request retries from
/// scratch instead of replaying a cached error.
#[derive(Debug)]
pub struct ClientRegistry {
    options: CloudOptions,
    session: Arc<Session>,
    identity_major: Option<u64>,
    slots: HashMap<ServiceKind, Slot>,
}

impl ClientRegistry {
    /// Build a registry: the session is constructed eagerly so
    /// credential problems surface before any service is requested.
    pub fn new(options: CloudOptions) -> Result<Self> {
        let session = Arc::new(Session::new(&options)?);
        Ok(Self {
            options,
            session,
            identity_major: None,
            slots: HashMap::new(),
        })
    }

    /// The shared session.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The client for a service, building it on first request.
    pub async fn client(&mut self, service: ServiceKind) -> Result<Arc<ServiceClient>> {
        match self.slots.get(&service) {
            Some(Slot::Ready(client)) => {
                debug!(%service, "reusing cached service client");
                return Ok(Arc::clone(client));
            }
            Some(Slot::Building) => return Err(Error::ReentrantInit { service }),
            None => {}
        }

        self.slots.insert(service, Slot::Building);
        match self.build(service).await {
            Ok(client) => {
                let client = Arc::new(client);
                self.slots.insert(service, Slot::Ready(Arc::clone(&client)));
                Ok(client)
            }
            Err(err) => {
                self.slots.remove(&service);
                Err(err)
            }
        }
    }

    /// Authenticate, discover, negotiate, and bind one service client.
    async fn build(&mut self, service: ServiceKind) -> Result<ServiceClient> {
        self.ensure_authenticated().await?;

        let endpoint = self
            .session
            .endpoint_for(service)
            .ok_or(Error::NotConfigured { service })?;
        let requested = self
            .options
            .version_overrides
            .get(&service)
            .map(String::as_str);

        let (server_version, client_version, bound) =
            if matches!(self.session.strategy(), AuthStrategy::TokenEndpoint { .. }) {
                // Fixed-endpoint auth bypasses discovery entirely: the
                // URL already points at a concrete version root.
                let fallback = ApiVersion::new(service, services::default_version(service));
                let client = requested
                    .map(|id| ApiVersion::new(service, id))
                    .unwrap_or_else(|| fallback.clone());
                (fallback, client, endpoint)
            } else {
                let offered = services::client_versions(service, requested);
                let discovery = Discovery::new(self.session.http().clone()).with_url_host_hack(true);
                let advertised = discovery.probe_root(service, &endpoint, false).await?;
                let (server, client) = negotiate::require_match(service, &advertised, &offered)?;
                let bound = server.url.clone().unwrap_or(endpoint);
                (server, client, bound)
            };

        info!(
            %service,
            server = %server_version.id,
            client = %client_version.id,
            endpoint = %bound,
            "service client ready"
        );
        let gateway = Gateway::new()
            .with_session(Arc::clone(&self.session) as Arc<dyn Transport>)
            .with_endpoint(bound);
        Ok(ServiceClient {
            service,
            server_version,
            client_version,
            api: ResourceApi::new(gateway),
        })
    }

    /// Negotiate the identity version once, then run the session's
    /// one-shot token acquisition. Fixed-endpoint auth needs neither.
    ///
    /// Building any client does this implicitly; it is public for
    /// callers that want the catalog without binding a service.
    pub async fn ensure_authenticated(&mut self) -> Result<()> {
        if matches!(self.session.strategy(), AuthStrategy::TokenEndpoint { .. }) {
            return Ok(());
        }
        let major = match self.identity_major {
            Some(major) => major,
            None => {
                let auth_url = self.session.auth_url().ok_or_else(|| Error::Config {
                    reason: "auth strategy carries no identity URL".to_string(),
                })?;
                let requested = self
                    .options
                    .version_overrides
                    .get(&ServiceKind::Identity)
                    .map(String::as_str);
                let offered = services::client_versions(ServiceKind::Identity, requested);
                let discovery = Discovery::new(self.session.http().clone());
                let advertised = discovery
                    .probe_root(ServiceKind::Identity, auth_url, false)
                    .await?;
                let (_, client) =
                    negotiate::require_match(ServiceKind::Identity, &advertised, &offered)?;
                let major = client
                    .version_components()?
                    .first()
                    .copied()
                    .unwrap_or_default();
                debug!(major, "negotiated identity version");
                self.identity_major = Some(major);
                major
            }
        };
        self.session.authenticate(major).await?;
        Ok(())
    }
}

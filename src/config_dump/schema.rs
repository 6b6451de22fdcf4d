//! Typed schema for the sections of an Envoy admin config dump.
//!
//! Only the fields the inspector reads are modelled. Every field is optional or a
//! defaulted collection, so an absent field is an explicit `None`/empty value instead
//! of a lookup failure. Decoding only fails when a field that is present has the wrong
//! shape, e.g. a list that turns out to be a string.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

// ============================================================================
// Shared
// ============================================================================

/// Envoy `config.core.v3.Address`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Address {
    pub socket_address: Option<SocketAddress>,
    pub pipe: Option<Pipe>,
}

impl Address {
    /// Render as `address:port`, or the pipe path for unix sockets
    pub fn display(&self) -> Option<String> {
        if let Some(socket) = &self.socket_address {
            return socket.display();
        }
        self.pipe.as_ref().and_then(|pipe| pipe.path.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocketAddress {
    pub address: Option<String>,
    pub port_value: Option<u32>,
}

impl SocketAddress {
    pub fn display(&self) -> Option<String> {
        let address = self.address.as_deref()?;
        Some(match self.port_value {
            Some(port) => format!("{}:{}", address, port),
            None => address.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Pipe {
    pub path: Option<String>,
}

/// Envoy `type.matcher.v3.StringMatcher`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StringMatcher {
    pub exact: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub contains: Option<String>,
    pub safe_regex: Option<RegexMatcher>,
}

impl StringMatcher {
    /// The pattern text of whichever matcher is set
    pub fn pattern(&self) -> Option<&str> {
        self.exact
            .as_deref()
            .or(self.prefix.as_deref())
            .or(self.suffix.as_deref())
            .or(self.contains.as_deref())
            .or_else(|| self.safe_regex.as_ref().and_then(|regex| regex.regex.as_deref()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegexMatcher {
    pub regex: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeightedClusters {
    pub clusters: Vec<WeightedCluster>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeightedCluster {
    pub name: Option<String>,
}

// ============================================================================
// Clusters and endpoints
// ============================================================================

/// `admin.v3.ClustersConfigDump`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClustersConfigDump {
    pub static_clusters: Vec<ClusterEntry>,
    pub dynamic_active_clusters: Vec<ClusterEntry>,
}

/// A static or dynamic cluster entry; dynamic entries also carry `version_info`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClusterEntry {
    pub cluster: Option<ClusterConfig>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub discovery_type: Option<String>,
    pub cluster_type: Option<CustomClusterType>,
    pub load_assignment: Option<ClusterLoadAssignment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomClusterType {
    pub name: Option<String>,
}

/// `config.endpoint.v3.ClusterLoadAssignment`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClusterLoadAssignment {
    pub cluster_name: Option<String>,
    pub endpoints: Vec<LocalityLbEndpoints>,
}

impl ClusterLoadAssignment {
    /// Every load-balancing endpoint across all locality groups
    pub fn lb_endpoints(&self) -> impl Iterator<Item = &LbEndpoint> {
        self.endpoints.iter().flat_map(|group| group.lb_endpoints.iter())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocalityLbEndpoints {
    pub lb_endpoints: Vec<LbEndpoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LbEndpoint {
    pub endpoint: Option<EndpointConfig>,
    pub health_status: Option<String>,
    pub load_balancing_weight: Option<f64>,
}

impl LbEndpoint {
    /// Endpoint address as `address:port`, if the endpoint has one
    pub fn address(&self) -> Option<String> {
        self.endpoint.as_ref()?.address.as_ref()?.display()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub address: Option<Address>,
}

/// `admin.v3.EndpointsConfigDump`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EndpointsConfigDump {
    pub static_endpoint_configs: Vec<EndpointConfigEntry>,
    pub dynamic_endpoint_configs: Vec<EndpointConfigEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EndpointConfigEntry {
    pub endpoint_config: Option<ClusterLoadAssignment>,
}

// ============================================================================
// Listeners
// ============================================================================

/// `admin.v3.ListenersConfigDump`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListenersConfigDump {
    pub static_listeners: Vec<StaticListener>,
    pub dynamic_listeners: Vec<DynamicListener>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StaticListener {
    pub listener: Option<ListenerConfig>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DynamicListener {
    pub name: Option<String>,
    pub active_state: Option<ListenerState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListenerState {
    pub listener: Option<ListenerConfig>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    pub name: Option<String>,
    pub address: Option<Address>,
    pub filter_chains: Vec<FilterChainConfig>,
    pub default_filter_chain: Option<FilterChainConfig>,
    pub traffic_direction: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterChainConfig {
    pub filter_chain_match: Option<FilterChainMatch>,
    pub filters: Vec<NetworkFilter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterChainMatch {
    pub prefix_ranges: Vec<CidrRange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CidrRange {
    pub address_prefix: Option<String>,
}

/// A network filter whose `typed_config` is decoded lazily once its kind is known.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkFilter {
    pub name: Option<String>,
    pub typed_config: Option<serde_json::Value>,
}

/// Network filters the inspector understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFilterKind {
    Rbac,
    TcpProxy,
    HttpConnectionManager,
    Other,
}

impl NetworkFilter {
    /// Identify the filter from its `typed_config` type URL, falling back to its name
    pub fn kind(&self) -> NetworkFilterKind {
        let type_url = self
            .typed_config
            .as_ref()
            .and_then(|config| config.get("@type"))
            .and_then(|value| value.as_str())
            .unwrap_or_default();
        let name = self.name.as_deref().unwrap_or_default();

        if type_url.ends_with(".network.rbac.v3.RBAC") || name == "envoy.filters.network.rbac" {
            NetworkFilterKind::Rbac
        } else if type_url.ends_with(".tcp_proxy.v3.TcpProxy")
            || name == "envoy.filters.network.tcp_proxy"
        {
            NetworkFilterKind::TcpProxy
        } else if type_url.ends_with(".HttpConnectionManager")
            || name == "envoy.filters.network.http_connection_manager"
        {
            NetworkFilterKind::HttpConnectionManager
        } else {
            NetworkFilterKind::Other
        }
    }

    /// Decode `typed_config` into a concrete filter config; `None` when absent
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.typed_config.as_ref().map(T::deserialize).transpose()
    }
}

/// `extensions.filters.network.rbac.v3.RBAC`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RbacFilter {
    pub rules: Option<RbacRules>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RbacRules {
    pub action: Option<String>,
    pub policies: BTreeMap<String, RbacPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RbacPolicy {
    pub principals: Vec<Principal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Principal {
    pub any: Option<bool>,
    pub authenticated: Option<Authenticated>,
    pub or_ids: Option<PrincipalSet>,
    pub and_ids: Option<PrincipalSet>,
    pub not_id: Option<Box<Principal>>,
}

impl Principal {
    /// Collect principal-name patterns, flattening nested id sets
    pub fn collect_patterns(&self, out: &mut Vec<String>) {
        if self.any == Some(true) {
            out.push("*".to_string());
        }
        if let Some(pattern) = self
            .authenticated
            .as_ref()
            .and_then(|authenticated| authenticated.principal_name.as_ref())
            .and_then(StringMatcher::pattern)
        {
            out.push(pattern.to_string());
        }
        for set in [&self.or_ids, &self.and_ids].into_iter().flatten() {
            for id in &set.ids {
                id.collect_patterns(out);
            }
        }
        if let Some(not_id) = &self.not_id {
            let mut negated = Vec::new();
            not_id.collect_patterns(&mut negated);
            out.extend(negated.into_iter().map(|pattern| format!("!{}", pattern)));
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrincipalSet {
    pub ids: Vec<Principal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Authenticated {
    pub principal_name: Option<StringMatcher>,
}

/// `extensions.filters.network.tcp_proxy.v3.TcpProxy`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TcpProxy {
    pub cluster: Option<String>,
    pub weighted_clusters: Option<WeightedClusters>,
}

/// `extensions.filters.network.http_connection_manager.v3.HttpConnectionManager`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpConnectionManager {
    pub route_config: Option<RouteConfiguration>,
    pub rds: Option<Rds>,
    pub http_filters: Vec<HttpFilter>,
}

/// An HTTP filter of the connection manager's filter chain
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpFilter {
    pub name: Option<String>,
    pub typed_config: Option<serde_json::Value>,
}

impl HttpFilter {
    /// Whether this is the HTTP RBAC filter, by type URL or by name
    pub fn is_rbac(&self) -> bool {
        let type_url = self
            .typed_config
            .as_ref()
            .and_then(|config| config.get("@type"))
            .and_then(|value| value.as_str())
            .unwrap_or_default();

        type_url.ends_with(".http.rbac.v3.RBAC")
            || self.name.as_deref() == Some("envoy.filters.http.rbac")
    }

    /// Decode `typed_config`; `None` when absent
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.typed_config.as_ref().map(T::deserialize).transpose()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Rds {
    pub route_config_name: Option<String>,
}

// ============================================================================
// Routes
// ============================================================================

/// `admin.v3.RoutesConfigDump`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoutesConfigDump {
    pub static_route_configs: Vec<RouteConfigEntry>,
    pub dynamic_route_configs: Vec<RouteConfigEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteConfigEntry {
    pub route_config: Option<RouteConfiguration>,
    pub last_updated: Option<String>,
}

/// `config.route.v3.RouteConfiguration`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteConfiguration {
    pub name: Option<String>,
    pub virtual_hosts: Vec<VirtualHost>,
}

impl RouteConfiguration {
    /// Every route across all virtual hosts, in configuration order
    pub fn routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.virtual_hosts.iter().flat_map(|host| host.routes.iter())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VirtualHost {
    pub name: Option<String>,
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteEntry {
    #[serde(rename = "match")]
    pub route_match: Option<RouteMatch>,
    pub route: Option<RouteAction>,
}

impl RouteEntry {
    /// Destination cluster(s); weighted clusters are joined with `,`
    pub fn cluster(&self) -> Option<String> {
        let action = self.route.as_ref()?;
        if let Some(cluster) = &action.cluster {
            return Some(cluster.clone());
        }
        let names: Vec<&str> = action
            .weighted_clusters
            .as_ref()?
            .clusters
            .iter()
            .filter_map(|cluster| cluster.name.as_deref())
            .collect();
        (!names.is_empty()).then(|| names.join(","))
    }

    /// Path match text: prefix, then exact path, then regex
    pub fn path_match(&self) -> &str {
        self.route_match
            .as_ref()
            .and_then(|route_match| {
                route_match
                    .prefix
                    .as_deref()
                    .or(route_match.path.as_deref())
                    .or_else(|| route_match.safe_regex.as_ref().and_then(|r| r.regex.as_deref()))
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteMatch {
    pub prefix: Option<String>,
    pub path: Option<String>,
    pub safe_regex: Option<RegexMatcher>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteAction {
    pub cluster: Option<String>,
    pub weighted_clusters: Option<WeightedClusters>,
}

// ============================================================================
// Secrets
// ============================================================================

/// `admin.v3.SecretsConfigDump`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SecretsConfigDump {
    pub static_secrets: Vec<SecretEntry>,
    pub dynamic_active_secrets: Vec<SecretEntry>,
    pub dynamic_warming_secrets: Vec<SecretEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SecretEntry {
    pub name: Option<String>,
    pub last_updated: Option<String>,
    pub secret: Option<SecretConfig>,
}

/// `extensions.transport_sockets.tls.v3.Secret`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SecretConfig {
    pub name: Option<String>,
    pub tls_certificate: Option<TlsCertificate>,
    pub validation_context: Option<ValidationContext>,
    pub session_ticket_keys: Option<serde_json::Value>,
    pub generic_secret: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TlsCertificate {
    pub certificate_chain: Option<DataSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidationContext {
    pub trusted_ca: Option<DataSource>,
}

/// `config.core.v3.DataSource`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataSource {
    pub inline_string: Option<String>,
    pub inline_bytes: Option<String>,
    pub filename: Option<String>,
}

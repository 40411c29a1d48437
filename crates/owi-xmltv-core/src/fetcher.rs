//! Retrieval of bouquets, services and EPG events from OpenWebif
//!
//! Combines the HTTP client with the API payload shapes to produce the
//! [`Listing`] the document generator works on.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, info};

use crate::client::{ClientConfig, OpenWebifClient};
use crate::error::{Result, XmltvError};
use crate::types::{Bouquet, Event, Listing, Service};

/// A bouquet as listed by `/api/bouquets`, before its services are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BouquetRef {
    pub name: String,
    pub reference: String,
}

#[derive(Debug, Deserialize)]
struct BouquetsResponse {
    /// `[service reference, name]` pairs
    bouquets: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct ServicesResponse {
    services: Vec<Service>,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    events: Vec<Event>,
}

/// Reads the EPG of a receiver through its OpenWebif API.
///
/// # Example
/// ```no_run
/// use owi_xmltv_core::{ClientConfig, EpgFetcher};
///
/// # async fn example() -> Result<(), owi_xmltv_core::XmltvError> {
/// let fetcher = EpgFetcher::new(ClientConfig::default())?;
/// let listing = fetcher.fetch_listing(Some("Favourites (TV)")).await?;
/// println!("{} bouquets", listing.bouquets.len());
/// # Ok(())
/// # }
/// ```
pub struct EpgFetcher {
    client: OpenWebifClient,
}

impl EpgFetcher {
    /// Create a fetcher for the receiver described by `config`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: OpenWebifClient::with_config(config)?,
        })
    }

    /// Create a fetcher with a pre-configured client.
    pub fn with_client(client: OpenWebifClient) -> Self {
        Self { client }
    }

    /// Root URL that picon paths are appended to.
    pub fn api_root(&self) -> String {
        self.client.config().api_root()
    }

    /// List every bouquet on the receiver.
    pub async fn list_bouquets(&self) -> Result<Vec<BouquetRef>> {
        let response: BouquetsResponse = self.client.fetch_json("/api/bouquets").await?;
        Ok(response
            .bouquets
            .into_iter()
            .map(|(reference, name)| BouquetRef { name, reference })
            .collect())
    }

    /// Bouquets to convert: all of them, or only the one named `filter`.
    ///
    /// # Errors
    /// `XmltvError::BouquetNotFound` if `filter` names no bouquet.
    pub async fn get_bouquets(&self, filter: Option<&str>) -> Result<Vec<BouquetRef>> {
        let bouquets = self.list_bouquets().await?;

        let Some(wanted) = filter.filter(|name| !name.is_empty()) else {
            return Ok(bouquets);
        };

        let selected: Vec<BouquetRef> = bouquets
            .into_iter()
            .filter(|bouquet| bouquet.name == wanted)
            .collect();
        if selected.is_empty() {
            return Err(XmltvError::BouquetNotFound(wanted.to_string()));
        }
        Ok(selected)
    }

    /// Services of a bouquet, in bouquet order.
    pub async fn get_services(&self, bouquet: &BouquetRef) -> Result<Vec<Service>> {
        let path = format!(
            "/api/getservices?sRef={}",
            urlencoding::encode(&bouquet.reference)
        );
        let response: ServicesResponse = self.client.fetch_json(&path).await?;
        Ok(response.services)
    }

    /// EPG events of a service, in broadcast order.
    pub async fn get_events(&self, service: &Service) -> Result<Vec<Event>> {
        let path = format!(
            "/api/epgservice?sRef={}",
            urlencoding::encode(&service.service_reference)
        );
        let response: EventsResponse = self.client.fetch_json(&path).await?;
        Ok(response.events)
    }

    /// Retrieve everything a document needs.
    ///
    /// Events are fetched once per program reference, for positioned
    /// services only.
    pub async fn fetch_listing(&self, filter: Option<&str>) -> Result<Listing> {
        let mut bouquets = Vec::new();
        for bouquet in self.get_bouquets(filter).await? {
            let services = self.get_services(&bouquet).await?;
            info!(bouquet = %bouquet.name, services = services.len(), "Fetched bouquet services");
            bouquets.push(Bouquet {
                name: bouquet.name,
                reference: bouquet.reference,
                services,
            });
        }

        let mut epg: HashMap<String, Vec<Event>> = HashMap::new();
        for bouquet in &bouquets {
            for service in bouquet.services.iter().filter(|s| s.is_channel()) {
                if epg.contains_key(&service.program_reference) {
                    continue;
                }
                debug!(
                    position = service.position,
                    service = %service.name,
                    program = %service.program_reference,
                    "Getting EPG for service"
                );
                let events = self.get_events(service).await?;
                epg.insert(service.program_reference.clone(), events);
            }
        }

        Ok(Listing { bouquets, epg })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FAVOURITES_REF: &str =
        "1:7:1:0:0:0:0:0:0:0:FROM BOUQUET \"userbouquet.favourites.tv\" ORDER BY bouquet";
    const RADIO_REF: &str =
        "1:7:2:0:0:0:0:0:0:0:FROM BOUQUET \"userbouquet.radio.radio\" ORDER BY bouquet";

    async fn mock_json(server: &MockServer, api_path: &str, sref: Option<&str>, body: serde_json::Value) {
        let mut mock = Mock::given(method("GET")).and(path(api_path));
        if let Some(sref) = sref {
            mock = mock.and(query_param("sRef", sref));
        }
        mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn receiver() -> MockServer {
        let server = MockServer::start().await;

        mock_json(
            &server,
            "/api/bouquets",
            None,
            serde_json::json!({
                "bouquets": [[FAVOURITES_REF, "Favourites (TV)"], [RADIO_REF, "Radio"]]
            }),
        )
        .await;
        mock_json(
            &server,
            "/api/getservices",
            Some(FAVOURITES_REF),
            serde_json::json!({
                "services": [
                    {"pos": 1, "servicename": "BBC One", "servicereference": "1:0:19:17D4:7FD:2:11A0000:0:0:0:", "program": 6100},
                    {"pos": null, "servicename": "--- Kids ---", "servicereference": "1:64:0:0:0:0:0:0:0:0::--- Kids ---", "program": 0},
                    {"pos": 2, "servicename": "BBC One Again", "servicereference": "1:0:19:17D4:7FD:2:11A0000:0:0:0:", "program": 6100}
                ]
            }),
        )
        .await;
        mock_json(
            &server,
            "/api/getservices",
            Some(RADIO_REF),
            serde_json::json!({ "services": [] }),
        )
        .await;
        mock_json(
            &server,
            "/api/epgservice",
            Some("1:0:19:17D4:7FD:2:11A0000:0:0:0:"),
            serde_json::json!({
                "events": [
                    {"begin_timestamp": 1700000000, "duration": 30, "title": "News", "shortdesc": "[News]", "longdesc": "", "picon": "/picon/bbc1.png"},
                    {"begin_timestamp": 1700001800, "duration": 60, "title": "Film", "shortdesc": "[Movie]", "longdesc": "Plot", "picon": "/picon/bbc1.png"}
                ]
            }),
        )
        .await;

        server
    }

    fn fetcher_for(server: &MockServer) -> EpgFetcher {
        let address = server.address();
        EpgFetcher::new(ClientConfig {
            host: address.ip().to_string(),
            port: address.port(),
            requests_per_second: 100.0,
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_bouquets() {
        let server = receiver().await;
        let bouquets = fetcher_for(&server).list_bouquets().await.unwrap();

        assert_eq!(bouquets.len(), 2);
        assert_eq!(bouquets[0].name, "Favourites (TV)");
        assert_eq!(bouquets[0].reference, FAVOURITES_REF);
        assert_eq!(bouquets[1].name, "Radio");
    }

    #[tokio::test]
    async fn test_get_bouquets_filter() {
        let server = receiver().await;
        let fetcher = fetcher_for(&server);

        let all = fetcher.get_bouquets(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let empty_filter = fetcher.get_bouquets(Some("")).await.unwrap();
        assert_eq!(empty_filter.len(), 2);

        let radio = fetcher.get_bouquets(Some("Radio")).await.unwrap();
        assert_eq!(radio, vec![BouquetRef {
            name: "Radio".to_string(),
            reference: RADIO_REF.to_string(),
        }]);
    }

    #[tokio::test]
    async fn test_get_bouquets_unknown_filter() {
        let server = receiver().await;
        let result = fetcher_for(&server).get_bouquets(Some("Sports")).await;

        match result {
            Err(XmltvError::BouquetNotFound(name)) => assert_eq!(name, "Sports"),
            other => panic!("Expected BouquetNotFound error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_listing() {
        let server = receiver().await;
        let listing = fetcher_for(&server)
            .fetch_listing(Some("Favourites (TV)"))
            .await
            .unwrap();

        assert_eq!(listing.bouquets.len(), 1);
        assert_eq!(listing.bouquets[0].services.len(), 3);
        assert_eq!(listing.channel_services().count(), 2);

        let events = listing.events_for("6100");
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].title, "Film");
        assert_eq!(events[1].duration_minutes, 60);
        assert!(listing.events_for("0").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_listing_requests_each_program_once() {
        let server = receiver().await;
        fetcher_for(&server).fetch_listing(None).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let epg_requests = requests
            .iter()
            .filter(|request| request.url.path() == "/api/epgservice")
            .count();
        assert_eq!(epg_requests, 1);
    }

    #[test]
    fn test_api_root_keeps_credentials() {
        let fetcher = EpgFetcher::new(ClientConfig {
            host: "box".to_string(),
            username: Some("root".to_string()),
            password: Some("pw".to_string()),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(fetcher.api_root(), "http://root:pw@box:80");
    }
}

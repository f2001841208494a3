use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use roxmltree::Document;
use url::Url;
use crate::models::{Credentials, Gradebook, ReportingPeriod};
use crate::utils::gradebook::parse_gradebook;

pub const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";

// The service signals failures loosely, so any occurrence of this marker in the payload means no data.
const SERVER_ERROR_MARKER: &str = "ERROR";

const RESULT_ELEMENT: &str = "ProcessWebServiceRequestResult";

// Anything that can hand out the gradebook of one reporting period.
// `None` means the period has no usable data; the caller moves on to the next one.
pub trait GradebookSource {
    fn fetch(&self, credentials: &Credentials, period: ReportingPeriod) -> Option<Gradebook>;
}

// Blocking SOAP client for the StudentVUE PXP web service. One instance is reused for every period.
pub struct StudentVueClient {
    client: Client,
    endpoint: Url,
}

impl StudentVueClient {
    pub fn new(endpoint: Url) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .context("Failed to build the client")?;

        Ok(Self { client, endpoint })
    }

    // Returns Ok(None) when the server answered but flagged the period as unavailable.
    fn request_gradebook(&self, credentials: &Credentials, period: ReportingPeriod) -> Result<Option<Gradebook>> {
        let response = self.client.post(self.endpoint.clone())
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .body(gradebook_envelope(credentials, period))
            .send()
            .context("Failed to send gradebook request")?
            .error_for_status()
            .context("Gradebook request was rejected")?;

        let body = response.text().context("Failed to read response text")?;
        let payload = extract_result(&body)?;

        if payload.contains(SERVER_ERROR_MARKER) {
            return Ok(None);
        }

        let gradebook = parse_gradebook(&payload).context("Failed to parse gradebook XML")?;
        Ok(Some(gradebook))
    }
}

impl GradebookSource for StudentVueClient {
    fn fetch(&self, credentials: &Credentials, period: ReportingPeriod) -> Option<Gradebook> {
        info!("Requesting data for reporting {}...", period);

        match self.request_gradebook(credentials, period) {
            Ok(Some(gradebook)) => {
                info!("  -> Successfully retrieved data for {}", period);
                Some(gradebook)
            },
            Ok(None) => {
                warn!("  -> Server returned an error for {}. The period may not exist or data is unavailable.", period);
                None
            },
            Err(e) => {
                warn!("  -> Could not retrieve data for {}: {:#}", period, e);
                None
            },
        }
    }
}

// SOAP 1.2 envelope for the Gradebook method. Credentials are inserted as-is.
pub fn gradebook_envelope(credentials: &Credentials, period: ReportingPeriod) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap12:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:soap12="http://www.w3.org/2003/05/soap-envelope">
  <soap12:Body>
    <ProcessWebServiceRequest xmlns="http://edupoint.com/webservices/">
      <userID>{username}</userID>
      <password>{password}</password>
      <skipLoginLog>true</skipLoginLog>
      <parent>false</parent>
      <webServiceHandleName>PXPWebServices</webServiceHandleName>
      <methodName>Gradebook</methodName>
      <paramStr>&lt;Params&gt;&lt;ReportPeriod&gt;{period}&lt;/ReportPeriod&gt;&lt;/Params&gt;</paramStr>
    </ProcessWebServiceRequest>
  </soap12:Body>
</soap12:Envelope>"#,
        username = credentials.username(),
        password = credentials.password(),
        period = period.index(),
    )
}

// Pulls the entity-decoded inner document out of the SOAP response.
pub fn extract_result(body: &str) -> Result<String> {
    let document = Document::parse(body).context("Response is not valid XML")?;
    let result = document
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == RESULT_ELEMENT)
        .ok_or_else(|| anyhow!("Response has no {} element", RESULT_ELEMENT))?;

    Ok(result
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect())
}

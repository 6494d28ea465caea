//! Blocking executor for the requests the core builds.

use std::time::Duration;

use marketplace_core::{HttpMethod, HttpRequest, HttpResponse};
use tracing::debug;

pub struct Transport {
    agent: ureq::Agent,
}

impl Transport {
    /// Non-2xx statuses come back as responses, not errors, so the core
    /// client decides what they mean.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Send `req` with every header it carries. Only transport failures
    /// (DNS, refused connection, timeout) are errors.
    pub fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ureq::Error> {
        let method = req.method;
        let mut response = match req.method {
            HttpMethod::Get => with_headers(self.agent.get(&req.path), &req.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&req.path), &req.headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(&req.path), &req.headers);
                match req.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = with_headers(self.agent.put(&req.path), &req.headers);
                match req.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        }?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        debug!(%method, url = %req.path, status, "API response");
        Ok(HttpResponse::new(status, body))
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

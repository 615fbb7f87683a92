pub mod account;
pub mod listing;

/// A request against one backend route.
#[async_trait::async_trait]
pub trait Request {
    type Output;

    const URL_SUFFIX: &'static str;
    const METHOD: reqwest::Method = reqwest::Method::POST;

    fn make_req(&self, req: reqwest::RequestBuilder) -> anyhow::Result<reqwest::RequestBuilder>;

    async fn parse_res(&mut self, response: reqwest::Response) -> anyhow::Result<Self::Output>;
}

/// A non-success response from the backend.
#[derive(Debug)]
pub struct ResponseError {
    pub status: reqwest::StatusCode,
    /// Message of the backend's `{"error": ..}` body, if it sent one.
    pub message: Option<String>,
}

impl ResponseError {
    async fn read(response: reqwest::Response) -> Self {
        #[derive(serde::Deserialize)]
        struct Body {
            error: String,
        }

        let status = response.status();
        Self {
            status,
            message: response.json::<Body>().await.ok().map(|body| body.error),
        }
    }

    /// Whether the session was rejected and has to log in again.
    pub fn is_unauthorized(&self) -> bool {
        self.status == reqwest::StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ResponseError {}

/// Calls a [`Request`] and returns its output.
///
/// Non-success responses fail with a [`ResponseError`].
pub async fn call<T: Request>(mut req: T, cx: &crate::Context) -> anyhow::Result<T::Output> {
    let url = format!("{}{}", cx.url_prefix, T::URL_SUFFIX);
    let response = req
        .make_req(cx.req_client.request(T::METHOD, url))?
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ResponseError::read(response).await.into());
    }
    req.parse_res(response).await
}

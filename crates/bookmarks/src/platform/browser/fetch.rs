//! `window.fetch` as a [`Transport`].

use std::future::Future;

use js_sys::Promise;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{RequestInit, Window};

use crate::error::ClientError;
use crate::page::Transport;
use crate::request::{FORM_CONTENT_TYPE, Request, Response};

pub struct FetchTransport {
    window: Window,
}

impl FetchTransport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    /// Starts the fetch right away; only reading the response is deferred.
    fn start(&self, request: &Request) -> Result<Promise, ClientError> {
        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        if let Some(body) = &request.body {
            init.set_body(&JsValue::from_str(body));
        }
        let web_request = web_sys::Request::new_with_str_and_init(&request.url, &init)
            .map_err(ClientError::from_js)?;
        let headers = web_request.headers();
        headers
            .set("X-Requested-With", "XMLHttpRequest")
            .map_err(ClientError::from_js)?;
        if request.body.is_some() {
            headers
                .set("Content-Type", FORM_CONTENT_TYPE)
                .map_err(ClientError::from_js)?;
        }
        Ok(self.window.fetch_with_request(&web_request))
    }
}

impl Transport for FetchTransport {
    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, ClientError>> + 'static {
        let started = self.start(&request);
        async move {
            let response: web_sys::Response = JsFuture::from(started?)
                .await
                .map_err(ClientError::from_js)?
                .dyn_into()
                .map_err(ClientError::from_js)?;
            let status = response.status();
            let text = response.text().map_err(ClientError::from_js)?;
            let body = JsFuture::from(text).await.map_err(ClientError::from_js)?;
            Ok(Response {
                status,
                body: body.as_string().unwrap_or_default(),
            })
        }
    }
}

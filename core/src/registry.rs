//! Name → handler table a host uses to address activities.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::activities::{
    CreateMaximoResource, CreateMaximoService, DeleteMaximoResource, GetMaximoAsset,
    GetMaximoAssets, GetMaximoCurrentUser, GetMaximoResource, GetMaximoResources,
    GetMaximoSystemInfo, SendMaximoRequest, UpdateMaximoAsset, UpdateMaximoResource,
};
use crate::activity::ActivityHandler;
use crate::error::MaximoError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

#[derive(Default)]
pub struct Registry {
    handlers: BTreeMap<&'static str, Box<dyn ActivityHandler>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every Maximo activity this crate provides.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(CreateMaximoService);
        registry.register(SendMaximoRequest);
        registry.register(GetMaximoResource);
        registry.register(GetMaximoResources);
        registry.register(CreateMaximoResource);
        registry.register(UpdateMaximoResource);
        registry.register(DeleteMaximoResource);
        registry.register(GetMaximoAsset);
        registry.register(GetMaximoAssets);
        registry.register(UpdateMaximoAsset);
        registry.register(GetMaximoCurrentUser);
        registry.register(GetMaximoSystemInfo);
        registry
    }

    /// Add a handler, replacing any previous one with the same name.
    pub fn register<H: ActivityHandler + 'static>(&mut self, handler: H) -> &mut Self {
        self.handlers.insert(handler.name(), Box::new(handler));
        self
    }

    pub fn get(&self, name: &str) -> Result<&dyn ActivityHandler, MaximoError> {
        self.handlers
            .get(name)
            .map(|h| h.as_ref())
            .ok_or_else(|| MaximoError::UnknownActivity(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    pub fn build_request(&self, name: &str, inputs: &Value) -> Result<HttpRequest, MaximoError> {
        self.get(name)?.build_request(inputs)
    }

    pub fn parse_response(
        &self,
        name: &str,
        inputs: &Value,
        response: HttpResponse,
    ) -> Result<Value, MaximoError> {
        self.get(name)?.parse_response(inputs, response)
    }

    pub async fn execute(
        &self,
        name: &str,
        transport: &dyn Transport,
        inputs: Value,
    ) -> Result<Value, MaximoError> {
        self.get(name)?.execute(transport, inputs).await
    }
}

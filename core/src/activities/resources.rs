//! Generic object-structure activities over `os/<resource>`.
//!
//! These resolve against `service.context` with no default prefix, so the
//! service URL is expected to point at the API root unless a context is set.
//! `GetMaximoResource` is the exception: it takes a full relative resource
//! path and defaults to the `oslc` context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::activity::{
    narrow, non_empty, require_service, require_str, require_value, Activity,
};
use crate::error::MaximoError;
use crate::http::{HttpRequest, HttpResponse};
use crate::id::id_from_id_or_url;
use crate::params::Params;
use crate::request::{self, METHOD_OVERRIDE_HEADER};
use crate::service::Service;

use super::shapes::{Resource, ResourceCollection};
use super::{OSLC_CONTEXT, RESOURCE_CONTEXT};

/// Outputs of activities that return the response untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOutputs {
    pub result: Value,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetMaximoResource;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetMaximoResourceInputs {
    #[serde(default)]
    pub service: Option<Service>,
    /// Relative resource path such as `os/mxpo/{id}`.
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub select: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMaximoResourceOutputs {
    pub result: Resource,
}

impl Activity for GetMaximoResource {
    type Inputs = GetMaximoResourceInputs;
    type Outputs = GetMaximoResourceOutputs;

    const NAME: &'static str = "GetMaximoResource";

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError> {
        let service = require_service(&inputs.service)?;
        let resource = require_str(&inputs.resource, "resource")?;
        let query = Params::new().with_opt("oslc.select", non_empty(&inputs.select));
        request::build_get(service, &service.route(OSLC_CONTEXT, resource), Some(&query), None)
    }

    fn parse(&self, _: &Self::Inputs, response: HttpResponse) -> Result<Self::Outputs, MaximoError> {
        let result = narrow(request::parse_response(response)?)?;
        Ok(GetMaximoResourceOutputs { result })
    }
}

/// Collection query. One page per call; callers re-issue for more.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetMaximoResources;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMaximoResourcesInputs {
    #[serde(default)]
    pub service: Option<Service>,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default, rename = "where")]
    pub where_clause: Option<String>,
    #[serde(default)]
    pub select: Option<String>,
    #[serde(default)]
    pub order_by: Option<String>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub count_only: Option<bool>,
}

impl GetMaximoResourcesInputs {
    fn query(&self) -> Params {
        Params::new()
            .with_opt("count", self.count_only.filter(|c| *c).map(|_| 1))
            .with_opt("oslc.orderBy", non_empty(&self.order_by))
            .with_opt("oslc.pageSize", self.page_size.filter(|p| *p > 0))
            .with_opt("oslc.select", non_empty(&self.select))
            .with_opt("oslc.where", non_empty(&self.where_clause))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMaximoResourcesOutputs {
    pub result: ResourceCollection,
}

impl Activity for GetMaximoResources {
    type Inputs = GetMaximoResourcesInputs;
    type Outputs = GetMaximoResourcesOutputs;

    const NAME: &'static str = "GetMaximoResources";

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError> {
        let service = require_service(&inputs.service)?;
        let resource = require_str(&inputs.resource, "resource")?;
        let path = service.route(RESOURCE_CONTEXT, &format!("os/{resource}"));
        request::build_get(service, &path, Some(&inputs.query()), None)
    }

    fn parse(&self, _: &Self::Inputs, response: HttpResponse) -> Result<Self::Outputs, MaximoError> {
        let result = narrow(request::parse_response(response)?)?;
        Ok(GetMaximoResourcesOutputs { result })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CreateMaximoResource;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMaximoResourceInputs {
    #[serde(default)]
    pub service: Option<Service>,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
    /// Attributes to echo back, `*` for all. Without it Maximo answers with
    /// an empty body.
    #[serde(default)]
    pub properties: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMaximoResourceOutputs {
    pub result: Resource,
}

impl Activity for CreateMaximoResource {
    type Inputs = CreateMaximoResourceInputs;
    type Outputs = CreateMaximoResourceOutputs;

    const NAME: &'static str = "CreateMaximoResource";

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError> {
        let service = require_service(&inputs.service)?;
        let resource = require_str(&inputs.resource, "resource")?;
        let content = require_value(&inputs.content, "content")?;
        let headers = Params::new().with_opt("properties", non_empty(&inputs.properties));
        let path = service.route(RESOURCE_CONTEXT, &format!("os/{resource}"));
        request::build_post(service, &path, None, Some(content), Some(&headers))
    }

    fn parse(&self, _: &Self::Inputs, response: HttpResponse) -> Result<Self::Outputs, MaximoError> {
        let location = response.header("location").map(str::to_string);
        let mut result: Resource = narrow(request::parse_response(response)?)?;
        if result.href.is_none() {
            result.href = location;
        }
        Ok(CreateMaximoResourceOutputs { result })
    }
}

/// Merge-update one record, or sync a batch when no id is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateMaximoResource;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMaximoResourceInputs {
    #[serde(default)]
    pub service: Option<Service>,
    #[serde(default)]
    pub resource: Option<String>,
    /// Resource key or full resource URL.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub properties: Option<String>,
}

impl Activity for UpdateMaximoResource {
    type Inputs = UpdateMaximoResourceInputs;
    type Outputs = RawOutputs;

    const NAME: &'static str = "UpdateMaximoResource";

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError> {
        let service = require_service(&inputs.service)?;
        let resource = require_str(&inputs.resource, "resource")?;
        let content = require_value(&inputs.content, "content")?;

        let id = non_empty(&inputs.id).map(id_from_id_or_url);
        let path = match id {
            Some(id) => format!("os/{resource}/{id}"),
            None => format!("os/{resource}"),
        };
        let headers = Params::new()
            .with(METHOD_OVERRIDE_HEADER, if id.is_some() { "PATCH" } else { "SYNC" })
            .with("patchtype", "MERGE")
            .with_opt("properties", non_empty(&inputs.properties));

        request::build_post(
            service,
            &service.route(RESOURCE_CONTEXT, &path),
            None,
            Some(content),
            Some(&headers),
        )
    }

    fn parse(&self, _: &Self::Inputs, response: HttpResponse) -> Result<Self::Outputs, MaximoError> {
        Ok(RawOutputs {
            result: request::parse_response(response)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteMaximoResource;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteMaximoResourceInputs {
    #[serde(default)]
    pub service: Option<Service>,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl Activity for DeleteMaximoResource {
    type Inputs = DeleteMaximoResourceInputs;
    type Outputs = RawOutputs;

    const NAME: &'static str = "DeleteMaximoResource";

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError> {
        let service = require_service(&inputs.service)?;
        let resource = require_str(&inputs.resource, "resource")?;
        let id = id_from_id_or_url(require_str(&inputs.id, "id")?);
        let path = service.route(RESOURCE_CONTEXT, &format!("os/{resource}/{id}"));
        request::build_delete(service, &path, None, None, None)
    }

    fn parse(&self, _: &Self::Inputs, response: HttpResponse) -> Result<Self::Outputs, MaximoError> {
        Ok(RawOutputs {
            result: request::parse_response(response)?,
        })
    }
}

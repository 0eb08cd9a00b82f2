//! Session activities: establishing the service descriptor and reading
//! instance-level information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::activity::{narrow, non_empty, require_service, require_str, Activity};
use crate::error::MaximoError;
use crate::http::{HttpRequest, HttpResponse};
use crate::request;
use crate::service::Service;

use super::shapes::CurrentUser;
use super::OSLC_CONTEXT;

/// Validates credentials against `oslc/login` and hands back the
/// `Service` every other activity takes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateMaximoService;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaximoServiceInputs {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

impl CreateMaximoServiceInputs {
    /// The descriptor these inputs describe.
    pub fn service(&self) -> Result<Service, MaximoError> {
        let url = require_str(&self.url, "url")?;
        let username = non_empty(&self.username);
        let password = non_empty(&self.password);
        let api_key = non_empty(&self.api_key);
        if username.is_none() && password.is_none() && api_key.is_none() {
            return Err(MaximoError::MissingInput("username/password or apiKey"));
        }

        let mut service = Service::new(url);
        if let (Some(username), Some(password)) = (username, password) {
            service = service.with_credentials(username, password);
        }
        if let Some(api_key) = api_key {
            service = service.with_api_key(api_key);
        }
        if let Some(context) = non_empty(&self.context) {
            service = service.with_context(context);
        }
        Ok(service)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMaximoServiceOutputs {
    pub service: Service,
}

impl Activity for CreateMaximoService {
    type Inputs = CreateMaximoServiceInputs;
    type Outputs = CreateMaximoServiceOutputs;

    const NAME: &'static str = "CreateMaximoService";

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError> {
        let service = inputs.service()?;
        request::build_post(&service, &service.route(OSLC_CONTEXT, "login"), None, None, None)
    }

    fn parse(
        &self,
        inputs: &Self::Inputs,
        response: HttpResponse,
    ) -> Result<Self::Outputs, MaximoError> {
        request::parse_response(response)?;
        Ok(CreateMaximoServiceOutputs {
            service: inputs.service()?,
        })
    }
}

/// Inputs shared by activities that only need the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceOnlyInputs {
    #[serde(default)]
    pub service: Option<Service>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetMaximoCurrentUser;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMaximoCurrentUserOutputs {
    pub result: CurrentUser,
}

impl Activity for GetMaximoCurrentUser {
    type Inputs = ServiceOnlyInputs;
    type Outputs = GetMaximoCurrentUserOutputs;

    const NAME: &'static str = "GetMaximoCurrentUser";

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError> {
        let service = require_service(&inputs.service)?;
        request::build_get(service, &service.route(OSLC_CONTEXT, "whoami"), None, None)
    }

    fn parse(&self, _: &Self::Inputs, response: HttpResponse) -> Result<Self::Outputs, MaximoError> {
        let result = narrow(request::parse_response(response)?)?;
        Ok(GetMaximoCurrentUserOutputs { result })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetMaximoSystemInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMaximoSystemInfoOutputs {
    pub result: Value,
}

impl Activity for GetMaximoSystemInfo {
    type Inputs = ServiceOnlyInputs;
    type Outputs = GetMaximoSystemInfoOutputs;

    const NAME: &'static str = "GetMaximoSystemInfo";

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError> {
        let service = require_service(&inputs.service)?;
        request::build_get(service, &service.route(OSLC_CONTEXT, "systeminfo"), None, None)
    }

    fn parse(&self, _: &Self::Inputs, response: HttpResponse) -> Result<Self::Outputs, MaximoError> {
        Ok(GetMaximoSystemInfoOutputs {
            result: request::parse_response(response)?,
        })
    }
}

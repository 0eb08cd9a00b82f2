//! `mxasset` activities. These default to the `oslc` context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::activity::{narrow, non_empty, require_service, require_str, require_value, Activity};
use crate::error::MaximoError;
use crate::http::{HttpRequest, HttpResponse};
use crate::id::id_from_id_or_url;
use crate::params::Params;
use crate::request;
use crate::service::Service;

use super::resources::RawOutputs;
use super::shapes::Asset;
use super::OSLC_CONTEXT;

const ASSET_PATH: &str = "os/mxasset";

fn asset_path(service: &Service, asset_id: &str) -> String {
    service.route(OSLC_CONTEXT, &format!("{ASSET_PATH}/{}", id_from_id_or_url(asset_id)))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetMaximoAsset;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMaximoAssetInputs {
    #[serde(default)]
    pub service: Option<Service>,
    /// Asset key or full asset URL.
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub select: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMaximoAssetOutputs {
    pub result: Asset,
}

impl Activity for GetMaximoAsset {
    type Inputs = GetMaximoAssetInputs;
    type Outputs = GetMaximoAssetOutputs;

    const NAME: &'static str = "GetMaximoAsset";

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError> {
        let service = require_service(&inputs.service)?;
        let asset_id = require_str(&inputs.asset_id, "assetId")?;
        let query = Params::new().with_opt("oslc.select", non_empty(&inputs.select));
        request::build_get(service, &asset_path(service, asset_id), Some(&query), None)
    }

    fn parse(&self, _: &Self::Inputs, response: HttpResponse) -> Result<Self::Outputs, MaximoError> {
        let result = narrow(request::parse_response(response)?)?;
        Ok(GetMaximoAssetOutputs { result })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetMaximoAssets;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetMaximoAssetsInputs {
    #[serde(default)]
    pub service: Option<Service>,
    #[serde(default, rename = "where")]
    pub where_clause: Option<String>,
}

impl Activity for GetMaximoAssets {
    type Inputs = GetMaximoAssetsInputs;
    type Outputs = RawOutputs;

    const NAME: &'static str = "GetMaximoAssets";

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError> {
        let service = require_service(&inputs.service)?;
        let where_clause = require_str(&inputs.where_clause, "where")?;
        let query = Params::new().with("oslc.where", where_clause);
        request::build_get(service, &service.route(OSLC_CONTEXT, ASSET_PATH), Some(&query), None)
    }

    fn parse(&self, _: &Self::Inputs, response: HttpResponse) -> Result<Self::Outputs, MaximoError> {
        Ok(RawOutputs {
            result: request::parse_response(response)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateMaximoAsset;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaximoAssetInputs {
    #[serde(default)]
    pub service: Option<Service>,
    #[serde(default)]
    pub asset_id: Option<String>,
    /// Attributes to merge into the asset.
    #[serde(default)]
    pub asset: Option<Value>,
}

/// `UpdateMaximoAsset` produces no outputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMaximoAssetOutputs {}

impl Activity for UpdateMaximoAsset {
    type Inputs = UpdateMaximoAssetInputs;
    type Outputs = UpdateMaximoAssetOutputs;

    const NAME: &'static str = "UpdateMaximoAsset";

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError> {
        let service = require_service(&inputs.service)?;
        let asset = require_value(&inputs.asset, "asset")?;
        let asset_id = require_str(&inputs.asset_id, "assetId")?;
        request::build_patch(service, &asset_path(service, asset_id), None, Some(asset), None)
    }

    fn parse(&self, _: &Self::Inputs, response: HttpResponse) -> Result<Self::Outputs, MaximoError> {
        request::parse_response(response)?;
        Ok(UpdateMaximoAssetOutputs {})
    }
}

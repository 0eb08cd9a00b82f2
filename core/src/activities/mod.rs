//! One unit per Maximo operation. Each validates its inputs, computes a
//! resource path, and issues exactly one request.
//!
//! # Routing
//! Two path families exist side by side. Session, asset, single-resource
//! and raw-request activities default to the `oslc` context
//! (`oslc/os/mxasset/...`); the collection/create/update/delete family
//! uses bare `os/<resource>` paths. `Service::context`, when set, replaces
//! the default for both.

mod assets;
mod resources;
mod send;
mod session;
pub mod shapes;

pub use assets::{
    GetMaximoAsset, GetMaximoAssetInputs, GetMaximoAssetOutputs, GetMaximoAssets,
    GetMaximoAssetsInputs, UpdateMaximoAsset, UpdateMaximoAssetInputs, UpdateMaximoAssetOutputs,
};
pub use resources::{
    CreateMaximoResource, CreateMaximoResourceInputs, CreateMaximoResourceOutputs,
    DeleteMaximoResource, DeleteMaximoResourceInputs, GetMaximoResource, GetMaximoResourceInputs,
    GetMaximoResourceOutputs, GetMaximoResources, GetMaximoResourcesInputs,
    GetMaximoResourcesOutputs, RawOutputs, UpdateMaximoResource, UpdateMaximoResourceInputs,
};
pub use send::{SendMaximoRequest, SendMaximoRequestInputs};
pub use session::{
    CreateMaximoService, CreateMaximoServiceInputs, CreateMaximoServiceOutputs,
    GetMaximoCurrentUser, GetMaximoCurrentUserOutputs, GetMaximoSystemInfo,
    GetMaximoSystemInfoOutputs, ServiceOnlyInputs,
};

/// Default context of the `oslc/...` family.
pub const OSLC_CONTEXT: &str = "oslc";
/// Default context of the bare `os/<resource>` family.
pub const RESOURCE_CONTEXT: &str = "";

use super::{BaseModel, catalogue};
use crate::error::{ErrorOrigin, InternalError};
use std::{
    collections::BTreeMap,
    sync::{Arc, LazyLock, Mutex, PoisonError},
};

//
// BASE_MODELS
//
// One shared catalogue per bundled version, built on first request.
//

static BASE_MODELS: LazyLock<Mutex<BTreeMap<String, Arc<BaseModel>>>> =
    LazyLock::new(|| Mutex::new(BTreeMap::new()));

pub(super) fn load(version: &str) -> Result<Arc<BaseModel>, InternalError> {
    let def = catalogue::definition(version).ok_or_else(|| {
        InternalError::not_found(
            ErrorOrigin::BaseModel,
            format!(
                "base model version '{version}' not found (supported: {})",
                catalogue::SUPPORTED_VERSIONS.join(", ")
            ),
        )
    })?;

    // builds happen before insertion, so a poisoned map is still consistent
    let mut models = BASE_MODELS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(model) = models.get(def.version) {
        return Ok(Arc::clone(model));
    }

    let model = Arc::new(def.build()?);
    tracing::debug!(version = def.version, elements = model.all_elements().len(), "base model loaded");
    models.insert(def.version.to_string(), Arc::clone(&model));

    Ok(model)
}

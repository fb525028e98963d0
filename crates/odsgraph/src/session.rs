use crate::{context::Context, error::OdsException};
use odsgraph_core::{
    base::BaseModel,
    cache::ModelCache,
    instance::{Iid, Instance, InstanceStore},
    model::{Aid, ApplicationModel, ModelBuilder},
    value::Value,
};
use std::sync::Arc;

///
/// Session
///
/// One open document: the application model over a shared base model, its
/// instances, the configuration context, and a lookup cache rebuilt lazily
/// whenever the model has changed since it was last read.
///
/// Removals that go through the session also drop the instance data they
/// orphan.
///

#[derive(Debug)]
pub struct Session {
    model: ApplicationModel,
    instances: InstanceStore,
    context: Context,
    cache: ModelCache,
}

impl Session {
    /// Open a session over the bundled base model of `version`.
    pub fn new(version: &str) -> Result<Self, OdsException> {
        let base = BaseModel::load(version)?;

        Ok(Self::with_base(base))
    }

    #[must_use]
    pub fn with_base(base: Arc<BaseModel>) -> Self {
        tracing::debug!(version = base.version(), "session opened");

        Self {
            model: ApplicationModel::new(base),
            instances: InstanceStore::new(),
            context: Context::new(),
            cache: ModelCache::default(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn base(&self) -> &BaseModel {
        self.model.base()
    }

    #[must_use]
    pub const fn model(&self) -> &ApplicationModel {
        &self.model
    }

    /// Direct model access. Structural removals made here leave instance
    /// data behind until [`Session::purge`] runs.
    pub const fn model_mut(&mut self) -> &mut ApplicationModel {
        &mut self.model
    }

    /// Incremental model construction front end for readers.
    pub const fn builder(&mut self) -> ModelBuilder<'_> {
        ModelBuilder::new(&mut self.model)
    }

    #[must_use]
    pub const fn instances(&self) -> &InstanceStore {
        &self.instances
    }

    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    pub const fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Lookup cache for the current model, rebuilt first if stale.
    pub fn cache(&mut self) -> &ModelCache {
        self.cache.refresh(&self.model);

        &self.cache
    }

    pub fn validate(&self) -> Result<(), OdsException> {
        self.model.validate().map_err(OdsException::from)
    }

    //
    // Model removals
    //

    pub fn remove_element(&mut self, aid: Aid) -> Result<(), OdsException> {
        self.model.remove_element(aid)?;
        self.purge();

        Ok(())
    }

    pub fn remove_attribute(&mut self, aid: Aid, name: &str) -> Result<bool, OdsException> {
        let removed = self.model.remove_attribute(aid, name)?;
        if removed {
            self.purge();
        }

        Ok(removed)
    }

    pub fn remove_relation(&mut self, aid: Aid, name: &str) -> Result<bool, OdsException> {
        let removed = self.model.remove_relation(aid, name)?;
        if removed {
            self.purge();
        }

        Ok(removed)
    }

    /// Drop instance data the model no longer describes.
    pub fn purge(&mut self) -> usize {
        self.instances.purge(&self.model)
    }

    //
    // Instances
    //

    pub fn create_instance(&mut self, aid: Aid, name: Option<&str>) -> Result<Iid, OdsException> {
        Ok(self.instances.create_instance(&self.model, aid, name)?)
    }

    pub fn remove_instance(&mut self, aid: Aid, iid: Iid) -> bool {
        self.instances.remove_instance(&self.model, aid, iid)
    }

    pub fn instance(&self, aid: Aid, iid: Iid) -> Result<&Instance, OdsException> {
        Ok(self.instances.instance(aid, iid)?)
    }

    /// Set a declared attribute value on an instance.
    pub fn set_value(
        &mut self,
        aid: Aid,
        iid: Iid,
        attribute: &str,
        value: Value,
    ) -> Result<(), OdsException> {
        let element = self.model.element(aid)?;
        self.instances
            .instance_mut(aid, iid)?
            .set_attribute_value(&element, attribute, value)?;

        Ok(())
    }

    pub fn add_relation_value(
        &mut self,
        aid: Aid,
        iid: Iid,
        relation: &str,
        targets: &[Iid],
    ) -> Result<(), OdsException> {
        Ok(self
            .instances
            .add_relation_value(&self.model, aid, iid, relation, targets)?)
    }

    pub fn related_iids(&self, aid: Aid, iid: Iid, relation: &str) -> Result<Vec<Iid>, OdsException> {
        Ok(self.instances.related_iids(&self.model, aid, iid, relation)?)
    }
}

use super::{Iid, Instance};
use crate::{
    error::{ErrorOrigin, InternalError},
    model::{Aid, ApplicationModel, RelNo, Relation},
    pattern::{CaseMode, NamePattern},
};
use odsgraph_primitives::Relationship;
use std::collections::{BTreeMap, BTreeSet};

type LinkKey = (Aid, Iid, RelNo);

///
/// InstanceStore
///
/// Instances grouped by element, plus the instance-level links of every
/// relation. Links are stored on both sides of a relation pair; the two
/// sides never disagree.
///
/// The store does not own the model. Operations that need the model take it
/// by reference, so a model change followed by [`InstanceStore::purge`]
/// keeps both in step.
///

#[derive(Clone, Debug, Default)]
pub struct InstanceStore {
    instances: BTreeMap<Aid, BTreeMap<Iid, Instance>>,
    links: BTreeMap<LinkKey, BTreeSet<Iid>>,
}

impl InstanceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    //
    // Instances
    //

    /// Create an instance with the next free iid of the element.
    pub fn create_instance(
        &mut self,
        model: &ApplicationModel,
        aid: Aid,
        name: Option<&str>,
    ) -> Result<Iid, InternalError> {
        model.element_ref(aid)?;

        let rows = self.instances.entry(aid).or_default();
        let iid = match rows.keys().next_back() {
            None => Iid(1),
            Some(last) => last.0.checked_add(1).map(Iid).ok_or_else(|| {
                InternalError::constraint(
                    ErrorOrigin::Instance,
                    format!("aid {aid} has no iid left after {last}"),
                )
            })?,
        };
        rows.insert(iid, Instance::new(aid, iid, name.map(str::to_string)));

        tracing::trace!(%aid, %iid, "instance created");

        Ok(iid)
    }

    /// Create an instance under a caller-chosen iid, as when reading a file
    /// that carries its own ids.
    pub fn create_instance_with_iid(
        &mut self,
        model: &ApplicationModel,
        aid: Aid,
        iid: Iid,
        name: Option<&str>,
    ) -> Result<(), InternalError> {
        model.element_ref(aid)?;

        let rows = self.instances.entry(aid).or_default();
        if rows.contains_key(&iid) {
            return Err(InternalError::duplicate(
                ErrorOrigin::Instance,
                format!("instance {iid} of aid {aid} already exists"),
            ));
        }
        rows.insert(iid, Instance::new(aid, iid, name.map(str::to_string)));

        Ok(())
    }

    /// Remove an instance and every link to or from it; returns whether it
    /// existed.
    pub fn remove_instance(&mut self, model: &ApplicationModel, aid: Aid, iid: Iid) -> bool {
        let removed = self
            .instances
            .get_mut(&aid)
            .and_then(|rows| rows.remove(&iid))
            .is_some();

        let owned: Vec<LinkKey> = self
            .links
            .range((aid, iid, RelNo(0))..=(aid, iid, RelNo(u32::MAX)))
            .map(|(k, _)| *k)
            .collect();
        for key in owned {
            match model.inverse_relation(key.2) {
                Ok(inverse) => {
                    self.unlink_all(key, inverse);
                }
                Err(_) => {
                    self.links.remove(&key);
                }
            }
        }

        if removed {
            tracing::trace!(%aid, %iid, "instance removed");
        }

        removed
    }

    pub fn instance(&self, aid: Aid, iid: Iid) -> Result<&Instance, InternalError> {
        self.instances
            .get(&aid)
            .and_then(|rows| rows.get(&iid))
            .ok_or_else(|| missing_instance(aid, iid))
    }

    pub fn instance_mut(&mut self, aid: Aid, iid: Iid) -> Result<&mut Instance, InternalError> {
        self.instances
            .get_mut(&aid)
            .and_then(|rows| rows.get_mut(&iid))
            .ok_or_else(|| missing_instance(aid, iid))
    }

    /// Instances of one element in iid order.
    pub fn instances(&self, aid: Aid) -> impl Iterator<Item = &Instance> {
        self.instances.get(&aid).into_iter().flat_map(BTreeMap::values)
    }

    #[must_use]
    pub fn instance_count(&self, aid: Aid) -> usize {
        self.instances.get(&aid).map_or(0, BTreeMap::len)
    }

    //
    // Links
    //

    /// Link `iid` to each of `targets` through the relation named `relation`
    /// of element `aid`, and record the inverse side. On a side whose
    /// relation allows at most one partner the new link replaces the old
    /// one. Targets need not exist yet.
    pub fn add_relation_value(
        &mut self,
        model: &ApplicationModel,
        aid: Aid,
        iid: Iid,
        relation: &str,
        targets: &[Iid],
    ) -> Result<(), InternalError> {
        let (forward, inverse) = resolve(model, aid, relation)?;
        self.instance(aid, iid)?;

        if forward.max() == 1 && targets.len() > 1 {
            return Err(InternalError::bad_parameter(
                ErrorOrigin::Instance,
                format!(
                    "relation '{}' allows one related instance, got {}",
                    forward.name(),
                    targets.len()
                ),
            ));
        }

        if forward.max() == 1 {
            self.unlink_all((aid, iid, forward.number()), inverse);
        }

        for &target in targets {
            if inverse.max() == 1 {
                self.unlink_all((inverse.elem1(), target, inverse.number()), forward);
            }
            self.links
                .entry((aid, iid, forward.number()))
                .or_default()
                .insert(target);
            self.links
                .entry((inverse.elem1(), target, inverse.number()))
                .or_default()
                .insert(iid);
        }

        tracing::trace!(%aid, %iid, relation, count = targets.len(), "relation value added");

        Ok(())
    }

    /// Unlink `targets` (every partner when empty); returns whether any link
    /// was removed.
    pub fn remove_related_iids(
        &mut self,
        model: &ApplicationModel,
        aid: Aid,
        iid: Iid,
        relation: &str,
        targets: &[Iid],
    ) -> Result<bool, InternalError> {
        let (forward, inverse) = resolve(model, aid, relation)?;
        let key = (aid, iid, forward.number());

        if targets.is_empty() {
            return Ok(self.unlink_all(key, inverse) > 0);
        }

        let mut removed = false;
        for &target in targets {
            if self.unlink(key, target, inverse) {
                removed = true;
            }
        }

        Ok(removed)
    }

    /// Related iids through one relation, in iid order.
    pub fn related_iids(
        &self,
        model: &ApplicationModel,
        aid: Aid,
        iid: Iid,
        relation: &str,
    ) -> Result<Vec<Iid>, InternalError> {
        let (forward, _) = resolve(model, aid, relation)?;

        Ok(self.linked(aid, iid, forward.number()))
    }

    /// Live instances reached through every relation of the given role whose
    /// target element name matches `target_pattern`. Links to instances not
    /// created yet are skipped.
    pub fn related_instances_by_relationship(
        &self,
        model: &ApplicationModel,
        aid: Aid,
        iid: Iid,
        relationship: Relationship,
        target_pattern: &str,
    ) -> Result<Vec<&Instance>, InternalError> {
        Ok(self
            .related_keys_by_relationship(model, aid, iid, relationship, target_pattern)?
            .into_iter()
            .filter_map(|(target, related)| self.instance(target, related).ok())
            .collect())
    }

    /// Like [`Self::related_instances_by_relationship`], but yields the
    /// (aid, iid) keys of every link, including forward references.
    pub fn related_keys_by_relationship(
        &self,
        model: &ApplicationModel,
        aid: Aid,
        iid: Iid,
        relationship: Relationship,
        target_pattern: &str,
    ) -> Result<Vec<(Aid, Iid)>, InternalError> {
        let element = model.element(aid)?;
        let pattern = NamePattern::new(target_pattern, CaseMode::Sensitive, ErrorOrigin::Instance)?;

        let mut out = Vec::new();
        for relation in element.relations_by_relationship(relationship) {
            let target = relation.elem2();
            let matches = model
                .element_ref(target)
                .is_ok_and(|e| pattern.is_match(e.name()));
            if !matches {
                continue;
            }
            for related in self.linked(aid, iid, relation.number()) {
                if !out.contains(&(target, related)) {
                    out.push((target, related));
                }
            }
        }

        Ok(out)
    }

    //
    // Maintenance
    //

    /// Drop instances of removed elements, values of removed attributes and
    /// links of removed relations. Returns the number of dropped instances.
    pub fn purge(&mut self, model: &ApplicationModel) -> usize {
        let mut dropped = 0;
        self.instances.retain(|aid, rows| {
            let Ok(element) = model.element_ref(*aid) else {
                dropped += rows.len();
                return false;
            };
            for instance in rows.values_mut() {
                instance
                    .values
                    .retain(|number, _| element.attribute_by_no(*number).is_ok());
            }
            true
        });

        self.links.retain(|(aid, _, number), _| {
            model
                .relation(*number)
                .is_ok_and(|r| r.elem1() == *aid)
        });

        if dropped > 0 {
            tracing::debug!(dropped, "instances purged");
        }

        dropped
    }

    fn linked(&self, aid: Aid, iid: Iid, number: RelNo) -> Vec<Iid> {
        self.links
            .get(&(aid, iid, number))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    // Remove one link on both sides.
    fn unlink(&mut self, key: LinkKey, target: Iid, inverse: &Relation) -> bool {
        let removed = remove_from(&mut self.links, key, target);
        if removed {
            remove_from(&mut self.links, (inverse.elem1(), target, inverse.number()), key.1);
        }

        removed
    }

    // Remove every link of `key` on both sides; returns the count.
    fn unlink_all(&mut self, key: LinkKey, inverse: &Relation) -> usize {
        let Some(targets) = self.links.remove(&key) else {
            return 0;
        };
        for &target in &targets {
            remove_from(&mut self.links, (inverse.elem1(), target, inverse.number()), key.1);
        }

        targets.len()
    }
}

fn resolve<'m>(
    model: &'m ApplicationModel,
    aid: Aid,
    relation: &str,
) -> Result<(&'m Relation, &'m Relation), InternalError> {
    let element = model.element(aid)?;
    let forward = element.relation_by_name(relation)?.relation();
    let inverse = model.relation(forward.inverse_number())?;

    Ok((forward, inverse))
}

fn remove_from(links: &mut BTreeMap<LinkKey, BTreeSet<Iid>>, key: LinkKey, iid: Iid) -> bool {
    let Some(set) = links.get_mut(&key) else {
        return false;
    };
    let removed = set.remove(&iid);
    if set.is_empty() {
        links.remove(&key);
    }

    removed
}

fn missing_instance(aid: Aid, iid: Iid) -> InternalError {
    InternalError::not_found(
        ErrorOrigin::Instance,
        format!("instance {iid} of aid {aid} not found"),
    )
}

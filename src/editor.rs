//! The add/edit flow for customer managed records
//!
//! [`RecordEditor`] resolves which domain a submission is for, validates and
//! encodes it, and writes it through a [`RecordStore`] inside a transaction,
//! firing the lifecycle hooks around the write.

use std::fmt;

use tracing::{debug, info, warn};

use crate::codec::{ZoneFragment, decode};
use crate::database::{DomainChoice, NewRecord, RecordStore, StoreError};
use crate::error::{ProtocolError, RecordError, SaveError};
use crate::events::{EventDispatcher, RecordEvent, RecordEventKind};
use crate::form::RecordForm;
use crate::rr::{AliasId, DnsClass, DomainId, Origin, RecordId, RecordType};
use crate::validate::ValidatedRecord;

/// What a successful save did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveAction {
    Added,
    Updated,
}

impl SaveAction {
    /// Confirmation shown to the customer.
    pub fn message(&self) -> &'static str {
        match self {
            SaveAction::Added => "DNS resource record scheduled for addition.",
            SaveAction::Updated => "DNS resource record scheduled for update.",
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            SaveAction::Added => "addition",
            SaveAction::Updated => "update",
        }
    }
}

impl fmt::Display for SaveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A record written by [`RecordEditor::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub id: RecordId,
    pub action: SaveAction,
    pub record_type: RecordType,
    pub fragment: ZoneFragment,
}

/// Where a submission will be written.
#[derive(Debug)]
struct Target {
    alias_id: AliasId,
    origin: Origin,
    record_type: RecordType,
}

/// Adds and edits the custom DNS records of a customer.
#[derive(Debug, Clone)]
pub struct RecordEditor<S> {
    store: S,
    events: EventDispatcher,
}

impl<S: RecordStore> RecordEditor<S> {
    pub fn new(store: S) -> Self {
        Self::with_events(store, EventDispatcher::default())
    }

    pub fn with_events(store: S, events: EventDispatcher) -> Self {
        Self { store, events }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn events_mut(&mut self) -> &mut EventDispatcher {
        &mut self.events
    }

    /// The values of a blank add form.
    pub fn new_form(&self) -> RecordForm {
        RecordForm::new()
    }

    /// Domains offered by the add form for the customer's main domain.
    pub fn domains(&self, domain_id: DomainId) -> Result<Vec<DomainChoice>, StoreError> {
        self.store.domains(domain_id)
    }

    /// Decode a stored record of the customer into its edit form.
    ///
    /// Records created by other panel features cannot be edited.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn edit_form(
        &self,
        domain_id: DomainId,
        record_id: RecordId,
    ) -> Result<RecordForm, SaveError> {
        let stored = self
            .store
            .record(domain_id, record_id)?
            .ok_or(ProtocolError::UnknownRecord(record_id))
            .inspect_err(|error| warn!("Rejected DNS resource record: {error}"))?;

        if !stored.record.is_editable() {
            let error = ProtocolError::NotEditable {
                id: record_id,
                owner: stored.record.owner.to_string(),
            };
            warn!("Rejected DNS resource record: {error}");
            return Err(error.into());
        }

        Ok(decode(&stored.record))
    }

    /// Validate a submitted form and schedule the record for addition
    /// (`record_id` is `None`) or update.
    #[tracing::instrument(skip(self, form), level = "debug")]
    pub fn save(
        &self,
        domain_id: DomainId,
        record_id: Option<RecordId>,
        form: &RecordForm,
    ) -> Result<Saved, SaveError> {
        let form = form.cleaned();
        let target = match record_id {
            None => self.target_for_add(domain_id, &form),
            Some(id) => self.target_for_edit(domain_id, id, &form),
        }
        .inspect_err(|error| warn!("Rejected DNS resource record: {error}"))?;

        let record = ValidatedRecord::validate(target.record_type, &form, &target.origin)
            .inspect_err(|error| match error {
                RecordError::BadRequest(error) => {
                    warn!("Rejected DNS resource record: {error}")
                }
                RecordError::Invalid(errors) => {
                    debug!("Could not validate DNS resource record: {errors}")
                }
            })?;

        let fragment = record.encode();
        let new = NewRecord {
            domain_id,
            alias_id: target.alias_id,
            name: fragment.name.clone(),
            class: DnsClass::IN.to_string(),
            record_type: target.record_type.to_string(),
            rdata: fragment.rdata.clone(),
        };

        let (before, after) = match record_id {
            None => (RecordEventKind::BeforeAdd, RecordEventKind::AfterAdd),
            Some(_) => (RecordEventKind::BeforeEdit, RecordEventKind::AfterEdit),
        };

        let id = self
            .store
            .transaction(|tx| {
                let mut event = RecordEvent {
                    kind: before,
                    id: record_id,
                    domain_id,
                    alias_id: new.alias_id,
                    name: new.name.clone(),
                    class: new.class.clone(),
                    record_type: new.record_type.clone(),
                    data: new.rdata.clone(),
                };
                self.events.dispatch(&event, tx);

                let id = match record_id {
                    None => tx.insert(&new)?,
                    Some(id) => {
                        tx.update(id, &new)?;
                        id
                    }
                };

                let n = tx.resync_errored(domain_id)?;
                if n > 0 {
                    debug!("rescheduled {n} DNS resource records with errors");
                }

                event.kind = after;
                event.id = Some(id);
                self.events.dispatch(&event, tx);

                Ok(id)
            })
            .inspect_err(|error| match error {
                StoreError::Duplicate => debug!("DNS resource record already exists"),
                StoreError::UnknownRecord(_) => warn!("Rejected DNS resource record: {error}"),
                _ => {}
            })?;

        let action = match record_id {
            None => SaveAction::Added,
            Some(_) => SaveAction::Updated,
        };
        info!(
            record = %id,
            "DNS resource record has been scheduled for {}",
            action.noun()
        );

        Ok(Saved {
            id,
            action,
            record_type: target.record_type,
            fragment,
        })
    }

    /// A new record goes to the main domain (`domain_id` form field `0`) or
    /// to one of its aliases.
    fn target_for_add(&self, domain_id: DomainId, form: &RecordForm) -> Result<Target, SaveError> {
        form.class.parse::<DnsClass>()?;
        let record_type: RecordType = form.record_type.parse()?;

        let alias_id = if form.domain_id.is_empty() {
            AliasId::default()
        } else {
            form.domain_id
                .parse::<AliasId>()
                .map_err(|_| ProtocolError::UnknownAlias(form.domain_id.clone()))?
        };

        let origin = if alias_id.is_zero() {
            let domain = self
                .store
                .main_domain(domain_id)?
                .ok_or(ProtocolError::UnknownDomain(domain_id))?;
            Origin::new(&domain.name)
        } else {
            let alias = self
                .store
                .alias(domain_id, alias_id)?
                .ok_or_else(|| ProtocolError::UnknownAlias(form.domain_id.clone()))?;
            Origin::new(&alias.name)
        };

        Ok(Target {
            alias_id,
            origin,
            record_type,
        })
    }

    /// An existing record keeps its type and domain.
    fn target_for_edit(
        &self,
        domain_id: DomainId,
        record_id: RecordId,
        form: &RecordForm,
    ) -> Result<Target, SaveError> {
        let stored = self
            .store
            .record(domain_id, record_id)?
            .ok_or(ProtocolError::UnknownRecord(record_id))?;

        if !stored.record.is_editable() {
            return Err(ProtocolError::NotEditable {
                id: record_id,
                owner: stored.record.owner.to_string(),
            }
            .into());
        }

        form.class.parse::<DnsClass>()?;
        let record_type = stored.record.kind()?;

        Ok(Target {
            alias_id: stored.alias_id,
            origin: stored.origin(),
            record_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_action_messages() {
        assert_eq!(
            SaveAction::Added.message(),
            "DNS resource record scheduled for addition."
        );
        assert_eq!(
            SaveAction::Updated.to_string(),
            "DNS resource record scheduled for update."
        );
        assert_eq!(SaveAction::Updated.noun(), "update");
    }
}

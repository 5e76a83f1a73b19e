//! The record-management state machine.
//!
//! # Design
//! `RecordManager` owns the `RecordCollection` and `FormState` and is the
//! only caller of `RecordService`. Exactly one phase is active at a time;
//! an operation started outside `Idle` is rejected with
//! `OperationInProgress` before any network call.
//!
//! Methods take `&self` so the presentation layer can hold one shared
//! manager. Session state sits behind a mutex that is never held across an
//! `.await`; the service calls are the only suspension points.
//!
//! Every confirmed mutation ends with a reconciling fetch. The phase moves
//! straight from `Submitting`/`Deleting` to `Loading`, so that fetch starts
//! only after the mutation resolved and nothing can interleave with it.

use parking_lot::{Mutex, MutexGuard};
use tokio::sync::watch;

use crate::collection::RecordCollection;
use crate::condition::{Completion, Condition, Notice};
use crate::form::{FormMode, FormState};
use crate::service::RecordService;
use crate::types::{Field, Record, RecordId};
use crate::validate::validate;

/// What the manager is doing right now.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Submitting,
    Deleting(RecordId),
}

#[derive(Debug)]
struct Session {
    phase: Phase,
    live: bool,
    form: FormState,
    records: RecordCollection,
}

pub struct RecordManager<S> {
    service: S,
    session: Mutex<Session>,
    phase_tx: watch::Sender<Phase>,
}

impl<S: RecordService> RecordManager<S> {
    /// Mount a manager with an empty collection and a blank create form.
    pub fn new(service: S) -> Self {
        let (phase_tx, _) = watch::channel(Phase::Idle);
        Self {
            service,
            session: Mutex::new(Session {
                phase: Phase::Idle,
                live: true,
                form: FormState::new(),
                records: RecordCollection::new(),
            }),
            phase_tx,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Replace the collection with the server's current listing.
    ///
    /// Returns the number of records held afterwards.
    pub async fn refresh(&self) -> Result<usize, Condition> {
        {
            let mut session = self.idle_session()?;
            self.transition(&mut session, Phase::Loading);
        }
        self.load().await
    }

    /// Create or update from the current form, then reconcile.
    pub async fn submit(&self) -> Result<Completion, Condition> {
        let (fields, mode) = {
            let mut session = self.idle_session()?;
            validate(session.form.fields())?;
            let snapshot = (session.form.fields().clone(), session.form.mode().clone());
            self.transition(&mut session, Phase::Submitting);
            snapshot
        };

        let result = match &mode {
            FormMode::Create => self.service.create(&fields).await,
            FormMode::Edit(id) => self.service.update(id, &fields).await,
        };

        let notice = {
            let mut session = self.live_session()?;
            let record = match result {
                Ok(record) => record,
                Err(failure) => {
                    log::warn!("save failed: {failure}");
                    self.transition(&mut session, Phase::Idle);
                    return Err(Condition::SaveFailed {
                        message: failure.message,
                    });
                }
            };
            let notice = match mode {
                FormMode::Create => {
                    session.records.append(record.clone());
                    Notice::Added(record)
                }
                FormMode::Edit(_) => {
                    session.records.replace(record.clone());
                    Notice::Updated(record)
                }
            };
            session.form.reset();
            self.transition(&mut session, Phase::Loading);
            notice
        };

        let refresh = self.load().await;
        Ok(Completion { notice, refresh })
    }

    /// Open `record` in the form for editing. No network call.
    pub fn begin_edit(&self, record: &Record) -> Result<(), Condition> {
        let mut session = self.idle_session()?;
        if !session.records.contains(&record.id) {
            return Err(Condition::StaleRecord { id: record.id.clone() });
        }
        session.form.load_for_edit(record);
        log::debug!("editing record {}", record.id);
        Ok(())
    }

    /// Abandon the current input and return to create mode. Allowed in any
    /// phase.
    pub fn cancel_edit(&self) {
        self.session.lock().form.reset();
    }

    /// Store user input for one field. Allowed in any phase.
    pub fn set_field(&self, field: Field, text: impl Into<String>) {
        self.session.lock().form.set_field(field, text);
    }

    /// Delete `id` on the server, then reconcile.
    ///
    /// Removing an id that is not in the collection is not an error.
    pub async fn remove(&self, id: &RecordId) -> Result<Completion, Condition> {
        {
            let mut session = self.idle_session()?;
            self.transition(&mut session, Phase::Deleting(id.clone()));
        }

        let result = self.service.delete(id).await;

        {
            let mut session = self.live_session()?;
            if let Err(failure) = result {
                log::warn!("delete of {id} failed: {failure}");
                self.transition(&mut session, Phase::Idle);
                return Err(Condition::DeleteFailed {
                    message: failure.message,
                });
            }
            session.records.remove_by_id(id);
            if session.form.editing_id() == Some(id) {
                session.form.reset();
            }
            self.transition(&mut session, Phase::Loading);
        }

        let refresh = self.load().await;
        Ok(Completion {
            notice: Notice::Deleted(id.clone()),
            refresh,
        })
    }

    /// Tear the view down. The collection is discarded and any result that
    /// resolves afterwards is dropped.
    pub fn unmount(&self) {
        let mut session = self.session.lock();
        session.live = false;
        session.records.clear();
        session.form.reset();
        self.transition(&mut session, Phase::Idle);
        log::debug!("record manager unmounted");
    }

    // -----------------------------------------------------------------------
    // Read-only views
    // -----------------------------------------------------------------------

    pub fn records(&self) -> Vec<Record> {
        self.session.lock().records.as_slice().to_vec()
    }

    /// Borrow the collection without cloning it.
    pub fn with_records<R>(&self, f: impl FnOnce(&RecordCollection) -> R) -> R {
        f(&self.session.lock().records)
    }

    pub fn form(&self) -> FormState {
        self.session.lock().form.clone()
    }

    pub fn phase(&self) -> Phase {
        self.session.lock().phase.clone()
    }

    pub fn loading(&self) -> bool {
        self.phase() == Phase::Loading
    }

    pub fn is_live(&self) -> bool {
        self.session.lock().live
    }

    /// Watch phase changes, e.g. to drive a spinner or disable buttons.
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase_tx.subscribe()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Fetch the listing. The phase must already be `Loading`.
    async fn load(&self) -> Result<usize, Condition> {
        let result = self.service.list().await;

        let mut session = self.live_session()?;
        self.transition(&mut session, Phase::Idle);
        match result {
            Ok(records) => {
                session.records.replace_all(records);
                log::debug!("refreshed {} records", session.records.len());
                Ok(session.records.len())
            }
            Err(failure) => {
                log::warn!("fetch failed: {failure}");
                Err(Condition::FetchFailed {
                    message: failure.message,
                })
            }
        }
    }

    fn live_session(&self) -> Result<MutexGuard<'_, Session>, Condition> {
        let session = self.session.lock();
        if !session.live {
            log::debug!("discarding result that arrived after unmount");
            return Err(Condition::Unmounted);
        }
        Ok(session)
    }

    fn idle_session(&self) -> Result<MutexGuard<'_, Session>, Condition> {
        let session = self.live_session()?;
        if session.phase != Phase::Idle {
            log::debug!("rejecting operation while {:?}", session.phase);
            return Err(Condition::OperationInProgress);
        }
        Ok(session)
    }

    fn transition(&self, session: &mut Session, phase: Phase) {
        log::debug!("{:?} -> {:?}", session.phase, phase);
        session.phase = phase.clone();
        self.phase_tx.send_replace(phase);
    }
}

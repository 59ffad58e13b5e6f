use std::sync::Arc;
use studiocore::{
    platform::RecordPlatform,
    record::{
        RecordIdFactory,
        SavedRecords,
    },
};
use tokio::sync::watch;

use crate::{
    audit::AuditSink,
    cache::RecordCache,
    enforcement::Policy,
};

#[derive(Default)]
pub struct Builder {
    record_platform: Option<Box<dyn RecordPlatform>>,
    audit_sink: Option<Box<dyn AuditSink>>,
    id_factory: RecordIdFactory,
    policy: Policy,
}

/// The record store.  Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct Platform(Arc<PlatformInner>);

struct PlatformInner {
    record_platform: Box<dyn RecordPlatform>,
    audit_sink: Box<dyn AuditSink>,
    id_factory: RecordIdFactory,
    policy: Policy,
    cache: RecordCache,
    snapshot: watch::Sender<SavedRecords>,
}

mod impls;

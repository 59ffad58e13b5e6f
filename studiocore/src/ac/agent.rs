use serde::{Deserialize, Serialize};
use super::session::Session;

/// The caller of a record store operation.
///
/// Authorship of a record is always derived from the `Session` carried
/// here, never from the payload supplied by a form page.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub enum Agent {
    #[default]
    Anonymous,
    Session(Session),
}

mod impls;

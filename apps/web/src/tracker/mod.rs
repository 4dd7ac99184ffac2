// Tracker page: submission, list rendering, and the edit/delete/import actions.
// All records traffic goes through AppState::api.

pub mod handlers;

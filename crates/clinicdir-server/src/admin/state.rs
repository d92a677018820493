//! Admin API state.

use clinicdir_auth::AdminAuthService;

use crate::accessor::DirectoryAccessor;
use crate::roster::RosterService;

/// State for admin endpoints, made available to handlers via `FromRef`.
#[derive(Clone)]
pub struct AdminState {
    /// Registration, login and logout.
    pub accounts: AdminAuthService,

    /// Roster mutations with cache refresh.
    pub roster: RosterService,

    /// Cached reads for the admin listing.
    pub directory: DirectoryAccessor,

    /// Fixed page size of the admin listing.
    pub page_size: usize,
}
